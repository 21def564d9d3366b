//! Known-answer tests for the RC4 cipher collaborator.

use pdfsyntax_core::arcfour::{Arcfour, Rc4Cipher, StreamCipher, decrypt, encrypt};
use pdfsyntax_core::parser::Tokenizer;
use pdfsyntax_core::{PDFObject, to_bytes};

#[test]
fn test_arcfour_key() {
    let ciphertext = encrypt(b"Key", b"Plaintext");
    assert_eq!(hex::encode(&ciphertext), "bbf316e8d940af0ad3");
    assert_eq!(decrypt(b"Key", &ciphertext), b"Plaintext");
}

#[test]
fn test_arcfour_wiki() {
    let mut cipher = Arcfour::new(b"Wiki");
    assert_eq!(hex::encode(cipher.process(b"pedia")), "1021bf0420");
}

#[test]
fn test_arcfour_secret() {
    let ciphertext = Rc4Cipher.encrypt(b"Secret", b"Attack at dawn");
    assert_eq!(hex::encode(&ciphertext), "45a01f645fc35b383552544b9bf5");
    assert_eq!(Rc4Cipher.decrypt(b"Secret", &ciphertext), b"Attack at dawn");
}

#[test]
fn test_in_place_keystream() {
    let mut data = hex::decode("bbf316e8d940af0ad3").unwrap();
    Arcfour::new(b"Key").apply_keystream(&mut data);
    assert_eq!(data, b"Plaintext");
}

#[test]
fn test_decrypt_before_tokenizing() {
    let plain = to_bytes(&PDFObject::Bytes(b"secret (value)".to_vec()));
    let stored = encrypt(b"k3y", &plain);

    let recovered = decrypt(b"k3y", &stored);
    let obj = Tokenizer::from_slice(&recovered)
        .next_object(false, false)
        .unwrap()
        .into_object()
        .unwrap();
    assert_eq!(obj, PDFObject::Bytes(b"secret (value)".to_vec()));
}

#[test]
fn test_cipher_as_trait_object() {
    let cipher: Box<dyn StreamCipher> = Box::new(Rc4Cipher);
    let roundtrip = cipher.decrypt(b"Key", &cipher.encrypt(b"Key", b"xyz"));
    assert_eq!(roundtrip, b"xyz");
}
