//! Arcfour (RC4) stream cipher.
//!
//! Encrypted strings and streams are decrypted with this before their
//! bytes reach the tokenizer. Encryption and decryption are the same
//! keystream XOR.

/// Symmetric cipher interface used to recover plaintext bytes.
pub trait StreamCipher {
    fn encrypt(&self, key: &[u8], data: &[u8]) -> Vec<u8>;

    fn decrypt(&self, key: &[u8], data: &[u8]) -> Vec<u8>;
}

/// RC4 cipher state: a permutation of all byte values plus two indices.
///
/// The keystream is exposed as an infinite [`Iterator`] of bytes; XOR it
/// into the data to encrypt or decrypt.
#[derive(Clone)]
pub struct Arcfour {
    perm: [u8; 256],
    x: u8,
    y: u8,
}

impl Arcfour {
    /// Key the cipher.
    ///
    /// # Panics
    /// Panics if `key` is empty or longer than 256 bytes.
    pub fn new(key: &[u8]) -> Self {
        assert!(
            (1..=256).contains(&key.len()),
            "arcfour key length {} outside 1..=256",
            key.len()
        );

        let mut perm: [u8; 256] = std::array::from_fn(|n| n as u8);
        let mut y = 0u8;
        for (x, &k) in (0..perm.len()).zip(key.iter().cycle()) {
            y = y.wrapping_add(perm[x]).wrapping_add(k);
            perm.swap(x, usize::from(y));
        }

        Self { perm, x: 0, y: 0 }
    }

    /// XOR the keystream into `data` in place.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for (byte, k) in data.iter_mut().zip(self.by_ref()) {
            *byte ^= k;
        }
    }

    /// Encrypt or decrypt `data` into a new buffer.
    pub fn process(&mut self, data: &[u8]) -> Vec<u8> {
        data.iter().zip(self.by_ref()).map(|(b, k)| b ^ k).collect()
    }
}

impl Iterator for Arcfour {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.x = self.x.wrapping_add(1);
        let a = self.perm[usize::from(self.x)];
        self.y = self.y.wrapping_add(a);
        let b = self.perm[usize::from(self.y)];
        self.perm[usize::from(self.x)] = b;
        self.perm[usize::from(self.y)] = a;
        Some(self.perm[usize::from(a.wrapping_add(b))])
    }
}

/// [`StreamCipher`] backed by a fresh [`Arcfour`] per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rc4Cipher;

impl StreamCipher for Rc4Cipher {
    fn encrypt(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        Arcfour::new(key).process(data)
    }

    fn decrypt(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        self.encrypt(key, data)
    }
}

/// RC4-encrypt `data` with `key`.
pub fn encrypt(key: &[u8], data: &[u8]) -> Vec<u8> {
    Rc4Cipher.encrypt(key, data)
}

/// RC4-decrypt `data` with `key`.
pub fn decrypt(key: &[u8], data: &[u8]) -> Vec<u8> {
    Rc4Cipher.decrypt(key, data)
}
