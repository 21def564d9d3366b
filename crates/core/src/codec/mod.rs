//! Codec modules.
//!
//! This module contains:
//! - `arcfour`: RC4 encryption, used to decrypt content before tokenizing

pub mod arcfour;

// Re-export main functions for convenience
pub use arcfour::{Arcfour, Rc4Cipher, StreamCipher, decrypt, encrypt};
