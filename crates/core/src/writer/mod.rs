//! PDF object writing.
//!
//! - `serializer`: canonical encoding of objects to bytes

pub mod serializer;

// Re-export main types for convenience
pub use serializer::{Serializer, encode_object, format_real, to_bytes};
