//! pdfsyntax - tokenizer and canonical serializer for PDF primitive objects.
//!
//! Raw bytes go through [`parser::Tokenizer`] to become a tree of
//! [`model::PDFObject`] values; [`writer::Serializer`] turns such a tree
//! back into canonical bytes.

pub mod codec;
pub mod error;
pub mod model;
pub mod parser;
pub mod writer;

// RC4 is the only cipher; expose it at the crate root.
pub use codec::arcfour;

pub use error::{PdfError, Result};
pub use model::{Name, NamePool, PDFDict, PDFObject};
pub use parser::{Token, Tokenizer};
pub use writer::{Serializer, to_bytes};
