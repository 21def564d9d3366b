//! PDF model types - names and primitive objects.
//!
//! - `name` - interned names (Name, NamePool)
//! - `objects` - the primitive object union (PDFObject, PDFDict)

pub mod name;
pub mod objects;

// Re-export main types for convenience
pub use name::{Name, NamePool};
pub use objects::{PDFDict, PDFObject};
