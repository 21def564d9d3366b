//! PDF object parsing.
//!
//! - `charclass`: byte classification table
//! - `source`: seekable byte sources
//! - `params`: tokenizer parameters
//! - `tokenizer`: lexer and recursive-descent object builder

pub mod charclass;
pub mod params;
pub mod source;
pub mod tokenizer;

// Re-export main types for convenience
pub use params::{NameEscapePolicy, TokenizerParams};
pub use source::{ByteSource, ReaderSource, SliceSource};
pub use tokenizer::{Keyword, Token, Tokenizer, Tokens};
