//! PDF object types.

use super::name::Name;
use crate::error::{PdfError, Result};
use indexmap::IndexMap;

/// Dictionary of name keys to objects.
///
/// Keys are unique and iteration follows first-insertion order;
/// inserting an existing key replaces its value in place.
pub type PDFDict = IndexMap<Name, PDFObject>;

/// PDF Object types - the primitive values of the object grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (fixed-point notation) value
    Real(f64),
    /// Byte string, from either literal or hex syntax
    Bytes(Vec<u8>),
    /// Name object (e.g., /Type, /Font)
    Name(Name),
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary (name -> object mapping)
    Dict(PDFDict),
}

impl PDFObject {
    /// Check if this is a null object
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get as boolean
    pub const fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(self.type_error("bool")),
        }
    }

    /// Get as integer
    pub const fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(self.type_error("int")),
        }
    }

    /// Get as real
    pub const fn as_real(&self) -> Result<f64> {
        match self {
            Self::Real(n) => Ok(*n),
            _ => Err(self.type_error("real")),
        }
    }

    /// Get numeric value (int or real coerced to f64)
    pub const fn as_num(&self) -> Result<f64> {
        match self {
            Self::Int(n) => Ok(*n as f64),
            Self::Real(n) => Ok(*n),
            _ => Err(self.type_error("number")),
        }
    }

    /// Get as name
    pub const fn as_name(&self) -> Result<&Name> {
        match self {
            Self::Name(n) => Ok(n),
            _ => Err(self.type_error("name")),
        }
    }

    /// Get as byte string
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Self::Bytes(s) => Ok(s),
            _ => Err(self.type_error("bytes")),
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Result<&[Self]> {
        match self {
            Self::Array(arr) => Ok(arr),
            _ => Err(self.type_error("array")),
        }
    }

    /// Get as dictionary
    pub const fn as_dict(&self) -> Result<&PDFDict> {
        match self {
            Self::Dict(d) => Ok(d),
            _ => Err(self.type_error("dict")),
        }
    }

    /// Look up a dictionary entry by key. Non-dictionaries have no entries.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Self> {
        match self {
            Self::Dict(d) => d.get(key.as_ref()),
            _ => None,
        }
    }

    /// Get type name for error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Bytes(_) => "bytes",
            Self::Name(_) => "name",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
        }
    }

    const fn type_error(&self, expected: &'static str) -> PdfError {
        PdfError::TypeError {
            expected,
            got: self.type_name(),
        }
    }
}

impl From<bool> for PDFObject {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for PDFObject {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for PDFObject {
    fn from(n: f64) -> Self {
        Self::Real(n)
    }
}

impl From<Name> for PDFObject {
    fn from(name: Name) -> Self {
        Self::Name(name)
    }
}

impl From<Vec<u8>> for PDFObject {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<PDFObject>> for PDFObject {
    fn from(arr: Vec<PDFObject>) -> Self {
        Self::Array(arr)
    }
}

impl From<PDFDict> for PDFObject {
    fn from(dict: PDFDict) -> Self {
        Self::Dict(dict)
    }
}
