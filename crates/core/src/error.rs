//! Error types for pdfsyntax.

use thiserror::Error;

/// Primary error type for tokenizing and serializing PDF objects.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The byte stream does not conform to the object grammar at this point.
    #[error("malformed input{}: {msg}", offset_suffix(.pos))]
    Malformed { msg: String, pos: Option<usize> },

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    /// Build a malformed-input error, logging where it was detected.
    pub fn malformed(msg: impl Into<String>, pos: Option<usize>) -> Self {
        let msg = msg.into();
        tracing::debug!(?pos, %msg, "malformed input");
        Self::Malformed { msg, pos }
    }

    /// Returns true for grammar errors, as opposed to I/O or accessor failures.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Byte offset where a malformed-input error was detected, if known.
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Malformed { pos, .. } => *pos,
            _ => None,
        }
    }
}

fn offset_suffix(pos: &Option<usize>) -> String {
    pos.map(|p| format!(" at offset {p}")).unwrap_or_default()
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;
