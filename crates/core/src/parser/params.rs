//! Tokenizer parameters.

/// How a `#` inside a name that is not followed by two hex digits is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameEscapePolicy {
    /// Keep the `#` and the bytes after it as written.
    #[default]
    Lenient,
    /// Reject the name as malformed input.
    Strict,
}

/// Parameters controlling tokenizer behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerParams {
    /// Maximum nesting depth of arrays and dictionaries. Deeper input is
    /// malformed.
    pub max_depth: usize,

    /// Treatment of malformed `#xx` escapes in names.
    pub name_escapes: NameEscapePolicy,
}

impl Default for TokenizerParams {
    fn default() -> Self {
        Self {
            max_depth: 256,
            name_escapes: NameEscapePolicy::Lenient,
        }
    }
}

impl TokenizerParams {
    /// Creates tokenizer parameters with the specified values.
    ///
    /// # Panics
    /// Panics if max_depth is zero.
    pub fn new(max_depth: usize, name_escapes: NameEscapePolicy) -> Self {
        assert!(max_depth > 0, "max_depth must allow at least one level");
        Self {
            max_depth,
            name_escapes,
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self::new(max_depth, self.name_escapes)
    }

    pub fn with_name_escapes(self, name_escapes: NameEscapePolicy) -> Self {
        Self {
            name_escapes,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TokenizerParams::default();
        assert_eq!(params.max_depth, 256);
        assert_eq!(params.name_escapes, NameEscapePolicy::Lenient);
    }

    #[test]
    fn test_builders() {
        let params = TokenizerParams::default()
            .with_max_depth(4)
            .with_name_escapes(NameEscapePolicy::Strict);
        assert_eq!(params, TokenizerParams::new(4, NameEscapePolicy::Strict));
    }

    #[test]
    #[should_panic(expected = "max_depth")]
    fn test_zero_depth_panics() {
        let _ = TokenizerParams::new(0, NameEscapePolicy::Lenient);
    }
}
