//! Parse and serialization errors.
//!
//! Parse errors carry the 1-based line and column of the failure point so
//! callers can point users at the offending input.

use thiserror::Error;

/// Category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Malformed token: unterminated quoted scalar or flow container,
    /// empty anchor/alias name, bad escape at end of input.
    Lex,
    /// Token stream cannot be assembled into a tree: missing `:` after a
    /// key, unexpected token in a flow container, nesting too deep.
    Structural,
    /// Alias names an anchor that has not been defined (yet).
    Reference,
}

impl ParseErrorKind {
    /// Short lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::Lex => "lex",
            ParseErrorKind::Structural => "structural",
            ParseErrorKind::Reference => "reference",
        }
    }
}

/// Error returned by [`parse`](crate::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("YAML parse error at line {line}, col {column}: {message}")]
pub struct ParseError {
    /// Error category
    pub kind: ParseErrorKind,
    /// Human-readable description
    pub message: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, counted in characters)
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }
}

/// Error returned by [`serialize`](crate::serialize).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// An alias points at a node that carries no anchor name.
    #[error("alias references a node without an anchor")]
    UnanchoredAlias,

    /// An anchor name that could not be read back (empty, or containing
    /// whitespace or flow indicators).
    #[error("invalid anchor name {0:?}")]
    InvalidAnchorName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(ParseErrorKind::Reference, "Unknown alias: *x", 3, 7);
        assert_eq!(
            err.to_string(),
            "YAML parse error at line 3, col 7: Unknown alias: *x"
        );
        assert_eq!(err.kind.as_str(), "reference");
    }

    #[test]
    fn test_serialize_error_display() {
        assert_eq!(
            SerializeError::UnanchoredAlias.to_string(),
            "alias references a node without an anchor"
        );
        assert_eq!(
            SerializeError::InvalidAnchorName("a b".into()).to_string(),
            "invalid anchor name \"a b\""
        );
    }
}
