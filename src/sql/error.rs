//! SQL parse errors with source positions.

use std::fmt;

/// A byte span in the source query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the start of the span.
    pub start: usize,
    /// Byte offset of the end of the span (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a zero-length span at the given position.
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// A syntax error with the source position it occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Position in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error at the given position.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Creates an error for an unexpected token.
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(format!("expected {expected}, found {found}"), span)
    }

    /// Creates an error for an unexpected end of input.
    pub fn unexpected_eof(expected: &str, pos: usize) -> Self {
        Self::new(
            format!("unexpected end of input, expected {expected}"),
            Span::at(pos),
        )
    }

    /// Creates an error for an invalid number literal.
    pub fn invalid_number(span: Span) -> Self {
        Self::new("invalid number literal", span)
    }

    /// Creates an error for an unterminated string literal.
    pub fn unterminated_string(span: Span) -> Self {
        Self::new("unterminated string literal", span)
    }

    /// Returns the 1-based character position for error reporting.
    pub fn position(&self) -> usize {
        self.span.start + 1
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.position())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_at() {
        let span = Span::at(5);
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 5);
    }

    #[test]
    fn test_position_is_one_based() {
        let err = ParseError::new("test", Span::at(10));
        assert_eq!(err.position(), 11);
    }

    #[test]
    fn test_display() {
        let err = ParseError::unexpected_token("FROM", "identifier 'x'", Span::at(5));
        assert_eq!(err.to_string(), "expected FROM, found identifier 'x' at position 6");
    }
}
