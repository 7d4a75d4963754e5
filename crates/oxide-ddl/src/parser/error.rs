//! Parser error types.

use thiserror::Error;

use crate::lexer::{Span, Token, TokenKind};

/// A parse error.
///
/// Parsing stops at the first error; there is no recovery and no partial
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (in {context}, line {line}, column {column})")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// What the parser was reading, e.g. `"column definition"`.
    pub context: &'static str,
    /// What was expected, if applicable.
    pub expected: Option<String>,
    /// The source text of the offending token.
    pub found: Option<String>,
    /// The location of the error.
    pub span: Span,
    /// 1-based line of the error.
    pub line: usize,
    /// 1-based column of the error.
    pub column: usize,
}

impl ParseError {
    /// Creates a new parse error at `span` within `input`.
    #[must_use]
    pub fn new(message: impl Into<String>, context: &'static str, span: Span, input: &str) -> Self {
        let (line, column) = span.line_col(input);
        Self {
            message: message.into(),
            context,
            expected: None,
            found: None,
            span,
            line,
            column,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(
        expected: impl Into<String>,
        found: &Token,
        context: &'static str,
        input: &str,
    ) -> Self {
        let expected: String = expected.into();
        let message = match found.kind {
            TokenKind::Eof => format!("unexpected end of input, expected {expected}"),
            TokenKind::Illegal => format!("illegal token `{}`", found.literal),
            _ => format!("unexpected {}, expected {expected}", found.describe()),
        };
        Self {
            expected: Some(expected),
            found: Some(found.literal.clone()),
            ..Self::new(message, context, found.span, input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_reports_position() {
        let input = "CREATE TABLE t (\n  id INT,\n  ,\n)";
        let token = Token::new(TokenKind::Comma, ",", Span::new(29, 30));
        let err = ParseError::unexpected("column name", &token, "column definition", input);
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 3);
        assert_eq!(err.found.as_deref(), Some(","));
        assert_eq!(err.expected.as_deref(), Some("column name"));
        assert_eq!(
            err.to_string(),
            "unexpected symbol `,`, expected column name (in column definition, line 3, column 3)"
        );
    }

    #[test]
    fn test_unexpected_eof_message() {
        let token = Token::new(TokenKind::Eof, "", Span::new(5, 5));
        let err = ParseError::unexpected("`)`", &token, "column list", "a (b ");
        assert_eq!(err.message, "unexpected end of input, expected `)`");
    }

    #[test]
    fn test_illegal_token_message() {
        let token = Token::new(TokenKind::Illegal, "?", Span::new(0, 1));
        let err = ParseError::unexpected("statement", &token, "statement", "?");
        assert_eq!(err.message, "illegal token `?`");
    }
}
