//! Parse error types.

use mathgraph_ast::Span;
use mathgraph_lexer::Token;
use std::fmt;

/// Parse error with source location and context.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Source location where error occurred
    pub span: Span,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Unexpected token encountered where a specific token was expected.
    ///
    /// Example: Expected `)` to close a call, found identifier instead.
    UnexpectedToken,

    /// Unexpected end of input while parsing was incomplete.
    ///
    /// Example: `sin(x` or `a +`.
    UnexpectedEof,

    /// Tokens are present but violate the grammar.
    ///
    /// Example: `(a)(b)`, calling something that is not a name.
    InvalidSyntax,

    /// Characters the lexer does not know.
    InvalidToken,

    /// Nesting deeper than the configured limit.
    ///
    /// Kept apart from the other kinds because it maps to its own
    /// user-facing message.
    TooDeep,
}

impl ParseError {
    /// Create an "expected token" error.
    pub fn expected_token(expected: Token, found: Option<Token>, span: Span) -> Self {
        let message = match &found {
            Some(token) => format!("expected '{}', found '{}'", expected, token),
            None => format!("expected '{}', found end of input", expected),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(found: Option<&Token>, context: &str, span: Span) -> Self {
        let message = match found {
            Some(token) => format!("unexpected '{}' {}", token, context),
            None => format!("unexpected end of input {}", context),
        };
        Self {
            kind: if found.is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::UnexpectedToken
            },
            span,
            message,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSyntax,
            span,
            message: message.into(),
        }
    }

    /// Create an "invalid token" error.
    pub fn invalid_token(text: &str, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::InvalidToken,
            span,
            message: format!("unrecognized input '{}'", text),
        }
    }

    /// Create a "nesting too deep" error.
    pub fn too_deep(limit: usize, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::TooDeep,
            span,
            message: format!("expression nests deeper than {} levels", limit),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for ParseError {}
