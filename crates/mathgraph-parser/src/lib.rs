//! Hand-written recursive descent parser for math expressions.
//!
//! Parses the canonical text produced by the sanitizer (and the textual
//! function-call IR, which is a subset of the same grammar) into an
//! [`Expr`](mathgraph_ast::Expr) tree.

pub mod parser;

pub use parser::{
    parse_expr, parse_expr_with_depth, parse_tokens, ParseError, ParseErrorKind,
    DEFAULT_MAX_DEPTH,
};

// Re-export lexer
pub use mathgraph_lexer::Token;
