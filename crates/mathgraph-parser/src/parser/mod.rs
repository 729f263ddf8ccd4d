//! Hand-written recursive descent parser for math expressions.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead and nesting depth tracking
//! - `error`: ParseError kinds
//! - `expr`: Expression parser using Pratt parsing
//!
//! ## Public API
//!
//! ```rust,ignore
//! pub fn parse_expr(source: &str) -> Result<Expr, ParseError>
//! pub fn parse_tokens(tokens: &[(Token, Range<usize>)], max_depth: usize) -> Result<Expr, ParseError>
//! ```

mod error;
mod expr;
mod stream;

pub use error::{ParseError, ParseErrorKind};
use stream::TokenStream;

use mathgraph_ast::{Expr, Span};
use mathgraph_lexer::Token;
use std::ops::Range;

/// Nesting depth accepted when the caller does not choose one.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Lex and parse a complete expression string.
pub fn parse_expr(source: &str) -> Result<Expr, ParseError> {
    parse_expr_with_depth(source, DEFAULT_MAX_DEPTH)
}

/// Lex and parse a complete expression string with an explicit nesting limit.
pub fn parse_expr_with_depth(source: &str, max_depth: usize) -> Result<Expr, ParseError> {
    let tokens = mathgraph_lexer::tokenize(source).map_err(|e| {
        ParseError::invalid_token(
            &e.text,
            Span::new(e.span.start as u32, e.span.end as u32),
        )
    })?;
    parse_tokens(&tokens, max_depth)
}

/// Parse a sequence of tokens with byte spans into one expression.
///
/// The whole sequence must be consumed.
///
/// # Returns
/// - `Ok(Expr)` if parsing succeeds
/// - `Err(ParseError)` on the first failure (no recovery: expressions are one-liners)
pub fn parse_tokens(tokens: &[(Token, Range<usize>)], max_depth: usize) -> Result<Expr, ParseError> {
    let mut stream = TokenStream::new(tokens, max_depth);
    let expr = expr::parse_expr(&mut stream)?;
    if !stream.at_end() {
        return Err(ParseError::unexpected_token(
            stream.peek(),
            "after end of expression",
            stream.current_span(),
        ));
    }
    Ok(expr)
}
