//! Expression parser using Pratt parsing (precedence climbing).
//!
//! ## Precedence Levels (lowest to highest)
//!
//! 1. `<`, `<=`, `>`, `>=`, `==`, `!=` (Comparison) - left associative
//! 2. `|` (BitOr) - left associative
//! 3. `^` (BitXor) - left associative
//! 4. `&` (BitAnd) - left associative
//! 5. `+`, `-` (Addition) - left associative
//! 6. `*`, `/`, `//`, `%`, `@` (Multiplication) - left associative
//! 7. Unary `-`, `+`, `~` - prefix
//! 8. `**` (Power) - right associative, binds tighter than a unary on its left
//! 9. Postfix: `name(args)`
//!
//! Comparison and bitwise operators are parsed so that later passes can name
//! the offending operator; nothing downstream accepts them.
//!
//! ## Module Organization
//!
//! - `pratt` - Pratt parser core (precedence climbing, binary/unary ops, calls)
//! - `atoms` - Atomic expressions (numbers, identifiers, parenthesized, tuples)

mod atoms;
mod pratt;

use super::{ParseError, TokenStream};
use mathgraph_ast::Expr;

/// Parse an expression.
pub fn parse_expr(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    pratt::parse_pratt(stream, 0)
}
