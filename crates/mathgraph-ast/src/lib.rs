// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for math expressions.
//!
//! This crate contains the expression tree produced by the parser and
//! rewritten by the transformer, the operator tables, and the shared
//! walking and unparsing utilities.
//!
//! # Compilation Flow
//!
//! ```text
//! Parser → Expr (operators and calls)
//!    ↓
//! Transformer → Expr (calls only: the function-call IR)
//!    ↓
//! Graph Builder → backend nodes
//! ```

mod expr;
mod ops;
mod span;
mod unparse;
pub mod walk;

pub use expr::{Expr, ExprKind};
pub use ops::{BinaryOp, UnaryOp};
pub use span::Span;
