//! Value kinds and the operator dispatch table.
//!
//! Which node an operator builds, and what kind its result has, is decided
//! by looking up `(operator, lhs kind, rhs kind)` in [`DISPATCH`]. A missing
//! entry is a type error.

use std::fmt;

/// Kind of a symbolic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// One float.
    Scalar,
    /// Three floats.
    Vector,
    /// A terminal output; never an operand.
    Sink,
}

impl ValueKind {
    /// Short code used in tag identities.
    pub fn short(self) -> &'static str {
        match self {
            ValueKind::Scalar => "sc",
            ValueKind::Vector => "vc",
            ValueKind::Sink => "sk",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ValueKind::Scalar => 0,
            ValueKind::Vector => 1,
            ValueKind::Sink => 2,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar => f.write_str("Scalar"),
            ValueKind::Vector => f.write_str("Vector"),
            ValueKind::Sink => f.write_str("Output"),
        }
    }
}

/// Operators a symbolic value supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Pow,
    /// `//`
    FloorDiv,
    /// unary `-`
    Neg,
    /// `abs()`
    Abs,
}

impl Operator {
    /// Function the operator is built with.
    pub fn function(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mult",
            Operator::Div => "div",
            Operator::Rem => "mod",
            Operator::Pow => "pow",
            Operator::FloorDiv => "floordiv",
            Operator::Neg => "neg",
            Operator::Abs => "abs",
        }
    }

    /// Spelling used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Pow => "**",
            Operator::FloorDiv => "//",
            Operator::Neg => "neg",
            Operator::Abs => "abs",
        }
    }

    /// Whether the operator takes one operand.
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Neg | Operator::Abs)
    }
}

use Operator::*;
use ValueKind::{Scalar as S, Vector as V};

/// `(operator, lhs, rhs, result)`; unary entries have `rhs == None`.
pub const DISPATCH: &[(Operator, ValueKind, Option<ValueKind>, ValueKind)] = &[
    (Add, S, Some(S), S),
    (Add, S, Some(V), V),
    (Add, V, Some(S), V),
    (Add, V, Some(V), V),
    (Sub, S, Some(S), S),
    (Sub, S, Some(V), V),
    (Sub, V, Some(S), V),
    (Sub, V, Some(V), V),
    (Mul, S, Some(S), S),
    (Mul, S, Some(V), V),
    (Mul, V, Some(S), V),
    (Mul, V, Some(V), V),
    (Div, S, Some(S), S),
    (Div, S, Some(V), V),
    (Div, V, Some(S), V),
    (Div, V, Some(V), V),
    (Rem, S, Some(S), S),
    (Rem, S, Some(V), V),
    (Rem, V, Some(S), V),
    (Rem, V, Some(V), V),
    (FloorDiv, S, Some(S), S),
    (FloorDiv, S, Some(V), V),
    (FloorDiv, V, Some(S), V),
    (FloorDiv, V, Some(V), V),
    (Pow, S, Some(S), S),
    (Neg, S, None, S),
    (Neg, V, None, V),
    (Abs, S, None, S),
    (Abs, V, None, V),
];

/// Result kind of `op` on these operand kinds, if allowed.
pub fn dispatch(op: Operator, lhs: ValueKind, rhs: Option<ValueKind>) -> Option<ValueKind> {
    DISPATCH
        .iter()
        .find(|(o, l, r, _)| *o == op && *l == lhs && *r == rhs)
        .map(|(_, _, _, result)| *result)
}
