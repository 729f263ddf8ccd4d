//! Operator tables.
//!
//! All supported operators desugar to function calls in the transformer.
//!
//! # Function Mapping
//!
//! | Operator | Function |
//! |----------|----------|
//! | `+` | `add` |
//! | `-` | `sub` |
//! | `*` | `mult` |
//! | `/` | `div` |
//! | `**` | `pow` |
//! | `%` | `mod` |
//! | `//` | `floordiv` |
//! | unary `-` | `neg` |
//!
//! Comparison and bitwise operators are parsed so they can be reported by
//! name, but have no function.

use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition: `a + b` → `add(a, b)`
    Add,
    /// Subtraction: `a - b` → `sub(a, b)`
    Sub,
    /// Multiplication: `a * b` → `mult(a, b)`
    Mul,
    /// Division: `a / b` → `div(a, b)`
    Div,
    /// Floor division: `a // b` → `floordiv(a, b)`
    FloorDiv,
    /// Modulo: `a % b` → `mod(a, b)`
    Mod,
    /// Power: `a ** b` → `pow(a, b)`
    Pow,

    // Refused
    /// `a < b`
    Lt,
    /// `a <= b`
    Le,
    /// `a > b`
    Gt,
    /// `a >= b`
    Ge,
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
    /// `a & b`
    BitAnd,
    /// `a | b`
    BitOr,
    /// `a ^ b`
    BitXor,
    /// `a @ b`
    MatMul,
}

impl BinaryOp {
    /// Get the function that implements this operator, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mathgraph_ast::BinaryOp;
    ///
    /// assert_eq!(BinaryOp::Add.function(), Some("add"));
    /// assert_eq!(BinaryOp::FloorDiv.function(), Some("floordiv"));
    /// assert_eq!(BinaryOp::Lt.function(), None);
    /// ```
    pub fn function(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("add"),
            Self::Sub => Some("sub"),
            Self::Mul => Some("mult"),
            Self::Div => Some("div"),
            Self::FloorDiv => Some("floordiv"),
            Self::Mod => Some("mod"),
            Self::Pow => Some("pow"),
            _ => None,
        }
    }

    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::MatMul => "@",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Negation: `-x` → `neg(x)`
    Neg,
    /// Unary plus `+x` (refused)
    Pos,
    /// Bitwise invert `~x` (refused)
    Invert,
}

impl UnaryOp {
    /// Get the function that implements this operator, if any.
    pub fn function(self) -> Option<&'static str> {
        match self {
            Self::Neg => Some("neg"),
            Self::Pos | Self::Invert => None,
        }
    }

    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Invert => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
