//! Expression tree.

use std::rc::Rc;

use crate::ops::{BinaryOp, UnaryOp};
use crate::span::Span;

/// Expression node with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression kind (what kind of expression this is)
    pub kind: ExprKind,

    /// Source location for error messages
    pub span: Span,
}

/// The different shapes an expression can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal, with the text it was written as.
    Number {
        /// Parsed value.
        value: f64,
        /// Source spelling (`"1.50"`), used for unparsing and constant bindings.
        text: Rc<str>,
    },

    /// Free identifier (a variable).
    Ident(String),

    /// Binary operator application.
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// Unary operator application.
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },

    /// Function call `name(args...)`.
    Call {
        /// Function name
        func: String,
        /// Arguments in call order
        args: Vec<Expr>,
    },

    /// Parenthesized comma list `(a, b, c)`.
    Tuple(Vec<Expr>),
}

impl Expr {
    /// Create a new expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Numeric literal from its source text.
    ///
    /// Returns `None` when the text is not a float.
    pub fn number(text: &str, span: Span) -> Option<Self> {
        let value = text.parse::<f64>().ok()?;
        Some(Self::new(
            ExprKind::Number {
                value,
                text: Rc::from(text),
            },
            span,
        ))
    }

    /// Identifier reference.
    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Ident(name.into()), span)
    }

    /// Function call.
    pub fn call(func: impl Into<String>, args: Vec<Expr>, span: Span) -> Self {
        Self::new(
            ExprKind::Call {
                func: func.into(),
                args,
            },
            span,
        )
    }

    /// Binary operator application.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// Unary operator application.
    pub fn unary(op: UnaryOp, operand: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Identifier name, if this is a bare identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this expression contains no operator nodes at all.
    pub fn is_call_form(&self) -> bool {
        let mut call_form = true;
        crate::walk::walk_expr(self, &mut |node| {
            if matches!(node.kind, ExprKind::Binary { .. } | ExprKind::Unary { .. }) {
                call_form = false;
            }
        });
        call_form
    }

    /// Nesting depth of the tree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        match &self.kind {
            ExprKind::Number { .. } | ExprKind::Ident(_) => 1,
            ExprKind::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            ExprKind::Unary { operand, .. } => 1 + operand.depth(),
            ExprKind::Call { args, .. } | ExprKind::Tuple(args) => {
                1 + args.iter().map(Expr::depth).max().unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s() -> Span {
        Span::synthetic()
    }

    #[test]
    fn test_number_keeps_text() {
        let n = Expr::number("1.50", s()).unwrap();
        match n.kind {
            ExprKind::Number { value, text } => {
                assert_eq!(value, 1.5);
                assert_eq!(&*text, "1.50");
            }
            other => panic!("expected number, got {:?}", other),
        }
        assert!(Expr::number("1.2.3", s()).is_none());
    }

    #[test]
    fn test_call_form_and_depth() {
        let x = Expr::ident("x", s());
        let two = Expr::number("2", s()).unwrap();
        let infix = Expr::binary(BinaryOp::Mul, x.clone(), two.clone(), s());
        assert!(!infix.is_call_form());
        assert_eq!(infix.depth(), 2);

        let call = Expr::call("mult", vec![x, two], s());
        assert!(call.is_call_form());
        let nested = Expr::call("sin", vec![call], s());
        assert_eq!(nested.depth(), 3);
        assert_eq!(nested.as_ident(), None);
    }
}
