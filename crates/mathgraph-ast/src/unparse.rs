//! Unparsing back to source text.
//!
//! The function-call IR is kept as text for hosts and logs, so `Display`
//! produces `add(mult(x, 2), 3)`. Operator nodes are fully parenthesized,
//! which keeps the output re-parseable whatever the tree shape.

use std::fmt;

use crate::{Expr, ExprKind};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number { text, .. } => f.write_str(text),
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            ExprKind::Unary { op, operand } => write!(f, "({}{})", op, operand),
            ExprKind::Call { func, args } => {
                write!(f, "{}(", func)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{BinaryOp, Expr, Span, UnaryOp};

    #[test]
    fn test_unparse_calls_and_tuples() {
        let s = Span::synthetic();
        let expr = Expr::call(
            "add",
            vec![
                Expr::call("mult", vec![Expr::ident("x", s), Expr::number("2", s).unwrap()], s),
                Expr::new(
                    crate::ExprKind::Tuple(vec![
                        Expr::number("1", s).unwrap(),
                        Expr::number("0.5", s).unwrap(),
                        Expr::ident("y", s),
                    ]),
                    s,
                ),
            ],
            s,
        );
        assert_eq!(expr.to_string(), "add(mult(x, 2), (1, 0.5, y))");
    }

    #[test]
    fn test_unparse_operators_parenthesized() {
        let s = Span::synthetic();
        let expr = Expr::binary(
            BinaryOp::Pow,
            Expr::unary(UnaryOp::Neg, Expr::ident("a", s), s),
            Expr::number("2", s).unwrap(),
            s,
        );
        assert_eq!(expr.to_string(), "((-a) ** 2)");
    }
}
