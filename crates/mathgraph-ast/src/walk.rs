//! Expression tree walking utilities.
//!
//! Provides shared traversal logic so the transformer, the builder and the
//! tests do not each re-implement recursive descent.
//!
//! # Design
//!
//! - **Minimal API** - a single `walk_expr` function, not a trait hierarchy
//! - **Pre-order traversal** - visitor called before recursing into children
//! - **No context threading** - the visitor closure owns its state
//!
//! # Examples
//!
//! ```rust
//! use mathgraph_ast::{walk::walk_expr, Expr, ExprKind, Span};
//!
//! let expr = Expr::call("sin", vec![Expr::ident("x", Span::synthetic())], Span::synthetic());
//! let mut calls = 0;
//! walk_expr(&expr, &mut |node| {
//!     if matches!(node.kind, ExprKind::Call { .. }) {
//!         calls += 1;
//!     }
//! });
//! assert_eq!(calls, 1);
//! ```

use crate::{Expr, ExprKind};

/// Recursively walk an expression tree in pre-order, calling visitor for each node.
///
/// # Traversal Order
///
/// 1. Visit current node
/// 2. Recursively visit children (left-to-right)
pub fn walk_expr<V>(expr: &Expr, visitor: &mut V)
where
    V: FnMut(&Expr),
{
    visitor(expr);

    match &expr.kind {
        ExprKind::Binary { left, right, .. } => {
            walk_expr(left, visitor);
            walk_expr(right, visitor);
        }
        ExprKind::Unary { operand, .. } => walk_expr(operand, visitor),
        ExprKind::Call { args, .. } | ExprKind::Tuple(args) => {
            for arg in args {
                walk_expr(arg, visitor);
            }
        }
        ExprKind::Number { .. } | ExprKind::Ident(_) => {}
    }
}

/// Collect every identifier in first-occurrence order, without duplicates.
pub fn identifiers(expr: &Expr) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    walk_expr(expr, &mut |node| {
        if let ExprKind::Ident(name) = &node.kind {
            if !names.iter().any(|n| n == name) {
                names.push(name.clone());
            }
        }
    });
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryOp, Span};

    #[test]
    fn test_preorder_visits_parent_first() {
        let s = Span::synthetic();
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::ident("a", s),
            Expr::call("sin", vec![Expr::ident("b", s)], s),
            s,
        );
        let mut order = Vec::new();
        walk_expr(&expr, &mut |node| {
            order.push(match &node.kind {
                ExprKind::Binary { .. } => "bin".to_string(),
                ExprKind::Call { func, .. } => func.clone(),
                ExprKind::Ident(n) => n.clone(),
                _ => "?".to_string(),
            })
        });
        assert_eq!(order, vec!["bin", "a", "sin", "b"]);
    }

    #[test]
    fn test_identifiers_dedup() {
        let s = Span::synthetic();
        let expr = Expr::call(
            "add",
            vec![Expr::ident("x", s), Expr::ident("x", s), Expr::ident("y", s)],
            s,
        );
        assert_eq!(identifiers(&expr), vec!["x", "y"]);
    }
}
