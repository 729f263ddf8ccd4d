//! Operator desugaring.
//!
//! Rewrites canonical text into the function-call IR: every supported
//! operator becomes a call to its registered function, bottom-up, so
//! `x*2 + 3` becomes `add(mult(x, 2), 3)`.
//!
//! # Pipeline Position
//!
//! ```text
//! Sanitize → Transform → Build
//!            ^^^^^^^^^
//! ```
//!
//! Every name the IR calls is checked against the registry here, so an
//! unknown function never reaches the graph.

use indexmap::IndexSet;
use mathgraph_ast::{Expr, ExprKind};
use mathgraph_parser::{parse_expr_with_depth, ParseErrorKind, DEFAULT_MAX_DEPTH};
use tracing::{debug, instrument};

use crate::error::{TransformError, DEBUG_TARGET};

/// The function-call IR of one expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// Calls, identifiers, numbers and tuples only.
    pub ir: Expr,
    /// `ir` unparsed, e.g. `add(mult(x, 2), 3)`.
    pub text: String,
    /// Every function `ir` calls, in first-rewrite order.
    pub functions: IndexSet<String>,
}

/// Transform canonical text with the default nesting limit.
pub fn transform(canonical: &str) -> Result<Transformed, TransformError> {
    transform_with_depth(canonical, DEFAULT_MAX_DEPTH)
}

/// Transform canonical text, refusing nesting deeper than `max_depth`.
#[instrument(skip_all, fields(len = canonical.len()))]
pub fn transform_with_depth(canonical: &str, max_depth: usize) -> Result<Transformed, TransformError> {
    let parsed = parse_expr_with_depth(canonical, max_depth).map_err(|err| {
        debug!(target: DEBUG_TARGET, error = %err, source = canonical, "parse failed");
        match err.kind {
            ParseErrorKind::TooDeep => TransformError::TooLarge,
            _ => TransformError::NotRecognized,
        }
    })?;

    let mut functions = IndexSet::new();
    let ir = desugar(parsed, &mut functions)?;

    if let Some(unknown) = functions.iter().find(|f| !mathgraph_registry::is_known(f)) {
        return Err(TransformError::UnknownFunction(unknown.clone()));
    }

    let text = ir.to_string();
    debug!(ir = %text, calls = functions.len(), "transformed");
    Ok(Transformed { ir, text, functions })
}

/// Rewrite operators into calls, recording every called name.
///
/// Spans are preserved; the result contains no operator nodes.
pub fn desugar(expr: Expr, functions: &mut IndexSet<String>) -> Result<Expr, TransformError> {
    let span = expr.span;

    match expr.kind {
        ExprKind::Binary { op, left, right } => {
            let func = op
                .function()
                .ok_or_else(|| TransformError::OperatorNotSupported(op.symbol().to_string()))?;
            let args = vec![desugar(*left, functions)?, desugar(*right, functions)?];
            functions.insert(func.to_string());
            Ok(Expr::call(func, args, span))
        }

        ExprKind::Unary { op, operand } => {
            let func = op
                .function()
                .ok_or_else(|| TransformError::OperatorNotSupported(op.symbol().to_string()))?;
            let args = vec![desugar(*operand, functions)?];
            functions.insert(func.to_string());
            Ok(Expr::call(func, args, span))
        }

        ExprKind::Call { func, args } => {
            let args = args
                .into_iter()
                .map(|arg| desugar(arg, functions))
                .collect::<Result<Vec<_>, _>>()?;
            functions.insert(func.clone());
            Ok(Expr::call(func, args, span))
        }

        ExprKind::Tuple(items) => {
            let items = items
                .into_iter()
                .map(|item| desugar(item, functions))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::new(ExprKind::Tuple(items), span))
        }

        kind @ (ExprKind::Number { .. } | ExprKind::Ident(_)) => Ok(Expr::new(kind, span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ir(source: &str) -> String {
        transform(source).unwrap().text
    }

    #[test]
    fn test_operators_become_calls() {
        assert_eq!(ir("x*2+3"), "add(mult(x, 2), 3)");
        assert_eq!(ir("a-b/c"), "sub(a, div(b, c))");
        assert_eq!(ir("a//b%c"), "mod(floordiv(a, b), c)");
        assert_eq!(ir("-x**2"), "neg(pow(x, 2))");
        assert_eq!(ir("2**-1"), "pow(2, neg(1))");
        assert_eq!(ir("a**b**c"), "pow(a, pow(b, c))");
    }

    #[test]
    fn test_calls_and_tuples_are_kept() {
        let transformed = transform("clamp(x+1,0,1)*sin(y)").unwrap();
        assert_eq!(transformed.text, "mult(clamp(add(x, 1), 0, 1), sin(y))");
        assert!(transformed.ir.is_call_form());
        assert_eq!(
            transformed.functions.iter().collect::<Vec<_>>(),
            vec!["add", "clamp", "sin", "mult"]
        );
        assert_eq!(ir("add((1,2,3),v)"), "add((1, 2, 3), v)");
    }

    #[test]
    fn test_refused_operators() {
        assert_eq!(
            transform("a<b"),
            Err(TransformError::OperatorNotSupported("<".into()))
        );
        assert_eq!(
            transform("+a"),
            Err(TransformError::OperatorNotSupported("+".into()))
        );
        assert_eq!(
            transform("a^b"),
            Err(TransformError::OperatorNotSupported("^".into()))
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            transform("foo(x)+1"),
            Err(TransformError::UnknownFunction("foo".into()))
        );
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(transform("a+"), Err(TransformError::NotRecognized));
        assert_eq!(transform("(a)(b)"), Err(TransformError::NotRecognized));
        assert_eq!(transform("a $ b"), Err(TransformError::NotRecognized));
    }

    #[test]
    fn test_too_deep() {
        let deep = format!("{}x{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(transform_with_depth(&deep, 8), Err(TransformError::TooLarge));
        assert!(transform_with_depth(&deep, 64).is_ok());
    }
}
