//! Numeric evaluation of expressions on floats.
//!
//! Uses the same registry semantics the graph nodes have, so evaluating an
//! expression here matches evaluating the graph built from it. Operators
//! are accepted as well as calls, which lets a parsed infix expression be
//! compared with its IR.

use std::collections::HashMap;

use mathgraph_ast::{Expr, ExprKind};

use crate::error::{BuildError, TransformError};

/// Evaluate `expr` with the given variable values.
///
/// Tuples have no scalar value and are refused.
pub fn evaluate(expr: &Expr, variables: &HashMap<String, f64>) -> Result<f64, BuildError> {
    match &expr.kind {
        ExprKind::Number { value, .. } => Ok(*value),

        ExprKind::Ident(name) => variables
            .get(name)
            .copied()
            .ok_or_else(|| BuildError::UnknownVariable(name.clone())),

        ExprKind::Binary { op, left, right } => {
            let func = op.function().ok_or_else(|| unsupported(op.symbol()))?;
            let args = [evaluate(left, variables)?, evaluate(right, variables)?];
            call(func, &args)
        }

        ExprKind::Unary { op, operand } => {
            let func = op.function().ok_or_else(|| unsupported(op.symbol()))?;
            call(func, &[evaluate(operand, variables)?])
        }

        ExprKind::Call { func, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, variables))
                .collect::<Result<Vec<_>, _>>()?;
            call(func, &args)
        }

        ExprKind::Tuple(_) => Err(BuildError::WrongTupleSyntax),
    }
}

fn call(func: &str, args: &[f64]) -> Result<f64, BuildError> {
    Ok(mathgraph_registry::eval(func, args)?)
}

fn unsupported(symbol: &str) -> BuildError {
    tracing::debug!(
        target: crate::error::DEBUG_TARGET,
        error = %TransformError::OperatorNotSupported(symbol.to_string()),
        "cannot evaluate operator"
    );
    BuildError::Execution
}
