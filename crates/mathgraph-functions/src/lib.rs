//! Function Library
//!
//! Functions available for use in expressions. Each one registers a
//! [`FunctionDescriptor`](mathgraph_registry::FunctionDescriptor) into
//! [`FUNCTIONS`](mathgraph_registry::FUNCTIONS).
//!
//! Depending on this crate is what makes the functions exist: anything that
//! needs the full library should link it with `use mathgraph_functions as _;`.

/// Register a function that is exactly one scalar math node.
macro_rules! scalar_function {
    ($static:ident, $name:literal, [$($param:literal),*], $op:expr, $category:expr, $doc:literal) => {
        #[linkme::distributed_slice(mathgraph_registry::FUNCTIONS)]
        static $static: mathgraph_registry::FunctionDescriptor = mathgraph_registry::FunctionDescriptor {
            name: $name,
            params: &[$($param),*],
            doc: $doc,
            long_doc: "",
            category: $category,
            support: mathgraph_registry::Support::ScalarOnly,
            build: |setter, tag, operands| crate::scalar_node(setter, tag, $op, operands),
            eval: |args| $op.apply(args),
        };
    };
}

mod arith;
mod exp_log;
mod range;
mod rounding;
mod trig;

// Re-export for convenience
pub use mathgraph_registry::{all_names, get, is_known, list_functions, FunctionInfo};

use mathgraph_graph::{MathOp, NodeKind, NodeSetter, Operand, OutputRef, Tag, Value, VectorOp};
use mathgraph_registry::{any_vector, first_output, Result};

/// Build a single scalar math node.
pub(crate) fn scalar_node(setter: &mut NodeSetter<'_>, tag: &Tag, op: MathOp, operands: &[Operand]) -> Result<OutputRef> {
    kind_node(setter, tag, NodeKind::Math(op), operands)
}

/// Build a scalar node, or its vector counterpart when any operand is a vector.
pub(crate) fn dual_node(
    setter: &mut NodeSetter<'_>,
    tag: &Tag,
    scalar: MathOp,
    vector: VectorOp,
    operands: &[Operand],
) -> Result<OutputRef> {
    let kind = if any_vector(setter, operands) {
        NodeKind::VectorMath(vector)
    } else {
        NodeKind::Math(scalar)
    };
    kind_node(setter, tag, kind, operands)
}

/// Build a node of a fixed kind.
pub(crate) fn kind_node(setter: &mut NodeSetter<'_>, tag: &Tag, kind: NodeKind, operands: &[Operand]) -> Result<OutputRef> {
    let node = setter.find_or_create(tag, kind, operands)?;
    Ok(first_output(node))
}

/// Scalar result of evaluating a node kind on floats.
pub(crate) fn eval_kind(kind: NodeKind, args: &[f64]) -> f64 {
    let inputs: Vec<Value> = args.iter().map(|a| Value::Float(*a)).collect();
    kind.evaluate(&inputs)
        .first()
        .and_then(Value::as_float)
        .unwrap_or(0.0)
}
