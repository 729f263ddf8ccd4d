//! Range
//!
//! Functions that bound, blend or remap a value.

use linkme::distributed_slice;
use mathgraph_graph::{MathOp, NodeKind};
use mathgraph_registry::{FunctionDescriptor, Support, FUNCTIONS};

use crate::{eval_kind, kind_node};

const CATEGORY: &str = "range";

scalar_function!(MIN, "min", ["a", "b"], MathOp::Minimum, CATEGORY, "Smaller of a and b");
scalar_function!(MAX, "max", ["a", "b"], MathOp::Maximum, CATEGORY, "Larger of a and b");
scalar_function!(WRAP, "wrap", ["v", "a", "b"], MathOp::Wrap, CATEGORY, "v wrapped into the range [a, b)");
scalar_function!(SNAP, "snap", ["v", "step"], MathOp::Snap, CATEGORY, "v rounded down to a multiple of step");
scalar_function!(PINGPONG, "pingpong", ["v", "scale"], MathOp::PingPong, CATEGORY, "v bounced back and forth between 0 and scale");

/// Clamp: `clamp(v, a, b)`
#[distributed_slice(FUNCTIONS)]
static CLAMP: FunctionDescriptor = FunctionDescriptor {
    name: "clamp",
    params: &["v", "a", "b"],
    doc: "v limited to the range [a, b]",
    long_doc: "",
    category: CATEGORY,
    support: Support::ScalarOnly,
    build: |setter, tag, operands| kind_node(setter, tag, NodeKind::Clamp, operands),
    eval: |args| eval_kind(NodeKind::Clamp, args),
};

/// Linear interpolation: `lerp(f, a, b)`
#[distributed_slice(FUNCTIONS)]
static LERP: FunctionDescriptor = FunctionDescriptor {
    name: "lerp",
    params: &["f", "a", "b"],
    doc: "Blend from a to b by factor f",
    long_doc: "f = 0 gives a, f = 1 gives b; f is not clamped.",
    category: CATEGORY,
    support: Support::ScalarOnly,
    build: |setter, tag, operands| kind_node(setter, tag, NodeKind::Mix, operands),
    eval: |args| eval_kind(NodeKind::Mix, args),
};

/// Remap: `remap(v, a, b, x, y)`
#[distributed_slice(FUNCTIONS)]
static REMAP: FunctionDescriptor = FunctionDescriptor {
    name: "remap",
    params: &["v", "a", "b", "x", "y"],
    doc: "v mapped from the range [a, b] to [x, y]",
    long_doc: "The mapping is linear and unclamped. An empty source range gives x.",
    category: CATEGORY,
    support: Support::ScalarOnly,
    build: |setter, tag, operands| kind_node(setter, tag, NodeKind::MapRange, operands),
    eval: |args| eval_kind(NodeKind::MapRange, args),
};
