//! Arithmetic
//!
//! The functions the operators lower to. All of them accept vectors: a
//! vector operand selects the component-wise vector node.

use linkme::distributed_slice;
use mathgraph_graph::{MathOp, NodeSetter, Operand, OutputRef, Tag, VectorOp};
use mathgraph_registry::{any_vector, FunctionDescriptor, Result, Support, FUNCTIONS};

use crate::dual_node;

const CATEGORY: &str = "arithmetic";

// === Binary operators ===

/// Addition: `add(a, b)` → `a + b`
#[distributed_slice(FUNCTIONS)]
static ADD: FunctionDescriptor = FunctionDescriptor {
    name: "add",
    params: &["a", "b"],
    doc: "a + b",
    long_doc: "",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Add, VectorOp::Add, operands),
    eval: |args| MathOp::Add.apply(args),
};

/// Subtraction: `sub(a, b)` → `a - b`
#[distributed_slice(FUNCTIONS)]
static SUB: FunctionDescriptor = FunctionDescriptor {
    name: "sub",
    params: &["a", "b"],
    doc: "a - b",
    long_doc: "",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Subtract, VectorOp::Subtract, operands),
    eval: |args| MathOp::Subtract.apply(args),
};

/// Multiplication: `mult(a, b)` → `a * b`
#[distributed_slice(FUNCTIONS)]
static MULT: FunctionDescriptor = FunctionDescriptor {
    name: "mult",
    params: &["a", "b"],
    doc: "a * b",
    long_doc: "Vectors multiply component by component.",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Multiply, VectorOp::Multiply, operands),
    eval: |args| MathOp::Multiply.apply(args),
};

/// Division: `div(a, b)` → `a / b`
#[distributed_slice(FUNCTIONS)]
static DIV: FunctionDescriptor = FunctionDescriptor {
    name: "div",
    params: &["a", "b"],
    doc: "a / b",
    long_doc: "Division by zero gives 0.",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Divide, VectorOp::Divide, operands),
    eval: |args| MathOp::Divide.apply(args),
};

/// Power: `pow(a, n)` → `a ** n`
#[distributed_slice(FUNCTIONS)]
static POW: FunctionDescriptor = FunctionDescriptor {
    name: "pow",
    params: &["a", "n"],
    doc: "a raised to the power n",
    long_doc: "A negative base only accepts an integral exponent; anything else gives 0.",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Power, VectorOp::Power, operands),
    eval: |args| MathOp::Power.apply(args),
};

/// Modulo: `mod(a, b)` → `a % b`
#[distributed_slice(FUNCTIONS)]
static MOD: FunctionDescriptor = FunctionDescriptor {
    name: "mod",
    params: &["a", "b"],
    doc: "Remainder of a / b",
    long_doc: "Floored: the result takes the sign of b.",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Modulo, VectorOp::Modulo, operands),
    eval: |args| MathOp::Modulo.apply(args),
};

/// Floor division: `floordiv(a, b)` → `a // b`
#[distributed_slice(FUNCTIONS)]
static FLOORDIV: FunctionDescriptor = FunctionDescriptor {
    name: "floordiv",
    params: &["a", "b"],
    doc: "a / b rounded down",
    long_doc: "Built as floor(div(a, b)).",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: build_floordiv,
    eval: |args| MathOp::Floor.apply(&[MathOp::Divide.apply(args)]),
};

fn build_floordiv(setter: &mut NodeSetter<'_>, tag: &Tag, operands: &[Operand]) -> Result<OutputRef> {
    let quotient = dual_node(setter, &tag.child("div"), MathOp::Divide, VectorOp::Divide, operands)?;
    let quotient = Operand::Socket(quotient);
    dual_node(setter, &tag.child("floor"), MathOp::Floor, VectorOp::Floor, &[quotient])
}

// === Unary ===

/// Absolute value: `abs(a)`
#[distributed_slice(FUNCTIONS)]
static ABS: FunctionDescriptor = FunctionDescriptor {
    name: "abs",
    params: &["a"],
    doc: "Absolute value of a",
    long_doc: "",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Absolute, VectorOp::Absolute, operands),
    eval: |args| MathOp::Absolute.apply(args),
};

/// Negation: `neg(a)` → `-a`
#[distributed_slice(FUNCTIONS)]
static NEG: FunctionDescriptor = FunctionDescriptor {
    name: "neg",
    params: &["a"],
    doc: "-a",
    long_doc: "Built as sub(0, a).",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: build_neg,
    eval: |args| MathOp::Subtract.apply(&[0.0, args[0]]),
};

fn build_neg(setter: &mut NodeSetter<'_>, tag: &Tag, operands: &[Operand]) -> Result<OutputRef> {
    let zero = if any_vector(setter, operands) {
        Operand::Vector([0.0; 3])
    } else {
        Operand::Float(0.0)
    };
    dual_node(
        setter,
        &tag.child("sub"),
        MathOp::Subtract,
        VectorOp::Subtract,
        &[zero, operands[0]],
    )
}

/// Floor: `floor(a)`
#[distributed_slice(FUNCTIONS)]
static FLOOR: FunctionDescriptor = FunctionDescriptor {
    name: "floor",
    params: &["a"],
    doc: "Largest integer not above a",
    long_doc: "",
    category: CATEGORY,
    support: Support::ScalarOrVector,
    build: |setter, tag, operands| dual_node(setter, tag, MathOp::Floor, VectorOp::Floor, operands),
    eval: |args| MathOp::Floor.apply(args),
};
