//! Exponent and logarithm

use linkme::distributed_slice;
use mathgraph_graph::{MathOp, NodeSetter, Operand, OutputRef, Tag};
use mathgraph_registry::{FunctionDescriptor, Result, Support, FUNCTIONS};

use crate::scalar_node;

const CATEGORY: &str = "exponent";

scalar_function!(SQRT, "sqrt", ["a"], MathOp::Sqrt, CATEGORY, "Square root of a");
scalar_function!(INVSQRT, "invsqrt", ["a"], MathOp::InverseSqrt, CATEGORY, "1 / sqrt(a)");
scalar_function!(EXP, "exp", ["a"], MathOp::Exponent, CATEGORY, "e raised to the power a");
scalar_function!(LOG, "log", ["a", "b"], MathOp::Logarithm, CATEGORY, "Logarithm of a in base b");

/// Natural log: `ln(a)`
#[distributed_slice(FUNCTIONS)]
static LN: FunctionDescriptor = FunctionDescriptor {
    name: "ln",
    params: &["a"],
    doc: "Natural logarithm of a",
    long_doc: "Built as log(a, e).",
    category: CATEGORY,
    support: Support::ScalarOnly,
    build: |setter, tag, operands| {
        scalar_node(setter, tag, MathOp::Logarithm, &[operands[0], Operand::Float(std::f64::consts::E)])
    },
    eval: |args| MathOp::Logarithm.apply(&[args[0], std::f64::consts::E]),
};

/// N-th root: `nroot(a, n)`
#[distributed_slice(FUNCTIONS)]
static NROOT: FunctionDescriptor = FunctionDescriptor {
    name: "nroot",
    params: &["a", "n"],
    doc: "n-th root of a",
    long_doc: "Built as pow(a, div(1, n)).",
    category: CATEGORY,
    support: Support::ScalarOnly,
    build: build_nroot,
    eval: |args| MathOp::Power.apply(&[args[0], MathOp::Divide.apply(&[1.0, args[1]])]),
};

fn build_nroot(setter: &mut NodeSetter<'_>, tag: &Tag, operands: &[Operand]) -> Result<OutputRef> {
    let exponent = scalar_node(setter, &tag.child("div"), MathOp::Divide, &[Operand::Float(1.0), operands[1]])?;
    scalar_node(
        setter,
        &tag.child("pow"),
        MathOp::Power,
        &[operands[0], Operand::Socket(exponent)],
    )
}

#[cfg(test)]
mod tests {
    use crate::tests::build_and_eval;

    #[test]
    fn test_nroot() {
        assert!((build_and_eval("nroot", 27.0, &[3.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ln_and_log() {
        assert!((build_and_eval("ln", std::f64::consts::E, &[]) - 1.0).abs() < 1e-12);
        assert!((build_and_eval("log", 1000.0, &[10.0]) - 3.0).abs() < 1e-12);
        assert_eq!(build_and_eval("log", -1.0, &[10.0]), 0.0);
    }

    #[test]
    fn test_safe_roots() {
        assert_eq!(build_and_eval("sqrt", -4.0, &[]), 0.0);
        assert_eq!(build_and_eval("invsqrt", 4.0, &[]), 0.5);
    }
}
