//! Rounding

use mathgraph_graph::MathOp;

const CATEGORY: &str = "rounding";

scalar_function!(ROUND, "round", ["a"], MathOp::Round, CATEGORY, "a rounded to the nearest integer");
scalar_function!(CEIL, "ceil", ["a"], MathOp::Ceil, CATEGORY, "Smallest integer not below a");
scalar_function!(TRUNC, "trunc", ["a"], MathOp::Trunc, CATEGORY, "a with its fractional part dropped");
scalar_function!(FRAC, "frac", ["a"], MathOp::Fraction, CATEGORY, "a minus floor(a)");
scalar_function!(SIGN, "sign", ["a"], MathOp::Sign, CATEGORY, "-1, 0 or 1 following the sign of a");

#[cfg(test)]
mod tests {
    use crate::tests::build_and_eval;

    #[test]
    fn test_rounding_negative_values() {
        assert_eq!(build_and_eval("round", -2.5, &[]), -2.0);
        assert_eq!(build_and_eval("ceil", -2.5, &[]), -2.0);
        assert_eq!(build_and_eval("trunc", -2.5, &[]), -2.0);
        assert_eq!(build_and_eval("frac", -2.25, &[]), 0.75);
        assert_eq!(build_and_eval("sign", -2.5, &[]), -1.0);
    }
}
