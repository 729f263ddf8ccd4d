//! Trigonometry
//!
//! Angles are in radians.

use mathgraph_graph::MathOp;

const CATEGORY: &str = "trigonometry";

scalar_function!(SIN, "sin", ["a"], MathOp::Sine, CATEGORY, "Sine of a");
scalar_function!(COS, "cos", ["a"], MathOp::Cosine, CATEGORY, "Cosine of a");
scalar_function!(TAN, "tan", ["a"], MathOp::Tangent, CATEGORY, "Tangent of a");
scalar_function!(ASIN, "asin", ["a"], MathOp::Arcsine, CATEGORY, "Arcsine of a");
scalar_function!(ACOS, "acos", ["a"], MathOp::Arccosine, CATEGORY, "Arccosine of a");
scalar_function!(ATAN, "atan", ["a"], MathOp::Arctangent, CATEGORY, "Arctangent of a");
scalar_function!(COSH, "cosh", ["a"], MathOp::Cosh, CATEGORY, "Hyperbolic cosine of a");
scalar_function!(SINH, "sinh", ["a"], MathOp::Sinh, CATEGORY, "Hyperbolic sine of a");
scalar_function!(TANH, "tanh", ["a"], MathOp::Tanh, CATEGORY, "Hyperbolic tangent of a");
scalar_function!(ATAN2, "atan2", ["a", "b"], MathOp::Arctan2, CATEGORY, "Angle of the point (b, a)");
scalar_function!(RAD, "rad", ["a"], MathOp::Radians, CATEGORY, "Degrees to radians");
scalar_function!(DEG, "deg", ["a"], MathOp::Degrees, CATEGORY, "Radians to degrees");

#[cfg(test)]
mod tests {
    use crate::tests::build_and_eval;
    use std::f64::consts::PI;

    #[test]
    fn test_conversions() {
        assert!((build_and_eval("rad", 180.0, &[]) - PI).abs() < 1e-12);
        assert!((build_and_eval("deg", PI, &[]) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_atan2_argument_order() {
        // atan2(a, b): a is the y component.
        assert!((build_and_eval("atan2", 1.0, &[0.0]) - PI / 2.0).abs() < 1e-12);
    }
}
