//! Fixed-function node kinds and their evaluation semantics.
//!
//! Every kind knows its static sockets and how to compute its outputs from
//! its inputs. The group interface nodes ([`NodeKind::GroupInput`] and
//! [`NodeKind::GroupOutput`]) have no static sockets; their sockets are the
//! graph interface and live in the backend.
//!
//! Scalar operations follow the host's "safe" math: a division by zero, the
//! square root of a negative number or the logarithm of a non-positive
//! number yields `0` instead of a NaN or infinity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{SocketType, Value};

/// Scalar math operation of a [`NodeKind::Math`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Logarithm,
    Sqrt,
    InverseSqrt,
    Absolute,
    Exponent,
    Minimum,
    Maximum,
    Sign,
    Round,
    Floor,
    Ceil,
    Trunc,
    Fraction,
    /// Floored modulo (result takes the sign of the divisor).
    Modulo,
    Wrap,
    Snap,
    PingPong,
    Sine,
    Cosine,
    Tangent,
    Arcsine,
    Arccosine,
    Arctangent,
    Arctan2,
    Sinh,
    Cosh,
    Tanh,
    Radians,
    Degrees,
}

impl MathOp {
    /// Number of inputs.
    pub fn arity(self) -> usize {
        use MathOp::*;
        match self {
            Wrap => 3,
            Add | Subtract | Multiply | Divide | Power | Logarithm | Minimum | Maximum
            | Modulo | Snap | PingPong | Arctan2 => 2,
            _ => 1,
        }
    }

    /// Host identifier of the operation (`"ADD"`, `"ARCTAN2"`, ...).
    pub fn host_name(self) -> &'static str {
        use MathOp::*;
        match self {
            Add => "ADD",
            Subtract => "SUBTRACT",
            Multiply => "MULTIPLY",
            Divide => "DIVIDE",
            Power => "POWER",
            Logarithm => "LOGARITHM",
            Sqrt => "SQRT",
            InverseSqrt => "INVERSE_SQRT",
            Absolute => "ABSOLUTE",
            Exponent => "EXPONENT",
            Minimum => "MINIMUM",
            Maximum => "MAXIMUM",
            Sign => "SIGN",
            Round => "ROUND",
            Floor => "FLOOR",
            Ceil => "CEIL",
            Trunc => "TRUNC",
            Fraction => "FRACT",
            Modulo => "FLOORED_MODULO",
            Wrap => "WRAP",
            Snap => "SNAP",
            PingPong => "PINGPONG",
            Sine => "SINE",
            Cosine => "COSINE",
            Tangent => "TANGENT",
            Arcsine => "ARCSINE",
            Arccosine => "ARCCOSINE",
            Arctangent => "ARCTANGENT",
            Arctan2 => "ARCTAN2",
            Sinh => "SINH",
            Cosh => "COSH",
            Tanh => "TANH",
            Radians => "RADIANS",
            Degrees => "DEGREES",
        }
    }

    /// Apply the operation. Missing arguments read as `0`.
    pub fn apply(self, args: &[f64]) -> f64 {
        use MathOp::*;
        let a = args.first().copied().unwrap_or(0.0);
        let b = args.get(1).copied().unwrap_or(0.0);
        let c = args.get(2).copied().unwrap_or(0.0);
        match self {
            Add => a + b,
            Subtract => a - b,
            Multiply => a * b,
            Divide => safe_divide(a, b),
            Power => safe_power(a, b),
            Logarithm => {
                if a > 0.0 && b > 0.0 && b != 1.0 {
                    a.ln() / b.ln()
                } else {
                    0.0
                }
            }
            Sqrt => {
                if a > 0.0 {
                    a.sqrt()
                } else {
                    0.0
                }
            }
            InverseSqrt => {
                if a > 0.0 {
                    1.0 / a.sqrt()
                } else {
                    0.0
                }
            }
            Absolute => a.abs(),
            Exponent => a.exp(),
            Minimum => a.min(b),
            Maximum => a.max(b),
            Sign => {
                if a > 0.0 {
                    1.0
                } else if a < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Round => (a + 0.5).floor(),
            Floor => a.floor(),
            Ceil => a.ceil(),
            Trunc => a.trunc(),
            Fraction => a - a.floor(),
            Modulo => {
                if b == 0.0 {
                    0.0
                } else {
                    a - b * (a / b).floor()
                }
            }
            Wrap => wrap(a, b, c),
            Snap => {
                if b == 0.0 {
                    0.0
                } else {
                    (a / b).floor() * b
                }
            }
            PingPong => {
                if b == 0.0 {
                    0.0
                } else {
                    let t = (a - b) / (b * 2.0);
                    ((t - t.floor()) * b * 2.0 - b).abs()
                }
            }
            Sine => a.sin(),
            Cosine => a.cos(),
            Tangent => a.tan(),
            Arcsine => a.asin(),
            Arccosine => a.acos(),
            Arctangent => a.atan(),
            Arctan2 => a.atan2(b),
            Sinh => a.sinh(),
            Cosh => a.cosh(),
            Tanh => a.tanh(),
            Radians => a.to_radians(),
            Degrees => a.to_degrees(),
        }
    }
}

fn safe_divide(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        0.0
    } else {
        a / b
    }
}

/// Negative bases only accept integral exponents.
fn safe_power(a: f64, b: f64) -> f64 {
    if a >= 0.0 || b.fract() == 0.0 {
        a.powf(b)
    } else {
        0.0
    }
}

/// Wrap `value` into `[min, max)`.
fn wrap(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range == 0.0 {
        min
    } else {
        value - range * ((value - min) / range).floor()
    }
}

/// Component-wise operation of a [`NodeKind::VectorMath`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
    Absolute,
    Floor,
}

impl VectorOp {
    /// Number of inputs.
    pub fn arity(self) -> usize {
        match self {
            VectorOp::Absolute | VectorOp::Floor => 1,
            _ => 2,
        }
    }

    /// The scalar operation applied to each component.
    pub fn component_op(self) -> MathOp {
        match self {
            VectorOp::Add => MathOp::Add,
            VectorOp::Subtract => MathOp::Subtract,
            VectorOp::Multiply => MathOp::Multiply,
            VectorOp::Divide => MathOp::Divide,
            VectorOp::Power => MathOp::Power,
            VectorOp::Modulo => MathOp::Modulo,
            VectorOp::Absolute => MathOp::Absolute,
            VectorOp::Floor => MathOp::Floor,
        }
    }

    /// Host identifier of the operation.
    pub fn host_name(self) -> &'static str {
        match self {
            VectorOp::Modulo => "MODULO",
            other => other.component_op().host_name(),
        }
    }

    /// Apply the operation component by component.
    pub fn apply(self, args: &[[f64; 3]]) -> [f64; 3] {
        let op = self.component_op();
        let mut out = [0.0; 3];
        for (axis, slot) in out.iter_mut().enumerate() {
            let components: Vec<f64> = args.iter().map(|v| v[axis]).collect();
            *slot = op.apply(&components);
        }
        out
    }
}

/// Static description of one socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketSpec {
    /// Display name.
    pub name: &'static str,
    /// Value type.
    pub ty: SocketType,
}

const fn float(name: &'static str) -> SocketSpec {
    SocketSpec {
        name,
        ty: SocketType::Float,
    }
}

const fn vector(name: &'static str) -> SocketSpec {
    SocketSpec {
        name,
        ty: SocketType::Vector,
    }
}

const MATH_INPUTS: [SocketSpec; 3] = [float("Value"), float("Value_001"), float("Value_002")];
const VECTOR_INPUTS: [SocketSpec; 2] = [vector("Vector"), vector("Vector_001")];

/// Kind of a node the compiler can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Scalar math.
    Math(MathOp),
    /// Component-wise vector math.
    VectorMath(VectorOp),
    /// `clamp(value, min, max)`.
    Clamp,
    /// Linear remap of a value from one range to another.
    MapRange,
    /// Linear interpolation `a + (b - a) * factor`.
    Mix,
    /// Vector to three floats.
    SeparateXyz,
    /// Three floats to a vector.
    CombineXyz,
    /// A float constant held on its single input.
    Value,
    /// Graph interface inputs, exposed as outputs.
    GroupInput,
    /// Graph interface outputs, exposed as inputs.
    GroupOutput,
}

impl NodeKind {
    /// Static input sockets.
    pub fn inputs(&self) -> Vec<SocketSpec> {
        match self {
            NodeKind::Math(op) => MATH_INPUTS[..op.arity()].to_vec(),
            NodeKind::VectorMath(op) => VECTOR_INPUTS[..op.arity()].to_vec(),
            NodeKind::Clamp => vec![float("Value"), float("Min"), float("Max")],
            NodeKind::MapRange => vec![
                float("Value"),
                float("From Min"),
                float("From Max"),
                float("To Min"),
                float("To Max"),
            ],
            NodeKind::Mix => vec![float("Factor"), float("A"), float("B")],
            NodeKind::SeparateXyz => vec![vector("Vector")],
            NodeKind::CombineXyz => vec![float("X"), float("Y"), float("Z")],
            NodeKind::Value => vec![float("Value")],
            NodeKind::GroupInput | NodeKind::GroupOutput => Vec::new(),
        }
    }

    /// Static output sockets.
    pub fn outputs(&self) -> Vec<SocketSpec> {
        match self {
            NodeKind::Math(_) | NodeKind::Value => vec![float("Value")],
            NodeKind::VectorMath(_) | NodeKind::CombineXyz => vec![vector("Vector")],
            NodeKind::Clamp => vec![float("Result")],
            NodeKind::MapRange | NodeKind::Mix => vec![float("Result")],
            NodeKind::SeparateXyz => vec![float("X"), float("Y"), float("Z")],
            NodeKind::GroupInput | NodeKind::GroupOutput => Vec::new(),
        }
    }

    /// Whether the kind is one of the two interface nodes.
    pub fn is_interface(&self) -> bool {
        matches!(self, NodeKind::GroupInput | NodeKind::GroupOutput)
    }

    /// Label shown on a fresh node.
    pub fn default_label(&self) -> String {
        match self {
            NodeKind::Math(op) => format!("Math {}", op.host_name()),
            NodeKind::VectorMath(op) => format!("Vector Math {}", op.host_name()),
            NodeKind::Clamp => "Clamp".to_string(),
            NodeKind::MapRange => "Map Range".to_string(),
            NodeKind::Mix => "Mix".to_string(),
            NodeKind::SeparateXyz => "Separate XYZ".to_string(),
            NodeKind::CombineXyz => "Combine XYZ".to_string(),
            NodeKind::Value => "Value".to_string(),
            NodeKind::GroupInput => "Group Input".to_string(),
            NodeKind::GroupOutput => "Group Output".to_string(),
        }
    }

    /// Compute outputs from inputs already converted to the input socket
    /// types.
    ///
    /// Interface nodes produce nothing here; their values come from the
    /// evaluation context.
    pub fn evaluate(&self, inputs: &[Value]) -> Vec<Value> {
        let floats: Vec<f64> = inputs
            .iter()
            .map(|v| v.convert(SocketType::Float).as_float().unwrap_or(0.0))
            .collect();
        let arg = |i: usize| floats.get(i).copied().unwrap_or(0.0);

        match self {
            NodeKind::Math(op) => vec![Value::Float(op.apply(&floats))],
            NodeKind::VectorMath(op) => {
                let vectors: Vec<[f64; 3]> = inputs
                    .iter()
                    .map(|v| v.convert(SocketType::Vector).as_vector().unwrap_or([0.0; 3]))
                    .collect();
                vec![Value::Vector(op.apply(&vectors))]
            }
            NodeKind::Clamp => vec![Value::Float(arg(0).max(arg(1)).min(arg(2)))],
            NodeKind::MapRange => {
                let (value, from_min, from_max, to_min, to_max) =
                    (arg(0), arg(1), arg(2), arg(3), arg(4));
                let t = safe_divide(value - from_min, from_max - from_min);
                vec![Value::Float(to_min + t * (to_max - to_min))]
            }
            NodeKind::Mix => vec![Value::Float(arg(1) + (arg(2) - arg(1)) * arg(0))],
            NodeKind::SeparateXyz => {
                let v = inputs
                    .first()
                    .map(|v| v.convert(SocketType::Vector).as_vector().unwrap_or([0.0; 3]))
                    .unwrap_or([0.0; 3]);
                v.iter().map(|c| Value::Float(*c)).collect()
            }
            NodeKind::CombineXyz => vec![Value::Vector([arg(0), arg(1), arg(2)])],
            NodeKind::Value => vec![Value::Float(arg(0))],
            NodeKind::GroupInput | NodeKind::GroupOutput => Vec::new(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_label())
    }
}
