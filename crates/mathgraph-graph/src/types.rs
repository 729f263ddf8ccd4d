//! Core value and reference types shared by every graph backend.
//!
//! # Key Types
//!
//! - [`Value`] - A constant socket value (Float or Vector)
//! - [`SocketType`] - The two value types a socket can carry
//! - [`NodeHandle`] / [`LinkHandle`] - Opaque backend identifiers
//! - [`OutputRef`] / [`InputRef`] - A socket on a node, by position
//! - [`Operand`] - What a function receives: a socket or a literal

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type carried by a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketType {
    /// Single float.
    Float,
    /// Three floats.
    Vector,
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketType::Float => write!(f, "Float"),
            SocketType::Vector => write!(f, "Vector"),
        }
    }
}

/// A constant socket value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Single float.
    Float(f64),
    /// Three floats.
    Vector([f64; 3]),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<[f64; 3]> for Value {
    fn from(v: [f64; 3]) -> Self {
        Value::Vector(v)
    }
}

impl Value {
    /// Zero of the given type.
    pub fn zero(ty: SocketType) -> Self {
        match ty {
            SocketType::Float => Value::Float(0.0),
            SocketType::Vector => Value::Vector([0.0; 3]),
        }
    }

    /// Socket type this value fits.
    pub fn socket_type(&self) -> SocketType {
        match self {
            Value::Float(_) => SocketType::Float,
            Value::Vector(_) => SocketType::Vector,
        }
    }

    /// Float payload, if scalar.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Vector(_) => None,
        }
    }

    /// Vector payload, if vector.
    pub fn as_vector(&self) -> Option<[f64; 3]> {
        match self {
            Value::Vector(v) => Some(*v),
            Value::Float(_) => None,
        }
    }

    /// Convert the way a link between mismatched sockets converts.
    ///
    /// A float broadcasts to all three components; a vector collapses to
    /// the average of its components.
    pub fn convert(self, ty: SocketType) -> Self {
        match (self, ty) {
            (Value::Float(v), SocketType::Vector) => Value::Vector([v; 3]),
            (Value::Vector([x, y, z]), SocketType::Float) => Value::Float((x + y + z) / 3.0),
            (value, _) => value,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{}", v),
            Value::Vector([x, y, z]) => write!(f, "({}, {}, {})", x, y, z),
        }
    }
}

/// Opaque node identifier handed out by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHandle(pub u32);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Opaque link identifier handed out by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkHandle(pub u32);

/// An output socket, by node and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    /// Producing node.
    pub node: NodeHandle,
    /// Output position on that node.
    pub index: usize,
}

impl OutputRef {
    /// Create an output reference.
    pub fn new(node: NodeHandle, index: usize) -> Self {
        Self { node, index }
    }
}

/// An input socket, by node and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputRef {
    /// Consuming node.
    pub node: NodeHandle,
    /// Input position on that node.
    pub index: usize,
}

impl InputRef {
    /// Create an input reference.
    pub fn new(node: NodeHandle, index: usize) -> Self {
        Self { node, index }
    }
}

/// A function operand: either something to link or a constant to set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// Output socket of another node.
    Socket(OutputRef),
    /// Float literal.
    Float(f64),
    /// Vector literal.
    Vector([f64; 3]),
}

impl Operand {
    /// Constant value, if this operand is a literal.
    pub fn constant(&self) -> Option<Value> {
        match self {
            Operand::Socket(_) => None,
            Operand::Float(v) => Some(Value::Float(*v)),
            Operand::Vector(v) => Some(Value::Vector(*v)),
        }
    }

    /// Output socket, if this operand is a reference.
    pub fn socket(&self) -> Option<OutputRef> {
        match self {
            Operand::Socket(output) => Some(*output),
            _ => None,
        }
    }
}

impl From<OutputRef> for Operand {
    fn from(output: OutputRef) -> Self {
        Operand::Socket(output)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Float(value)
    }
}

impl From<[f64; 3]> for Operand {
    fn from(value: [f64; 3]) -> Self {
        Operand::Vector(value)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        match value {
            Value::Float(v) => Operand::Float(v),
            Value::Vector(v) => Operand::Vector(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_between_socket_types() {
        assert_eq!(Value::Float(2.0).convert(SocketType::Vector), Value::Vector([2.0; 3]));
        assert_eq!(
            Value::Vector([1.0, 2.0, 6.0]).convert(SocketType::Float),
            Value::Float(3.0)
        );
        assert_eq!(Value::Float(1.5).convert(SocketType::Float), Value::Float(1.5));
    }

    #[test]
    fn test_operand_views() {
        let socket = Operand::from(OutputRef::new(NodeHandle(3), 1));
        assert_eq!(socket.socket(), Some(OutputRef::new(NodeHandle(3), 1)));
        assert_eq!(socket.constant(), None);
        assert_eq!(Operand::from(2.0).constant(), Some(Value::Float(2.0)));
        assert_eq!(
            Operand::from(Value::Vector([1.0, 0.0, 0.0])),
            Operand::Vector([1.0, 0.0, 0.0])
        );
    }

    #[test]
    fn test_value_serde() {
        let json = serde_json::to_string(&Value::Vector([1.0, 2.0, 3.0])).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Vector([1.0, 2.0, 3.0]));
    }
}
