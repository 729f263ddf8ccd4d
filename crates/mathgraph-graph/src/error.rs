//! Errors raised by graph backends and the node setter.

use thiserror::Error;

use crate::node::NodeKind;
use crate::types::{InputRef, NodeHandle, OutputRef, SocketType};

/// Graph result type alias.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while reading or mutating a backend graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A node handle that the backend does not know.
    #[error("unknown node {0}")]
    UnknownNode(NodeHandle),

    /// An input position past the node's inputs.
    #[error("node {} has no input {}", .0.node, .0.index)]
    UnknownInput(InputRef),

    /// An output position past the node's outputs.
    #[error("node {} has no output {}", .0.node, .0.index)]
    UnknownOutput(OutputRef),

    /// A link handle that the backend does not know.
    #[error("unknown link")]
    UnknownLink,

    /// An interface socket name that does not exist.
    #[error("no interface socket named '{0}'")]
    UnknownSocket(String),

    /// An interface socket name that is already taken.
    #[error("interface socket '{0}' already exists")]
    DuplicateSocket(String),

    /// The interface nodes cannot be removed.
    #[error("node {0} is part of the graph interface")]
    ProtectedNode(NodeHandle),

    /// A node was given the wrong number of operands.
    #[error("{kind} takes {expected} operands, got {found}")]
    OperandCount {
        /// Kind being created.
        kind: NodeKind,
        /// Inputs on that kind.
        expected: usize,
        /// Operands supplied.
        found: usize,
    },

    /// A constant that cannot be stored in the target socket.
    #[error("cannot store a {found} constant in a {expected} socket")]
    ConstantType {
        /// Socket type.
        expected: SocketType,
        /// Constant type.
        found: SocketType,
    },

    /// A link that would feed a node into itself.
    #[error("link would create a cycle through {0}")]
    Cycle(NodeHandle),

    /// An interface input that had no value during evaluation.
    #[error("no value for interface input '{0}'")]
    MissingInput(String),
}
