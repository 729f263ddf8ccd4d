//! Symbolic value errors.

use mathgraph_registry::FunctionError;
use thiserror::Error;

use crate::kind::ValueKind;

/// Symbolic result type alias.
pub type Result<T> = std::result::Result<T, SocketTypeError>;

/// An operation the value types do not allow.
///
/// Raised before any node is created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SocketTypeError {
    /// The operand kinds do not combine under this operation.
    #[error("Cannot use '{operation}' on '{name}': {lhs} and {rhs} are incompatible")]
    Incompatible {
        /// Operation symbol or method name.
        operation: String,
        /// Display name of the offending value.
        name: String,
        /// Left operand type.
        lhs: String,
        /// Right operand type (`-` for unary operations).
        rhs: String,
    },

    /// No interface socket of that name and type.
    #[error("The {kind} socket '{name}' does not exist")]
    MissingSocket {
        /// Socket name.
        name: String,
        /// Expected value kind.
        kind: ValueKind,
    },

    /// A literal sequence that is not three long.
    #[error("A sequence of {0} elements cannot be a Vector")]
    SequenceLength(usize),

    /// Component access past the end of a vector.
    #[error("Index {index} out of range for Vector '{name}'")]
    IndexOutOfRange {
        /// Display name of the vector.
        name: String,
        /// Requested index.
        index: isize,
    },

    /// The function library refused the call.
    #[error(transparent)]
    Function(#[from] FunctionError),
}

impl From<mathgraph_graph::GraphError> for SocketTypeError {
    fn from(err: mathgraph_graph::GraphError) -> Self {
        SocketTypeError::Function(FunctionError::Graph(err))
    }
}
