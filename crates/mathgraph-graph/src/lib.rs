//! Node graph abstraction for the expression compiler.
//!
//! The compiler never talks to a host graph directly. It goes through:
//!
//! - [`GraphBackend`] - the operations it needs from a host node tree
//! - [`NodeKind`] - the fixed-function nodes it knows how to create
//! - [`Tag`] - content-derived node names
//! - [`NodeSetter`] - the per-pass cache that turns "I need this node" into
//!   the minimum set of graph mutations
//!
//! [`MemoryGraph`] is a complete in-memory backend that can also evaluate
//! its outputs.

pub mod backend;
pub mod error;
pub mod memory;
pub mod node;
pub mod setter;
pub mod tag;
pub mod types;

pub use backend::GraphBackend;
pub use error::{GraphError, Result};
pub use memory::{MemoryGraph, MemoryLink, MemoryNode, MemorySocket};
pub use node::{MathOp, NodeKind, SocketSpec, VectorOp};
pub use setter::{NodeSetter, SetterReport, DEFAULT_NODE_SPACING};
pub use tag::{Tag, FLOAT_IDENTITY, VECTOR_IDENTITY};
pub use types::{InputRef, LinkHandle, NodeHandle, Operand, OutputRef, SocketType, Value};
