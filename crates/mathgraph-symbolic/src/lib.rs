// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Typed symbolic values.
//!
//! A script-facing front end: named inputs become [`SymbolicValue`]s, and
//! arithmetic on them builds the same tagged nodes the expression compiler
//! builds. Every value is a scalar, a vector or a sink; operations whose
//! kinds do not combine fail with [`SocketTypeError`] before any node is
//! created.
//!
//! ```no_run
//! # use mathgraph_graph::{MemoryGraph, SocketType};
//! # use mathgraph_symbolic::*;
//! let mut graph = MemoryGraph::with_interface(
//!     &[("a", SocketType::Float)],
//!     &[("out", SocketType::Float)],
//! ).unwrap();
//! let ns = make_symbolic_namespace(NodeContext::new(&mut graph));
//! let a = ns.input_scalar("a").unwrap();
//! let doubled = (&a * 2.0).unwrap();
//! ns.output_scalar("out", &doubled).unwrap();
//! ns.finish().unwrap();
//! ```

// Linking the function library registers it.
use mathgraph_functions as _;

mod error;
mod kind;
mod namespace;
mod session;
mod value;
mod vector;

pub use error::{Result, SocketTypeError};
pub use kind::{dispatch, Operator, ValueKind};
pub use namespace::{make_symbolic_namespace, Constructor, Namespace};
pub use session::NodeContext;
pub use value::{Arg, SymbolicValue, Target, ANONYMOUS};
