// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Math expressions to node graphs.
//!
//! Host entry points:
//!
//! - [`sanitize_and_classify`]: canonical text plus the names it uses
//! - [`compile_to_graph`]: sanitize, transform and build into a graph
//! - [`make_symbolic_namespace`]: typed values for scripts
//! - [`list_functions`]: the function library
//!
//! A host implements [`GraphBackend`] over its own node tree; tests and
//! tools use [`MemoryGraph`].

// Linking the function library registers it.
use mathgraph_functions as _;

pub use mathgraph_compiler::{
    build, build_text, compile_to_graph, evaluate, transform, transform_with_depth, Bindings, BuildError,
    BuildOptions, BuildReport, CompileError, CompileOptions, CompileReport, ConfigError, TransformError,
    Transformed,
};
pub use mathgraph_graph::{
    GraphBackend, GraphError, InputRef, MemoryGraph, NodeHandle, NodeKind, OutputRef, SetterReport, SocketType,
    Value,
};
pub use mathgraph_registry::{list_functions, FunctionError, FunctionInfo};
pub use mathgraph_sanitize::{Classification, SanitizeError, SanitizeOptions, Sanitized};
pub use mathgraph_symbolic::{
    make_symbolic_namespace, Arg, Constructor, Namespace, NodeContext, SocketTypeError, SymbolicValue, ValueKind,
};

use tracing_subscriber::{fmt, EnvFilter};

/// Sanitize `raw` and report which names it uses.
///
/// Never touches a graph.
pub fn sanitize_and_classify(raw: &str, options: &SanitizeOptions) -> Result<Sanitized, SanitizeError> {
    mathgraph_sanitize::sanitize(raw, options)
}

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Detailed error causes log on the `mathgraph::debug` target.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mathgraph=info,mathgraph_compiler=info"));

    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
