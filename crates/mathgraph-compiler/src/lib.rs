// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Expression-to-graph compiler.
//!
//! # Pipeline
//!
//! ```text
//! raw text ─ sanitize ─▶ canonical text ─ transform ─▶ function-call IR ─ build ─▶ graph
//! ```
//!
//! 1. [`mathgraph_sanitize::sanitize`] rewrites algebraic shorthand into
//!    canonical text and classifies names.
//! 2. [`transform`] parses it and desugars operators into calls, checking
//!    every called name against the registry.
//! 3. [`build`] walks the IR, materializing calls through a
//!    [`NodeSetter`](mathgraph_graph::NodeSetter) and linking the result
//!    into the sink.
//!
//! Steps 1 and 2 never touch the graph. Step 3 rolls back the nodes it
//! created if it fails.

// Linking the function library registers it.
use mathgraph_functions as _;

mod bindings;
mod builder;
mod error;
mod eval;
mod options;
mod transform;

pub use bindings::Bindings;
pub use builder::{build, build_text, BuildReport};
pub use error::{BuildError, CompileError, ConfigError, TransformError, DEBUG_TARGET};
pub use eval::evaluate;
pub use options::{BuildOptions, CompileOptions};
pub use transform::{desugar, transform, transform_with_depth, Transformed};

use mathgraph_graph::GraphBackend;
use mathgraph_sanitize::{sanitize, Classification};
use tracing::{debug, instrument};

/// Everything one successful compile produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileReport {
    /// Sanitized text.
    pub canonical: String,
    /// Names found by the sanitizer.
    pub classification: Classification,
    /// Function-call IR as text.
    pub ir: String,
    /// What the build did to the graph.
    pub build: BuildReport,
}

/// Compile `raw` into `graph`.
///
/// Sanitizes, transforms and builds; `bindings` name the sockets the
/// expression reads and the sink its result is linked into.
#[instrument(skip_all, fields(len = raw.len()))]
pub fn compile_to_graph(
    raw: &str,
    options: &CompileOptions,
    bindings: &Bindings,
    graph: &mut dyn GraphBackend,
) -> Result<CompileReport, CompileError> {
    options.validate()?;

    let sanitized = sanitize(raw, &options.sanitize_options())?;
    let transformed = transform_with_depth(&sanitized.canonical, options.max_depth)?;
    let report = build(&transformed.ir, bindings, graph, &options.build_options())?;

    debug!(
        canonical = %sanitized.canonical,
        ir = %transformed.text,
        created = report.nodes.created.len(),
        "compiled"
    );

    Ok(CompileReport {
        canonical: sanitized.canonical,
        classification: sanitized.classification,
        ir: transformed.text,
        build: report,
    })
}
