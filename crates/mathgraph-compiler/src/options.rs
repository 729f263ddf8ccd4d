//! Compile options.
//!
//! Hosts keep these in their preferences and hand them over as JSON; every
//! field has a default so partial documents load.

use mathgraph_graph::DEFAULT_NODE_SPACING;
use mathgraph_parser::DEFAULT_MAX_DEPTH;
use mathgraph_sanitize::SanitizeOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options for one [`compile_to_graph`](crate::compile_to_graph) call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Single letters are variables and juxtaposition multiplies.
    pub algebraic_notation: bool,
    /// Expand `Pi`, `eNum`, `Phi` and `Gold`.
    pub macros: bool,
    /// Deepest nesting accepted by the parser and the builder.
    pub max_depth: usize,
    /// Remove automation nodes an edit no longer uses.
    pub prune_stale: bool,
    /// Horizontal distance between a new node and the active node.
    pub node_spacing: f32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            algebraic_notation: true,
            macros: true,
            max_depth: DEFAULT_MAX_DEPTH,
            prune_stale: true,
            node_spacing: DEFAULT_NODE_SPACING,
        }
    }
}

impl CompileOptions {
    /// Check the options are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if !self.node_spacing.is_finite() || self.node_spacing < 0.0 {
            return Err(ConfigError::InvalidSpacing(self.node_spacing));
        }
        Ok(())
    }

    /// The sanitizer's share of the options.
    pub fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            algebraic_notation: self.algebraic_notation,
            macros: self.macros,
        }
    }

    /// The builder's share of the options.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            max_depth: self.max_depth,
            prune_stale: self.prune_stale,
            node_spacing: self.node_spacing,
        }
    }
}

/// Options for [`build`](crate::build).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Deepest nesting accepted.
    pub max_depth: usize,
    /// Remove tagged nodes this build did not touch.
    pub prune_stale: bool,
    /// Horizontal distance between a new node and the active node.
    pub node_spacing: f32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        CompileOptions::default().build_options()
    }
}
