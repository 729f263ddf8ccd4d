//! Compiler errors.
//!
//! Every `Display` is the short sentence a user sees. The detail behind an
//! error (parse position, graph failure, offending text) is logged with
//! `tracing::debug!` on [`DEBUG_TARGET`] where the error is raised.

use mathgraph_registry::FunctionError;
use mathgraph_sanitize::SanitizeError;
use thiserror::Error;

/// Tracing target carrying developer detail behind user-facing errors.
pub const DEBUG_TARGET: &str = "mathgraph::debug";

/// Errors from rewriting canonical text into the function-call IR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// An operator with no function counterpart.
    #[error("Operator Not Supported '{0}'")]
    OperatorNotSupported(String),

    /// The text does not lex or parse.
    #[error("Math Expression Not Recognized")]
    NotRecognized,

    /// A call to a name the registry does not know.
    #[error("Unknown Function '{0}'")]
    UnknownFunction(String),

    /// Nesting beyond the configured depth.
    #[error("Expression too Large")]
    TooLarge,
}

/// Errors from materializing the IR in a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// An identifier with no binding.
    #[error("Unknown Variable '{0}'")]
    UnknownVariable(String),

    /// A tuple outside an argument position, or not three elements long.
    #[error("Wrong use of '( , )' Syntax")]
    WrongTupleSyntax,

    /// Nesting beyond the configured depth.
    #[error("Expression too Large")]
    TooLarge,

    /// Any other failure while building.
    #[error("Error on Execution")]
    Execution,

    /// The result could not be wired to the sink.
    #[error("Error on Final Link")]
    FinalLink,

    /// The named interface output does not exist.
    #[error("Unknown Output '{0}'")]
    UnknownOutput(String),

    /// A function refused its operands.
    #[error(transparent)]
    Function(FunctionError),
}

impl From<FunctionError> for BuildError {
    fn from(err: FunctionError) -> Self {
        match err {
            FunctionError::Graph(graph) => {
                tracing::debug!(target: DEBUG_TARGET, error = %graph, "graph refused a function call");
                BuildError::Execution
            }
            other => BuildError::Function(other),
        }
    }
}

/// Invalid [`CompileOptions`](crate::CompileOptions).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `max_depth` must allow at least one level.
    #[error("max_depth must be at least 1")]
    ZeroDepth,

    /// `node_spacing` must be a finite, non-negative distance.
    #[error("node_spacing must be finite and non-negative, got {0}")]
    InvalidSpacing(f32),
}

/// Any failure of [`compile_to_graph`](crate::compile_to_graph).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Options failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The raw text was refused.
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    /// The canonical text could not be rewritten.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The graph could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl CompileError {
    /// The one-sentence message shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgraph_graph::GraphError;

    #[test]
    fn test_messages() {
        assert_eq!(
            TransformError::OperatorNotSupported("<".into()).to_string(),
            "Operator Not Supported '<'"
        );
        assert_eq!(BuildError::UnknownVariable("x".into()).to_string(), "Unknown Variable 'x'");
        assert_eq!(BuildError::WrongTupleSyntax.to_string(), "Wrong use of '( , )' Syntax");
    }

    #[test]
    fn test_function_errors_surface_their_own_message() {
        let err = BuildError::from(FunctionError::MissingParams {
            function: "clamp".into(),
            missing: 2,
        });
        assert_eq!(err.to_string(), "Function 'clamp' needs 2 more Params");

        let err = BuildError::from(FunctionError::Graph(GraphError::UnknownSocket("v".into())));
        assert_eq!(err, BuildError::Execution);
    }

    #[test]
    fn test_user_message_is_display() {
        let err = CompileError::from(SanitizeError::UnauthorizedSymbol("$".into()));
        assert_eq!(err.user_message(), "Unauthorized Symbol '$'");
    }
}
