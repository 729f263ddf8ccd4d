//! Errors raised while calling registered functions.

use mathgraph_graph::GraphError;
use thiserror::Error;

/// Function result type alias.
pub type Result<T> = std::result::Result<T, FunctionError>;

/// Errors raised by a function call.
///
/// `Display` is the sentence shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    /// No function with this name is registered.
    #[error("Unknown Function '{0}'")]
    UnknownFunction(String),

    /// Fewer operands than parameters.
    #[error("Function '{function}' needs {missing} more Params")]
    MissingParams {
        /// Function name.
        function: String,
        /// How many operands are missing.
        missing: usize,
    },

    /// More operands than parameters.
    #[error("Function '{function}' received Extra Params")]
    ExtraParams {
        /// Function name.
        function: String,
    },

    /// An operand the function cannot take.
    #[error("Function '{function}' does not accept a {found} for '{param}' (argument {position})")]
    InvalidOperand {
        /// Function name.
        function: String,
        /// 1-based operand position.
        position: usize,
        /// Parameter name at that position.
        param: String,
        /// What was supplied.
        found: String,
    },

    /// The graph refused a mutation.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Problems with the registered table itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A function is registered under a reserved word.
    #[error("function name '{0}' is reserved")]
    ReservedName(&'static str),

    /// Two functions share a name.
    #[error("function '{0}' is registered twice")]
    DuplicateName(&'static str),
}
