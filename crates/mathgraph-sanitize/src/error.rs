//! Sanitizer errors.

use thiserror::Error;

/// Sanitizer result type alias.
pub type Result<T> = std::result::Result<T, SanitizeError>;

/// Why a raw expression was refused.
///
/// `Display` is the sentence shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// A character outside the accepted alphabet, or a superscript with
    /// nothing to raise.
    #[error("Unauthorized Symbol '{0}'")]
    UnauthorizedSymbol(String),

    /// A numeric token that is not a float.
    #[error("Unrecognized Float '{0}'")]
    UnrecognizedFloat(String),

    /// A name that cannot be a variable (function names, reserved words,
    /// malformed identifiers).
    #[error("Unauthorized Variable '{0}'")]
    UnauthorizedVariable(String),

    /// A piece of a composite token that is neither a number nor a letter.
    #[error("Unknown Element of Composite '{0}'")]
    UnknownCompositeElement(String),
}
