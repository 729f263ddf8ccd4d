//! Function Registry.
//!
//! Provides distributed registration for the functions an expression can
//! call. Functions are operations like `sin`, `clamp` or `remap`; each one
//! knows how to materialize itself as graph nodes and how to evaluate itself
//! on plain numbers.
//!
//! # Architecture
//!
//! The registry uses [`linkme::distributed_slice`] for compile-time registration:
//!
//! 1. Functions register themselves by adding a [`FunctionDescriptor`] static
//!    to [`FUNCTIONS`]
//! 2. At link time, all registrations are collected into [`FUNCTIONS`]
//! 3. At runtime, the registry provides lookup by name for validation and dispatch
//!
//! This allows functions to be defined anywhere in the codebase (including
//! in downstream crates) while remaining discoverable by the sanitizer and
//! the transformer.
//!
//! # Operand Support
//!
//! - **Scalar only** ([`Support::ScalarOnly`]) - vector operands are refused
//!   with [`FunctionError::InvalidOperand`]
//! - **Scalar or vector** ([`Support::ScalarOrVector`]) - a vector operand
//!   switches the function to its vector node; scalar literals broadcast
//!
//! # Example Registration
//!
//! ```ignore
//! use mathgraph_registry::{linkme::distributed_slice, FunctionDescriptor, Support, FUNCTIONS};
//!
//! #[distributed_slice(FUNCTIONS)]
//! static SIN: FunctionDescriptor = FunctionDescriptor {
//!     name: "sin",
//!     params: &["a"],
//!     doc: "Sine of a (radians)",
//!     long_doc: "",
//!     category: "trigonometry",
//!     support: Support::ScalarOnly,
//!     build: |setter, tag, operands| scalar_node(setter, tag, MathOp::Sine, operands),
//!     eval: |args| MathOp::Sine.apply(args),
//! };
//! ```

mod error;
mod operands;

pub use error::{FunctionError, RegistryError, Result};
pub use linkme;
pub use operands::{any_vector, check_arity, check_scalar, first_output};

use linkme::distributed_slice;
use mathgraph_graph::{NodeSetter, Operand, OutputRef, Tag};
use serde::Serialize;

/// Signature of a node builder.
///
/// Receives the setter of the current pass, the tag assigned to this call and
/// the operands in parameter order; returns the output carrying the result.
pub type BuildFn = fn(&mut NodeSetter<'_>, &Tag, &[Operand]) -> Result<OutputRef>;

/// Signature of a scalar evaluator.
pub type EvalFn = fn(&[f64]) -> f64;

/// Which operand types a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Support {
    /// Floats only.
    ScalarOnly,
    /// Floats, or vectors component-wise.
    ScalarOrVector,
}

/// Descriptor for a registered function
pub struct FunctionDescriptor {
    /// Expression name (e.g., "add", "sin", "remap")
    pub name: &'static str,
    /// Parameter names in call order
    pub params: &'static [&'static str],
    /// One-line documentation
    pub doc: &'static str,
    /// Longer documentation, may be empty
    pub long_doc: &'static str,
    /// Category tag (e.g., "arithmetic", "trigonometry")
    pub category: &'static str,
    /// Accepted operand types
    pub support: Support,
    /// Node materialization
    pub build: BuildFn,
    /// Numeric semantics on floats
    pub eval: EvalFn,
}

impl FunctionDescriptor {
    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Call signature, e.g. `clamp(v, a, b)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }

    /// Evaluate on floats, failing on the wrong number of arguments.
    pub fn eval(&self, args: &[f64]) -> Result<f64> {
        check_arity(self, args.len())?;
        Ok((self.eval)(args))
    }

    /// Check operands and build the nodes for one call.
    pub fn call(&self, setter: &mut NodeSetter<'_>, tag: &Tag, operands: &[Operand]) -> Result<OutputRef> {
        check_arity(self, operands.len())?;
        if self.support == Support::ScalarOnly {
            check_scalar(self, setter, operands)?;
        }
        (self.build)(setter, tag, operands)
    }
}

impl std::fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("category", &self.category)
            .field("support", &self.support)
            .finish()
    }
}

/// Distributed slice collecting all function registrations.
#[distributed_slice]
pub static FUNCTIONS: [FunctionDescriptor];

/// Names that can never be a function or a variable.
///
/// Keywords of the scripting surface and the constructor names of the
/// symbolic namespace.
pub const RESERVED_WORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "inFloat", "inVec", "outFloat", "outVec",
];

/// Whether `name` is a reserved word.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Get all registered function names
pub fn all_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|f| f.name)
}

/// Look up a function by name
///
/// Reserved words never resolve, even if something registered one.
pub fn get(name: &str) -> Option<&'static FunctionDescriptor> {
    if is_reserved(name) {
        return None;
    }
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Check if a name is a known function
pub fn is_known(name: &str) -> bool {
    get(name).is_some()
}

/// Look up a function, failing with `Unknown Function`.
pub fn require(name: &str) -> Result<&'static FunctionDescriptor> {
    get(name).ok_or_else(|| FunctionError::UnknownFunction(name.to_string()))
}

/// Evaluate a function by name
pub fn eval(name: &str, args: &[f64]) -> Result<f64> {
    require(name)?.eval(args)
}

/// Public description of a registered function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    /// Expression name
    pub name: String,
    /// Parameter names
    pub params: Vec<String>,
    /// One-line documentation
    pub doc: String,
    /// Longer documentation
    pub long_doc: String,
    /// Category tag
    pub category: String,
}

impl From<&FunctionDescriptor> for FunctionInfo {
    fn from(desc: &FunctionDescriptor) -> Self {
        Self {
            name: desc.name.to_string(),
            params: desc.params.iter().map(|p| p.to_string()).collect(),
            doc: desc.doc.to_string(),
            long_doc: desc.long_doc.to_string(),
            category: desc.category.to_string(),
        }
    }
}

/// Every registered function, sorted by name.
pub fn list_functions() -> Vec<FunctionInfo> {
    let mut infos: Vec<FunctionInfo> = FUNCTIONS.iter().map(FunctionInfo::from).collect();
    infos.sort_by(|a, b| a.name.cmp(&b.name));
    infos
}

/// Check the registered table for reserved or duplicated names.
pub fn validate_registry() -> std::result::Result<(), RegistryError> {
    let mut seen: Vec<&str> = Vec::with_capacity(FUNCTIONS.len());
    for desc in FUNCTIONS.iter() {
        if is_reserved(desc.name) {
            return Err(RegistryError::ReservedName(desc.name));
        }
        if seen.contains(&desc.name) {
            return Err(RegistryError::DuplicateName(desc.name));
        }
        seen.push(desc.name);
    }
    tracing::trace!(count = seen.len(), "function registry validated");
    Ok(())
}
