//! Content-derived node tags.
//!
//! A tag names the node a function call produced: `"<function>.<16 hex>"`,
//! where the hex digits hash the function name and the identities of its
//! operands in order. Recompiling the same sub-expression produces the same
//! tag, which is how the node setter finds the node it made last time.
//!
//! The hash is `FxHasher`, which has no per-process seed, so tags are stable
//! across runs.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;

/// Identity of a float literal operand.
pub const FLOAT_IDENTITY: &str = "f";
/// Identity of a vector literal operand.
pub const VECTOR_IDENTITY: &str = "v";

/// Deterministic name of a compiler-owned node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(String);

impl Tag {
    /// Derive a tag from a function name and its operand identities.
    pub fn derive<S: AsRef<str>>(function: &str, identities: &[S]) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(function.as_bytes());
        for identity in identities {
            hasher.write_u8(0xff);
            hasher.write(identity.as_ref().as_bytes());
        }
        Tag(format!("{}.{:016x}", function, hasher.finish()))
    }

    /// Wrap an existing tag string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Tag(raw.into())
    }

    /// Tag for a node created inside a composite function.
    pub fn child(&self, suffix: &str) -> Tag {
        Tag(format!("{}/{}", self.0, suffix))
    }

    /// Disambiguate the `n`-th repeat of the same key in one pass.
    pub fn with_occurrence(&self, n: usize) -> Tag {
        if n == 0 {
            self.clone()
        } else {
            Tag(format!("{}#{}", self.0, n))
        }
    }

    /// The function name the tag was derived from.
    pub fn function(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
