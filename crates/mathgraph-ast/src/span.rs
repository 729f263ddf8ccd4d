//! Source location tracking for error reporting.

use serde::{Deserialize, Serialize};

/// Byte range inside a single expression string.
///
/// Expressions are one-liners, so no file or line bookkeeping is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of start position
    pub start: u32,
    /// Byte offset of end position (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Span covering nothing, used for synthesized nodes.
    pub fn synthetic() -> Self {
        Self::default()
    }

    /// Check if this span is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Get the length of this span in bytes.
    ///
    /// # Panics
    /// Panics if end < start (malformed span).
    pub fn len(&self) -> u32 {
        assert!(
            self.end >= self.start,
            "malformed span: end ({}) < start ({})",
            self.end,
            self.start
        );
        self.end - self.start
    }

    /// Merge two spans (returns span covering both).
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the source text this span points at.
    pub fn snippet<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_snippet() {
        let a = Span::new(0, 3);
        let b = Span::new(5, 8);
        let m = a.merge(&b);
        assert_eq!(m, Span::new(0, 8));
        assert_eq!(m.len(), 8);
        assert_eq!(Span::new(4, 7).snippet("x + sin(y)"), "sin");
        assert_eq!(Span::new(40, 47).snippet("x"), "");
        assert!(Span::synthetic().is_empty());
    }
}
