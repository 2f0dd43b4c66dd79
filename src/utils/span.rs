//! Source location tracking

use serde::{Deserialize, Serialize};

/// A span represents a range in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset, in characters
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// 1-based line of `start`
    pub line: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    /// Create a dummy span (for testing)
    pub fn dummy() -> Self {
        Self { start: 0, end: 0, line: 1 }
    }

    /// Merge two spans, keeping the line of the earlier one
    pub fn merge(&self, other: &Span) -> Span {
        let line = if self.start <= other.start { self.line } else { other.line };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_first_line() {
        let a = Span::new(4, 7, 2);
        let b = Span::new(10, 12, 3);
        let merged = b.merge(&a);
        assert_eq!(merged, Span::new(4, 12, 2));
    }
}
