use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a tree node, as produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span used for synthesized nodes that have no source text
    pub const fn dummy() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_dummy(&self) -> bool {
        *self == Self::dummy()
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(&self, other: &Span) -> Span {
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_earliest_position() {
        let a = Span::new(10, 15, 2, 3);
        let b = Span::new(0, 4, 1, 1);
        let merged = a.merge(&b);
        assert_eq!(merged, Span::new(0, 15, 1, 1));
        assert_eq!(merged.len(), 15);
    }

    #[test]
    fn test_display_is_line_and_column() {
        assert_eq!(Span::new(0, 5, 4, 9).to_string(), "4:9");
        assert!(Span::dummy().is_dummy());
    }
}
