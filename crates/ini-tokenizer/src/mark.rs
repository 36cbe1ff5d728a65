//! Source position tracking.

use std::fmt;

/// A position in the source text.
///
/// All counters are zero-based. `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct Mark {
    /// Byte offset into the source.
    pub index: usize,
    /// Line number.
    pub line: usize,
    /// Column within the line.
    pub column: usize,
}

impl Mark {
    /// Create a new mark.
    #[inline]
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}
