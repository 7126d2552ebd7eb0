use rowan::TextRange;

/// A byte range `[start, end)` into the rope.
///
/// Decorations, syntax nodes and edits all speak in spans so that slicing
/// the rope with any of them reproduces the exact source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when the two spans share a position, touching ends included.
    #[must_use]
    pub fn touches(self, other: Span) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Grow the span by `by` bytes on both sides, clamped at zero.
    #[must_use]
    pub fn widen(self, by: usize) -> Span {
        Span {
            start: self.start.saturating_sub(by),
            end: self.end + by,
        }
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Span {
            start: range.start().into(),
            end: range.end().into(),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}
