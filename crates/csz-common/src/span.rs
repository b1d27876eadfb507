//! Source location tracking (byte offsets).

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into the source text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: u32,
    pub end: u32,
}

impl TextSpan {
    pub fn new(start: u32, end: u32) -> TextSpan {
        debug_assert!(start <= end, "span start must not exceed end");
        TextSpan { start, end }
    }

    /// A zero-width span at the given position.
    pub fn empty(pos: u32) -> TextSpan {
        TextSpan {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, pos: u32) -> bool {
        self.start <= pos && pos < self.end
    }

    /// True when the two spans share at least one position.
    /// Zero-width spans intersect a span when they touch its interior or ends.
    pub fn intersects(&self, other: TextSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start as usize..self.end as usize]
    }
}

/// Describes a single edit to the source text: `span` in the old text was
/// replaced by `new_length` bytes. Used by the incremental reuse engine to
/// decide which previously parsed nodes are unaffected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChangeRange {
    pub span: TextSpan,
    pub new_length: u32,
}

impl TextChangeRange {
    pub fn new(span: TextSpan, new_length: u32) -> TextChangeRange {
        TextChangeRange { span, new_length }
    }

    /// Signed difference in text length introduced by this change.
    pub fn delta(&self) -> i64 {
        self.new_length as i64 - self.span.len() as i64
    }

    /// End of the changed region in the *new* text.
    pub fn new_end(&self) -> u32 {
        self.span.start + self.new_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_intersection_includes_touching_edges() {
        let a = TextSpan::new(0, 4);
        let b = TextSpan::new(4, 8);
        assert!(a.intersects(b));
        assert!(!TextSpan::new(0, 3).intersects(TextSpan::new(4, 8)));
    }

    #[test]
    fn change_range_delta() {
        let change = TextChangeRange::new(TextSpan::new(10, 14), 2);
        assert_eq!(change.delta(), -2);
        assert_eq!(change.new_end(), 12);
    }

    #[test]
    fn change_range_serializes_to_json() {
        let change = TextChangeRange::new(TextSpan::new(10, 14), 2);
        let json = serde_json::to_string(&change).unwrap();
        let back: TextChangeRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
    }
}
