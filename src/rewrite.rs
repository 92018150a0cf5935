//! Range-based text rewriting
//!
//! Edits are always expressed in the coordinates of the *original* text. An
//! [`EditBuffer`] records them and produces the final text in one pass, so the
//! order in which edits are recorded does not affect the result.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// Error applying an edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EditError {
    /// Range ends past the end of the text or starts after it ends
    #[error("edit range {start}..{end} is out of bounds for text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
    /// Range does not fall on UTF-8 character boundaries
    #[error("edit range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
    /// Range overlaps an edit that was already recorded
    #[error("edit range {start}..{end} overlaps existing edit {other_start}..{other_end}")]
    Overlap { start: usize, end: usize, other_start: usize, other_end: usize },
}

/// A text buffer that accepts range replacements over its original text.
pub trait TextBuffer {
    /// The text the buffer was created from.
    fn original(&self) -> &str;

    /// Check that every edit in `edits` would be accepted, without applying any.
    ///
    /// The default only validates the batch against [`TextBuffer::original`].
    /// Buffers that already hold edits must also check against those.
    fn check(&self, edits: &[Edit]) -> Result<(), EditError> {
        check_edits(self.original(), edits)
    }

    /// Replace `range` of the original text with `content`.
    fn overwrite(&mut self, range: Range<usize>, content: &str) -> Result<(), EditError>;

    /// The text with every recorded edit applied.
    fn render(&self) -> String;
}

/// One pending replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub content: String,
}

impl Edit {
    pub fn new(range: Range<usize>, content: impl Into<String>) -> Self {
        Self { range, content: content.into() }
    }
}

/// Check that `range` is a valid edit range for `text`.
pub fn check_range(text: &str, range: &Range<usize>) -> Result<(), EditError> {
    let (start, end) = (range.start, range.end);
    if start > end || end > text.len() {
        return Err(EditError::OutOfBounds { start, end, len: text.len() });
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(EditError::NotCharBoundary { start, end });
    }
    Ok(())
}

/// Validate a whole batch of edits against `text` before applying any.
///
/// Edits must be in bounds, pairwise non-overlapping and start at distinct
/// offsets.
pub fn check_edits(text: &str, edits: &[Edit]) -> Result<(), EditError> {
    let mut sorted: Vec<&Range<usize>> = edits.iter().map(|e| &e.range).collect();
    for range in &sorted {
        check_range(text, range)?;
    }
    sorted.sort_by_key(|r| (r.start, r.end));
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.start < a.end || b.start == a.start {
            return Err(EditError::Overlap {
                start: b.start,
                end: b.end,
                other_start: a.start,
                other_end: a.end,
            });
        }
    }
    Ok(())
}

/// Reference [`TextBuffer`] that batches edits keyed by original offsets.
///
/// Overwriting exactly the same range again replaces the earlier content.
///
/// # Example
///
/// ```
/// use compile_class::rewrite::{EditBuffer, TextBuffer};
///
/// let mut buf = EditBuffer::new("<a class=\"x\"><b class=\"y\">");
/// buf.overwrite(23..24, "second").unwrap();
/// buf.overwrite(10..11, "first").unwrap();
/// assert_eq!(buf.render(), "<a class=\"first\"><b class=\"second\">");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    original: String,
    /// start -> (end, content)
    edits: BTreeMap<usize, (usize, String)>,
}

impl EditBuffer {
    pub fn new(original: impl Into<String>) -> Self {
        Self { original: original.into(), edits: BTreeMap::new() }
    }

    /// Number of recorded edits.
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Check if any edit has been recorded.
    pub fn has_changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Find a recorded edit that `range` would collide with.
    ///
    /// Overwriting an identical range is not a collision.
    fn find_overlap(&self, range: &Range<usize>) -> Option<(usize, usize)> {
        if let Some((&s, &(e, _))) = self.edits.range(..=range.start).next_back() {
            if s == range.start {
                if e != range.end {
                    return Some((s, e));
                }
            } else if e > range.start {
                return Some((s, e));
            }
        }
        if let Some((&s, &(e, _))) = self.edits.range(range.start + 1..).next() {
            if s < range.end {
                return Some((s, e));
            }
        }
        None
    }
}

impl TextBuffer for EditBuffer {
    fn original(&self) -> &str {
        &self.original
    }

    fn check(&self, edits: &[Edit]) -> Result<(), EditError> {
        check_edits(&self.original, edits)?;
        for edit in edits {
            if let Some((other_start, other_end)) = self.find_overlap(&edit.range) {
                return Err(EditError::Overlap {
                    start: edit.range.start,
                    end: edit.range.end,
                    other_start,
                    other_end,
                });
            }
        }
        Ok(())
    }

    fn overwrite(&mut self, range: Range<usize>, content: &str) -> Result<(), EditError> {
        check_range(&self.original, &range)?;
        if let Some((other_start, other_end)) = self.find_overlap(&range) {
            return Err(EditError::Overlap {
                start: range.start,
                end: range.end,
                other_start,
                other_end,
            });
        }
        self.edits.insert(range.start, (range.end, content.to_string()));
        Ok(())
    }

    fn render(&self) -> String {
        let mut out = String::with_capacity(self.original.len());
        let mut cursor = 0;
        for (&start, (end, content)) in &self.edits {
            out.push_str(&self.original[cursor..start]);
            out.push_str(content);
            cursor = *end;
        }
        out.push_str(&self.original[cursor..]);
        out
    }
}

impl fmt::Display for EditBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edits_is_identity() {
        let buf = EditBuffer::new("  keep\n\tthis  ");
        assert!(!buf.has_changed());
        assert_eq!(buf.render(), "  keep\n\tthis  ");
    }

    #[test]
    fn test_edits_use_original_offsets() {
        let mut buf = EditBuffer::new("aaa bbb ccc");
        buf.overwrite(0..3, "x").unwrap();
        buf.overwrite(8..11, "yyyyyy").unwrap();
        buf.overwrite(4..7, "").unwrap();
        assert_eq!(buf.render(), "x  yyyyyy");
        assert_eq!(buf.edit_count(), 3);
    }

    #[test]
    fn test_same_range_replaces() {
        let mut buf = EditBuffer::new("abc");
        buf.overwrite(1..2, "x").unwrap();
        buf.overwrite(1..2, "y").unwrap();
        assert_eq!(buf.render(), "ayc");
    }

    #[test]
    fn test_adjacent_edits_allowed() {
        let mut buf = EditBuffer::new("abcd");
        buf.overwrite(0..2, "X").unwrap();
        buf.overwrite(2..4, "Y").unwrap();
        assert_eq!(buf.render(), "XY");
    }

    #[test]
    fn test_overlap_rejected() {
        let mut buf = EditBuffer::new("abcdef");
        buf.overwrite(1..4, "x").unwrap();
        assert!(matches!(buf.overwrite(3..5, "y"), Err(EditError::Overlap { .. })));
        assert!(matches!(buf.overwrite(0..2, "y"), Err(EditError::Overlap { .. })));
        assert!(matches!(buf.overwrite(1..3, "y"), Err(EditError::Overlap { .. })));
        assert!(matches!(buf.overwrite(2..3, "y"), Err(EditError::Overlap { .. })));
        assert_eq!(buf.render(), "axef");
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut buf = EditBuffer::new("abc");
        assert!(matches!(buf.overwrite(2..5, "x"), Err(EditError::OutOfBounds { .. })));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert!(matches!(buf.overwrite(reversed, "x"), Err(EditError::OutOfBounds { .. })));
    }

    #[test]
    fn test_char_boundary_rejected() {
        let mut buf = EditBuffer::new("é");
        assert!(matches!(buf.overwrite(1..2, "x"), Err(EditError::NotCharBoundary { .. })));
    }

    #[test]
    fn test_check_edits_batch() {
        let text = "0123456789";
        let ok = vec![Edit::new(5..7, "a"), Edit::new(0..2, "b"), Edit::new(2..5, "c")];
        assert!(check_edits(text, &ok).is_ok());

        let overlapping = vec![Edit::new(0..4, "a"), Edit::new(3..6, "b")];
        assert!(matches!(check_edits(text, &overlapping), Err(EditError::Overlap { .. })));

        let out_of_bounds = vec![Edit::new(8..12, "a")];
        assert!(matches!(check_edits(text, &out_of_bounds), Err(EditError::OutOfBounds { .. })));
    }

    #[test]
    fn test_check_sees_recorded_edits() {
        let mut buf = EditBuffer::new("0123456789");
        buf.overwrite(4..6, "x").unwrap();

        assert!(buf.check(&[Edit::new(0..2, "a"), Edit::new(7..9, "b")]).is_ok());
        let err = buf.check(&[Edit::new(0..2, "a"), Edit::new(5..8, "b")]).unwrap_err();
        assert_eq!(err, EditError::Overlap { start: 5, end: 8, other_start: 4, other_end: 6 });

        // Checking never writes
        assert_eq!(buf.edit_count(), 1);
        assert_eq!(buf.render(), "0123x6789");
    }

    #[test]
    fn test_display_renders() {
        let mut buf = EditBuffer::new("abc");
        buf.overwrite(0..1, "z").unwrap();
        assert_eq!(buf.to_string(), "zbc");
    }
}
