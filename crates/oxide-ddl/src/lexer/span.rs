//! Source location tracking for tokens and parse errors.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Byte offsets of a token in the source, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the 1-based `(line, column)` of the span start within `input`.
    ///
    /// Columns count characters, not bytes. Offsets past the end of the
    /// input are clamped to the end.
    #[must_use]
    pub fn line_col(&self, input: &str) -> (usize, usize) {
        let mut offset = self.start.min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &input[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}
