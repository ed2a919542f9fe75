//! Byte-offset source spans.

/// A half-open byte range `[start, end)` into a source text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Empty span at a single offset.
    pub fn at(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Slice `text` by this span, clamped so out-of-range spans never panic.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        let start = (self.start as usize).min(text.len());
        let end = (self.end as usize).clamp(start, text.len());
        &text[start..end]
    }
}
