//! Line/column mapping for diagnostics.
//!
//! The scanner and parser track byte offsets only; converting an offset to a
//! human-readable location happens once, when a diagnostic is built.

use crate::limits::ERROR_CONTEXT_BYTES;

/// 1-based line/column pair, as printed in parse diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Index of line-start byte offsets for one source text.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for nl in memchr::memchr_iter(b'\n', text.as_bytes()) {
            line_starts.push(nl as u32 + 1);
        }
        Self { line_starts }
    }

    /// Convert a byte offset into a 1-based line/column position.
    ///
    /// Columns are counted in bytes from the line start, which matches how the
    /// rest of the pipeline addresses source text.
    pub fn position(&self, offset: u32) -> Position {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Position {
            line: line_idx as u32 + 1,
            column: offset - self.line_starts[line_idx] + 1,
        }
    }

    /// Extract a short context window around `offset` for error messages.
    ///
    /// The window is clipped to the surrounding line so a diagnostic never
    /// spills multi-line bodies into the report.
    pub fn context_window<'a>(&self, text: &'a str, offset: u32) -> &'a str {
        let offset = (offset as usize).min(text.len());
        let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(text.len());

        let mut start = line_start.max(offset.saturating_sub(ERROR_CONTEXT_BYTES));
        let mut end = line_end.min(offset + ERROR_CONTEXT_BYTES);
        // Keep the slice on char boundaries for non-ASCII source text.
        while start < text.len() && !text.is_char_boundary(start) {
            start += 1;
        }
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[start..end]
    }
}
