//! Grammar error type reported for malformed input.

use std::path::Path;

use dartgen_common::LineMap;

/// A parse failure: the input did not match the restricted grammar.
///
/// Carries everything the batch driver prints for a failed file: the file's
/// basename, the 1-based location, the unexpected token, the set of tokens
/// that would have been accepted, and a short context window.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error in {file} at {line}:{column}: unexpected {unexpected}")]
pub struct GrammarError {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub unexpected: String,
    pub expected: Vec<&'static str>,
    pub context: String,
}

impl GrammarError {
    pub fn new(
        path: &Path,
        text: &str,
        offset: u32,
        unexpected: impl Into<String>,
        expected: Vec<&'static str>,
    ) -> Self {
        let map = LineMap::new(text);
        let pos = map.position(offset);
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            file,
            line: pos.line,
            column: pos.column,
            unexpected: unexpected.into(),
            expected,
            context: map.context_window(text, offset).to_string(),
        }
    }

    /// Multi-line report printed to the user for a failed file.
    pub fn report(&self) -> String {
        format!(
            "Parse Error: {} {}:{}\nUnexpected: {}\nAllowed: {}\nContext: {}",
            self.file,
            self.line,
            self.column,
            self.unexpected,
            self.expected.join(", "),
            self.context,
        )
    }
}
