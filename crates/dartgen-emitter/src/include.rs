//! Include-file splice: hand-written code that must live inside a generated
//! class.
//!
//! Convention: `<dir>/<ClassName>.<tag>.include.dart`. The file's own
//! `ignore_for_file` lines are stripped (the generated file carries its own)
//! and the remainder is re-indented to class-member depth. Everything here is
//! best-effort; a missing or unreadable include file never fails generation.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Indentation applied to spliced code, matching class-member depth.
const INCLUDE_INDENT: usize = 2;

/// Load and prepare the include file for `class_name`, if one exists.
pub fn load_include(dir: &Path, class_name: &str, tag: &str) -> Option<String> {
    let path = dir.join(format!("{class_name}.{tag}.include.dart"));
    if !path.is_file() {
        return None;
    }
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), %err, "include file unreadable; skipping splice");
            return None;
        }
    };
    debug!(path = %path.display(), "splicing include file");

    let cleaned = strip_lint_suppressions(&text);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Some(indent(cleaned, INCLUDE_INDENT))
}

fn strip_lint_suppressions(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("// ignore_for_file:"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indent every non-blank line by `width` spaces.
fn indent(code: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    code.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
