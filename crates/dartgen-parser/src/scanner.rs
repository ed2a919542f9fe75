//! Byte-level scanner for the restricted Dart grammar.
//!
//! The scanner produces one token at a time and additionally exposes raw
//! capture operations for the spans the grammar treats as opaque: balanced
//! brace blocks (method and constructor bodies), balanced parenthesis runs
//! (parameter lists, annotation arguments) and run-to-semicolon text
//! (initializers, `=>` bodies). Raw captures honor string literals and line
//! comments so braces inside them never unbalance the scan.

use dartgen_common::Span;

/// Token kinds recognized by the scanner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyntaxKind {
    Identifier,
    StringLiteral,
    LineComment,
    DocComment,
    At,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    LessThan,
    GreaterThan,
    Question,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Equals,
    FatArrow,
    EndOfFile,
    Unknown,
}

impl SyntaxKind {
    /// Human-readable token label used in grammar errors.
    pub fn label(self) -> &'static str {
        match self {
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::LineComment => "comment",
            SyntaxKind::DocComment => "doc comment",
            SyntaxKind::At => "'@'",
            SyntaxKind::OpenBrace => "'{'",
            SyntaxKind::CloseBrace => "'}'",
            SyntaxKind::OpenParen => "'('",
            SyntaxKind::CloseParen => "')'",
            SyntaxKind::LessThan => "'<'",
            SyntaxKind::GreaterThan => "'>'",
            SyntaxKind::Question => "'?'",
            SyntaxKind::Semicolon => "';'",
            SyntaxKind::Colon => "':'",
            SyntaxKind::Comma => "','",
            SyntaxKind::Dot => "'.'",
            SyntaxKind::Equals => "'='",
            SyntaxKind::FatArrow => "'=>'",
            SyntaxKind::EndOfFile => "end of file",
            SyntaxKind::Unknown => "unknown character",
        }
    }
}

/// Saved scanner state for bounded lookahead.
#[derive(Copy, Clone, Debug)]
pub struct ScannerCheckpoint {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
}

pub struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
        }
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    pub fn token_span(&self) -> Span {
        Span::new(self.token_start as u32, self.pos as u32)
    }

    pub fn token_text(&self) -> &'a str {
        &self.text[self.token_start..self.pos]
    }

    /// Byte offset where the current token starts.
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// Byte offset just past the current token (or past the last raw capture).
    pub fn pos(&self) -> u32 {
        self.pos as u32
    }

    pub fn checkpoint(&self) -> ScannerCheckpoint {
        ScannerCheckpoint {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
        }
    }

    pub fn rewind(&mut self, cp: ScannerCheckpoint) {
        self.pos = cp.pos;
        self.token_start = cp.token_start;
        self.token = cp.token;
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.skip_whitespace();
        self.token_start = self.pos;

        let Some(&b) = self.bytes.get(self.pos) else {
            self.token = SyntaxKind::EndOfFile;
            return self.token;
        };

        self.token = match b {
            b'/' if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                let doc = self.bytes.get(self.pos + 2) == Some(&b'/');
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
                if doc {
                    SyntaxKind::DocComment
                } else {
                    SyntaxKind::LineComment
                }
            }
            b'\'' | b'"' => {
                self.scan_string(b);
                SyntaxKind::StringLiteral
            }
            _ if is_ident_start(b) => {
                while self.pos < self.bytes.len() && is_ident_part(self.bytes[self.pos]) {
                    self.pos += 1;
                }
                SyntaxKind::Identifier
            }
            b'=' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                self.pos += 2;
                SyntaxKind::FatArrow
            }
            _ => {
                self.pos += 1;
                match b {
                    b'@' => SyntaxKind::At,
                    b'{' => SyntaxKind::OpenBrace,
                    b'}' => SyntaxKind::CloseBrace,
                    b'(' => SyntaxKind::OpenParen,
                    b')' => SyntaxKind::CloseParen,
                    b'<' => SyntaxKind::LessThan,
                    b'>' => SyntaxKind::GreaterThan,
                    b'?' => SyntaxKind::Question,
                    b';' => SyntaxKind::Semicolon,
                    b':' => SyntaxKind::Colon,
                    b',' => SyntaxKind::Comma,
                    b'.' => SyntaxKind::Dot,
                    b'=' => SyntaxKind::Equals,
                    _ => SyntaxKind::Unknown,
                }
            }
        };
        self.token
    }

    /// Consume a string literal starting at the current position.
    ///
    /// The position is on the opening quote; afterwards it is past the closing
    /// quote (or at end of input for an unterminated literal).
    fn scan_string(&mut self, quote: u8) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Skip a line comment starting at the current position.
    fn skip_line_comment(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    // =========================================================================
    // Raw capture operations (opaque blocks)
    // =========================================================================

    /// Capture the interior of a brace block. The opening `{` must already be
    /// the current token. Returns the span between the braces; the position is
    /// left past the closing `}`. Returns `None` when the block never closes.
    pub fn scan_balanced_block(&mut self) -> Option<Span> {
        self.scan_balanced(b'{', b'}')
    }

    /// Capture the interior of a parenthesis run. The opening `(` must already
    /// be the current token.
    pub fn scan_balanced_parens(&mut self) -> Option<Span> {
        self.scan_balanced(b'(', b')')
    }

    fn scan_balanced(&mut self, open: u8, close: u8) -> Option<Span> {
        let start = self.pos;
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\'' | b'"' => self.scan_string(self.bytes[self.pos]),
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'/') => self.skip_line_comment(),
                b if b == open => {
                    depth += 1;
                    self.pos += 1;
                }
                b if b == close => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Some(Span::new(start as u32, (self.pos - 1) as u32));
                    }
                }
                _ => self.pos += 1,
            }
        }
        None
    }

    /// Capture raw text up to (and through) the next `;` at bracket depth zero.
    ///
    /// Used for variable initializers and `=>` bodies. Returns the span of the
    /// text before the semicolon.
    pub fn scan_to_semicolon(&mut self) -> Option<Span> {
        let span = self.scan_raw_until(|b| b == b';')?;
        self.pos += 1; // consume the ';'
        Some(span)
    }

    /// Capture raw text up to the next `{` or `;` at bracket depth zero,
    /// without consuming the terminator. Used for constructor initializer
    /// lists, which end at either a body or a declaration-only semicolon. A
    /// `{` in expression position (after `=`, `,`, `(`, `[` or `{`) opens a
    /// map/set literal, not a body, and is captured with its contents.
    pub fn scan_to_body_or_semicolon(&mut self) -> Option<Span> {
        self.scan_raw_until(|b| b == b'{' || b == b';')
    }

    fn scan_raw_until(&mut self, stop: impl Fn(u8) -> bool) -> Option<Span> {
        let start = self.pos;
        let mut depth = 0usize;
        // Last significant byte, to classify a depth-zero `{`.
        let mut prev = 0u8;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'\'' || b == b'"' {
                self.scan_string(b);
                prev = b;
                continue;
            }
            if b == b'/' && self.bytes.get(self.pos + 1) == Some(&b'/') {
                self.skip_line_comment();
                continue;
            }
            let literal_brace = b == b'{' && matches!(prev, b'=' | b',' | b'(' | b'[' | b'{');
            if depth == 0 && stop(b) && !literal_brace {
                return Some(Span::new(start as u32, self.pos as u32));
            }
            match b {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' if depth > 0 => depth -= 1,
                _ => {}
            }
            if !b.is_ascii_whitespace() {
                prev = b;
            }
            self.pos += 1;
        }
        None
    }

    /// Consume an immediately following balanced `<...>` run, if present.
    ///
    /// Used for generic suffixes on type names and class names. The returned
    /// span includes the angle brackets.
    pub fn try_scan_angle_suffix(&mut self) -> Option<Span> {
        let saved = self.pos;
        let mut probe = self.pos;
        while probe < self.bytes.len() && matches!(self.bytes[probe], b' ' | b'\t') {
            probe += 1;
        }
        if self.bytes.get(probe) != Some(&b'<') {
            return None;
        }
        let start = probe;
        self.pos = probe + 1;
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'<' => depth += 1,
                b'>' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Some(Span::new(start as u32, self.pos as u32));
                    }
                }
                // A generic argument list never contains these; bail out so a
                // stray `<` comparison is not swallowed.
                b';' | b'{' | b'}' | b'(' | b')' | b'=' => break,
                _ => {}
            }
            self.pos += 1;
        }
        self.pos = saved;
        None
    }

    /// Consume a single expected character, skipping spaces and tabs first.
    pub fn try_consume_char(&mut self, expected: u8) -> bool {
        let saved = self.pos;
        while self.pos < self.bytes.len() && matches!(self.bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
        if self.bytes.get(self.pos) == Some(&expected) {
            self.pos += 1;
            true
        } else {
            self.pos = saved;
            false
        }
    }

    /// Capture a trailing `//` comment on the same line as the current
    /// position, if one exists before the next newline.
    pub fn lookahead_same_line_comment(&mut self) -> Option<Span> {
        let saved = self.pos;
        while self.pos < self.bytes.len() && matches!(self.bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
        if self.bytes.get(self.pos) == Some(&b'/') && self.bytes.get(self.pos + 1) == Some(&b'/') {
            let start = self.pos;
            self.skip_line_comment();
            return Some(Span::new(start as u32, self.pos as u32));
        }
        self.pos = saved;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(text);
        let mut out = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFile {
                break;
            }
            out.push(kind);
        }
        out
    }

    #[test]
    fn scans_import_directive() {
        assert_eq!(
            kinds("import 'package:a/b.dart';"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::StringLiteral,
                SyntaxKind::Semicolon
            ]
        );
    }

    #[test]
    fn string_escapes_do_not_terminate_early() {
        let mut scanner = Scanner::new(r#""a\"b" x"#);
        scanner.scan();
        assert_eq!(scanner.token_text(), r#""a\"b""#);
    }

    #[test]
    fn doc_comments_are_distinguished() {
        assert_eq!(
            kinds("/// doc\n// line\n"),
            vec![SyntaxKind::DocComment, SyntaxKind::LineComment]
        );
    }

    #[test]
    fn balanced_block_ignores_braces_in_strings_and_comments() {
        let text = "{ var s = '}'; // }\n  return s; } tail";
        let mut scanner = Scanner::new(text);
        scanner.scan(); // consume '{'
        let span = scanner.scan_balanced_block().unwrap();
        assert!(span.slice(text).contains("return s;"));
        scanner.scan();
        assert_eq!(scanner.token_text(), "tail");
    }

    #[test]
    fn angle_suffix_handles_nesting() {
        let text = "Map<String, List<int>> x;";
        let mut scanner = Scanner::new(text);
        scanner.scan(); // Map
        let span = scanner.try_scan_angle_suffix().unwrap();
        assert_eq!(span.slice(text), "<String, List<int>>");
    }

    #[test]
    fn scan_to_semicolon_respects_nesting() {
        let text = "[1, 2, f(';')]; rest";
        let mut scanner = Scanner::new(text);
        let span = scanner.scan_to_semicolon().unwrap();
        assert_eq!(span.slice(text), "[1, 2, f(';')]");
    }

    #[test]
    fn set_literal_braces_are_not_a_body() {
        let text = " tags = {}, extra = {'a': 1}; rest";
        let mut scanner = Scanner::new(text);
        let span = scanner.scan_to_body_or_semicolon().unwrap();
        assert_eq!(span.slice(text), " tags = {}, extra = {'a': 1}");
    }

    #[test]
    fn scan_to_body_still_stops_at_a_real_body() {
        let text = " a = f(x) { a = 1; }";
        let mut scanner = Scanner::new(text);
        let span = scanner.scan_to_body_or_semicolon().unwrap();
        assert_eq!(span.slice(text), " a = f(x) ");
    }
}
