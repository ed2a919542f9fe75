//! Recursive-descent parser for the restricted Dart grammar.
//!
//! The parser recognizes exactly the subset needed to extract field shape and
//! class topology: directives, comments, annotations, class declarations,
//! variable declarations, constructors, and method/getter/setter declarations
//! whose bodies are captured as opaque brace-balanced text. Everything else is
//! a `GrammarError` carrying the offending location.

use std::path::Path;

use dartgen_common::Span;
use tracing::trace;

use crate::error::GrammarError;
use crate::node::{Node, NodeKind};
use crate::scanner::{Scanner, SyntaxKind};

pub struct ParserState<'a> {
    text: &'a str,
    path: &'a Path,
    scanner: Scanner<'a>,
}

impl<'a> ParserState<'a> {
    pub fn new(text: &'a str, path: &'a Path) -> Self {
        Self {
            text,
            path,
            scanner: Scanner::new(text),
        }
    }

    /// Parse the whole source text into a parse tree rooted at `SourceFile`.
    pub fn parse_source_file(&mut self) -> Result<Node, GrammarError> {
        trace!(file = %self.path.display(), "parsing source file");
        let mut children = Vec::new();
        let mut pending_annotations: Vec<Node> = Vec::new();
        let mut seen_declaration = false;

        self.scanner.scan();
        loop {
            match self.scanner.token() {
                SyntaxKind::EndOfFile => break,
                SyntaxKind::LineComment | SyntaxKind::DocComment => {
                    // Comments before the first declaration are kept as
                    // file-level leading comments; later ones are trivia.
                    if !seen_declaration && pending_annotations.is_empty() {
                        children.push(Node::leaf(
                            NodeKind::LeadingComment,
                            self.scanner.token_span(),
                            self.scanner.token_text(),
                        ));
                    }
                    self.scanner.scan();
                }
                SyntaxKind::At => {
                    pending_annotations.push(self.parse_annotation()?);
                }
                SyntaxKind::Identifier => match self.scanner.token_text() {
                    "import" => {
                        seen_declaration = true;
                        children.push(self.parse_directive(NodeKind::ImportDirective)?);
                    }
                    "part" => {
                        seen_declaration = true;
                        children.push(self.parse_directive(NodeKind::PartDirective)?);
                    }
                    "abstract" | "class" => {
                        seen_declaration = true;
                        children.push(self.parse_class(std::mem::take(&mut pending_annotations))?);
                    }
                    _ => {
                        return Err(self.unexpected(vec![
                            "'import'",
                            "'part'",
                            "'class'",
                            "'abstract'",
                        ]));
                    }
                },
                _ => {
                    return Err(self.unexpected(vec!["identifier", "'@'", "end of file"]));
                }
            }
        }

        Ok(Node::interior(
            NodeKind::SourceFile,
            Span::new(0, self.text.len() as u32),
            children,
        ))
    }

    // =========================================================================
    // Directives and annotations
    // =========================================================================

    /// `import '<path>';` or `part '<path>';` — current token is the keyword.
    fn parse_directive(&mut self, kind: NodeKind) -> Result<Node, GrammarError> {
        self.scanner.scan();
        if self.scanner.token() != SyntaxKind::StringLiteral {
            return Err(self.unexpected(vec!["string literal"]));
        }
        let node = Node::leaf(kind, self.scanner.token_span(), self.scanner.token_text());
        self.scanner.scan();
        if self.scanner.token() != SyntaxKind::Semicolon {
            return Err(self.unexpected(vec!["';'"]));
        }
        self.scanner.scan();
        Ok(node)
    }

    /// `@Name` or `@Name( balanced args )` — current token is `@`.
    fn parse_annotation(&mut self) -> Result<Node, GrammarError> {
        let start = self.scanner.token_start();
        self.scanner.scan();
        if self.scanner.token() != SyntaxKind::Identifier {
            return Err(self.unexpected(vec!["identifier"]));
        }
        let name = self.scanner.token_text().to_string();
        let text = if self.scanner.try_consume_char(b'(') {
            let args = self
                .scanner
                .scan_balanced_parens()
                .ok_or_else(|| self.eof_error(vec!["')'"]))?;
            format!("@{}({})", name, args.slice(self.text))
        } else {
            format!("@{name}")
        };
        let node = Node::leaf(
            NodeKind::Annotation,
            Span::new(start, self.scanner.pos()),
            text,
        );
        self.scanner.scan();
        Ok(node)
    }

    // =========================================================================
    // Class declarations
    // =========================================================================

    /// Current token is `abstract` or `class`.
    fn parse_class(&mut self, annotations: Vec<Node>) -> Result<Node, GrammarError> {
        let start = self.scanner.token_start();
        let mut children = annotations;

        if self.scanner.token_text() == "abstract" {
            children.push(Node::leaf(
                NodeKind::Modifier,
                self.scanner.token_span(),
                "abstract",
            ));
            self.scanner.scan();
            if self.scanner.token() != SyntaxKind::Identifier
                || self.scanner.token_text() != "class"
            {
                return Err(self.unexpected(vec!["'class'"]));
            }
        }

        self.scanner.scan();
        if self.scanner.token() != SyntaxKind::Identifier {
            return Err(self.unexpected(vec!["identifier"]));
        }
        let base_name = self.scanner.token_text().to_string();
        let name_span_start = self.scanner.token_start();
        let mut name_text = base_name.clone();
        if let Some(generics) = self.scanner.try_scan_angle_suffix() {
            name_text.push_str(generics.slice(self.text));
        }
        children.push(Node::leaf(
            NodeKind::Name,
            Span::new(name_span_start, self.scanner.pos()),
            name_text,
        ));

        self.scanner.scan();
        if self.scanner.token() == SyntaxKind::Identifier && self.scanner.token_text() == "extends"
        {
            self.scanner.scan();
            let ty = self.parse_type_ref()?;
            let span = ty.span;
            children.push(Node::interior(NodeKind::ExtendsClause, span, vec![ty]));
        }
        if self.scanner.token() == SyntaxKind::Identifier
            && self.scanner.token_text() == "implements"
        {
            // Presence is tolerated; the interface list itself is ignored.
            loop {
                self.scanner.scan();
                let _ = self.parse_type_ref()?;
                if self.scanner.token() != SyntaxKind::Comma {
                    break;
                }
            }
        }

        if self.scanner.token() != SyntaxKind::OpenBrace {
            return Err(self.unexpected(vec!["'{'", "'extends'", "'implements'"]));
        }
        children.extend(self.parse_members(&base_name)?);

        Ok(Node::interior(
            NodeKind::ClassDecl,
            Span::new(start, self.scanner.pos()),
            children,
        ))
    }

    /// Parse class members through the matching `}`. Current token is `{`.
    fn parse_members(&mut self, class_name: &str) -> Result<Vec<Node>, GrammarError> {
        let mut members = Vec::new();
        let mut pending_annotations: Vec<Node> = Vec::new();
        let mut pending_directives: Vec<Node> = Vec::new();

        self.scanner.scan();
        loop {
            match self.scanner.token() {
                SyntaxKind::CloseBrace => {
                    self.scanner.scan();
                    return Ok(members);
                }
                SyntaxKind::EndOfFile => return Err(self.unexpected(vec!["'}'"])),
                SyntaxKind::LineComment | SyntaxKind::DocComment => {
                    if let Some(node) = self.directive_comment() {
                        pending_directives.push(node);
                    }
                    self.scanner.scan();
                }
                SyntaxKind::At => {
                    pending_annotations.push(self.parse_annotation()?);
                }
                SyntaxKind::Identifier => {
                    members.push(self.parse_member(
                        class_name,
                        std::mem::take(&mut pending_annotations),
                        std::mem::take(&mut pending_directives),
                    )?);
                }
                _ => return Err(self.unexpected(vec!["identifier", "'@'", "'}'"])),
            }
        }
    }

    /// Classify and parse one class member. Current token is an identifier.
    fn parse_member(
        &mut self,
        class_name: &str,
        annotations: Vec<Node>,
        directives: Vec<Node>,
    ) -> Result<Node, GrammarError> {
        let start = self.scanner.token_start();
        let mut children = annotations;
        children.extend(directives);

        // `factory` always introduces a constructor.
        if self.scanner.token_text() == "factory" {
            children.push(Node::leaf(
                NodeKind::Modifier,
                self.scanner.token_span(),
                "factory",
            ));
            self.scanner.scan();
            if self.scanner.token() != SyntaxKind::Identifier {
                return Err(self.unexpected(vec!["identifier"]));
            }
            return self.parse_constructor(start, children);
        }

        // Variable/method modifiers.
        while matches!(self.scanner.token_text(), "final" | "late" | "static") {
            children.push(Node::leaf(
                NodeKind::Modifier,
                self.scanner.token_span(),
                self.scanner.token_text(),
            ));
            self.scanner.scan();
            if self.scanner.token() != SyntaxKind::Identifier {
                return Err(self.unexpected(vec!["identifier"]));
            }
        }

        // An identifier matching the enclosing class name followed by `(` or
        // `.named(` is a constructor; otherwise it is an ordinary type.
        if self.scanner.token_text() == class_name {
            let cp = self.scanner.checkpoint();
            let looks_like_ctor = self.scanner.try_consume_char(b'(') || {
                self.scanner.rewind(cp);
                self.scanner.try_consume_char(b'.')
            };
            self.scanner.rewind(cp);
            if looks_like_ctor {
                return self.parse_constructor(start, children);
            }
        }

        let ty = self.parse_type_ref()?;

        // Getter / setter: `Type get name …`, `Type set name(…) …`.
        if self.scanner.token() == SyntaxKind::Identifier
            && matches!(self.scanner.token_text(), "get" | "set")
        {
            let accessor = self.scanner.token_text().to_string();
            children.push(Node::leaf(
                NodeKind::Modifier,
                self.scanner.token_span(),
                accessor,
            ));
            children.push(ty);
            self.scanner.scan();
            if self.scanner.token() != SyntaxKind::Identifier {
                return Err(self.unexpected(vec!["identifier"]));
            }
            children.push(Node::leaf(
                NodeKind::Name,
                self.scanner.token_span(),
                self.scanner.token_text(),
            ));
            if self.scanner.try_consume_char(b'(') {
                let params = self
                    .scanner
                    .scan_balanced_parens()
                    .ok_or_else(|| self.eof_error(vec!["')'"]))?;
                children.push(Node::leaf(
                    NodeKind::Parameters,
                    params,
                    params.slice(self.text),
                ));
            }
            self.scanner.scan();
            self.parse_function_body(&mut children)?;
            return Ok(Node::interior(
                NodeKind::FunctionDecl,
                Span::new(start, self.scanner.pos()),
                children,
            ));
        }

        if self.scanner.token() != SyntaxKind::Identifier {
            return Err(self.unexpected(vec!["identifier"]));
        }
        let mut name_text = self.scanner.token_text().to_string();
        let name_start = self.scanner.token_start();

        // Generic method: `T firstOf<T>(…)`.
        if let Some(generics) = self.scanner.try_scan_angle_suffix() {
            name_text.push_str(generics.slice(self.text));
        }

        if self.scanner.try_consume_char(b'(') {
            // Method declaration.
            children.push(ty);
            children.push(Node::leaf(
                NodeKind::Name,
                Span::new(name_start, self.scanner.pos()),
                name_text,
            ));
            let params = self
                .scanner
                .scan_balanced_parens()
                .ok_or_else(|| self.eof_error(vec!["')'"]))?;
            children.push(Node::leaf(
                NodeKind::Parameters,
                params,
                params.slice(self.text),
            ));
            self.scanner.scan();
            self.parse_function_body(&mut children)?;
            return Ok(Node::interior(
                NodeKind::FunctionDecl,
                Span::new(start, self.scanner.pos()),
                children,
            ));
        }

        // Variable declaration.
        children.push(ty);
        children.push(Node::leaf(
            NodeKind::Name,
            Span::new(name_start, self.scanner.pos()),
            name_text,
        ));
        self.scanner.scan();
        match self.scanner.token() {
            SyntaxKind::Equals => {
                let init = self
                    .scanner
                    .scan_to_semicolon()
                    .ok_or_else(|| self.eof_error(vec!["';'"]))?;
                children.push(Node::leaf(
                    NodeKind::Initializer,
                    init,
                    init.slice(self.text).trim(),
                ));
            }
            SyntaxKind::Semicolon => {}
            _ => return Err(self.unexpected(vec!["'='", "';'", "'('"])),
        }

        // A trailing `// directive:…` comment on the declaration line attaches
        // to this field.
        if let Some(span) = self.scanner.lookahead_same_line_comment() {
            let comment = span.slice(self.text);
            if is_directive_comment(comment) {
                children.push(Node::leaf(NodeKind::DirectiveComment, span, comment));
            }
        }
        self.scanner.scan();

        Ok(Node::interior(
            NodeKind::VariableDecl,
            Span::new(start, self.scanner.token_start()),
            children,
        ))
    }

    /// Current token is the constructor name identifier.
    fn parse_constructor(
        &mut self,
        start: u32,
        mut children: Vec<Node>,
    ) -> Result<Node, GrammarError> {
        let mut name = self.scanner.token_text().to_string();
        let name_start = self.scanner.token_start();
        if self.scanner.try_consume_char(b'.') {
            self.scanner.scan();
            if self.scanner.token() != SyntaxKind::Identifier {
                return Err(self.unexpected(vec!["identifier"]));
            }
            name.push('.');
            name.push_str(self.scanner.token_text());
        }
        children.push(Node::leaf(
            NodeKind::Name,
            Span::new(name_start, self.scanner.pos()),
            name,
        ));

        if !self.scanner.try_consume_char(b'(') {
            return Err(self.eof_error(vec!["'('"]));
        }
        let params = self
            .scanner
            .scan_balanced_parens()
            .ok_or_else(|| self.eof_error(vec!["')'"]))?;
        children.push(Node::leaf(
            NodeKind::Parameters,
            params,
            params.slice(self.text),
        ));

        self.scanner.scan();
        if self.scanner.token() == SyntaxKind::Colon {
            let init = self
                .scanner
                .scan_to_body_or_semicolon()
                .ok_or_else(|| self.eof_error(vec!["'{'", "';'"]))?;
            children.push(Node::leaf(
                NodeKind::InitializerList,
                init,
                init.slice(self.text).trim(),
            ));
            self.scanner.scan();
        }

        match self.scanner.token() {
            SyntaxKind::OpenBrace => {
                let body = self
                    .scanner
                    .scan_balanced_block()
                    .ok_or_else(|| self.eof_error(vec!["'}'"]))?;
                children.push(Node::leaf(NodeKind::Body, body, body.slice(self.text)));
                self.scanner.scan();
            }
            SyntaxKind::FatArrow => {
                let body = self
                    .scanner
                    .scan_to_semicolon()
                    .ok_or_else(|| self.eof_error(vec!["';'"]))?;
                children.push(Node::leaf(
                    NodeKind::Body,
                    body,
                    format!("=> {};", body.slice(self.text).trim()),
                ));
                self.scanner.scan();
            }
            // Declaration only: no body node at all.
            SyntaxKind::Semicolon => {
                self.scanner.scan();
            }
            _ => return Err(self.unexpected(vec!["'{'", "';'", "':'", "'=>'"])),
        }

        Ok(Node::interior(
            NodeKind::ConstructorDecl,
            Span::new(start, self.scanner.token_start()),
            children,
        ))
    }

    /// Method/getter/setter body: opaque block, `=> expr;`, or bare `;`.
    /// Current token is the first body token; leaves the scanner on the token
    /// after the body.
    fn parse_function_body(&mut self, children: &mut Vec<Node>) -> Result<(), GrammarError> {
        match self.scanner.token() {
            SyntaxKind::OpenBrace => {
                let body = self
                    .scanner
                    .scan_balanced_block()
                    .ok_or_else(|| self.eof_error(vec!["'}'"]))?;
                children.push(Node::leaf(NodeKind::Body, body, body.slice(self.text)));
                self.scanner.scan();
            }
            SyntaxKind::FatArrow => {
                let body = self
                    .scanner
                    .scan_to_semicolon()
                    .ok_or_else(|| self.eof_error(vec!["';'"]))?;
                children.push(Node::leaf(
                    NodeKind::Body,
                    body,
                    format!("=> {};", body.slice(self.text).trim()),
                ));
                self.scanner.scan();
            }
            // Abstract declaration: no body.
            SyntaxKind::Semicolon => {
                self.scanner.scan();
            }
            _ => return Err(self.unexpected(vec!["'{'", "'=>'", "';'"])),
        }
        Ok(())
    }

    /// Type expression: identifier + optional generic arguments + optional `?`.
    /// Current token must be an identifier; leaves the scanner on the token
    /// after the type.
    fn parse_type_ref(&mut self) -> Result<Node, GrammarError> {
        if self.scanner.token() != SyntaxKind::Identifier {
            return Err(self.unexpected(vec!["identifier"]));
        }
        let start = self.scanner.token_start();
        let mut text = self.scanner.token_text().to_string();
        if let Some(generics) = self.scanner.try_scan_angle_suffix() {
            text.push_str(generics.slice(self.text));
        }
        if self.scanner.try_consume_char(b'?') {
            text.push('?');
        }
        let node = Node::leaf(NodeKind::TypeRef, Span::new(start, self.scanner.pos()), text);
        self.scanner.scan();
        Ok(node)
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Directive comments carry field instructions for the generator.
    fn directive_comment(&self) -> Option<Node> {
        let text = self.scanner.token_text();
        if is_directive_comment(text) {
            Some(Node::leaf(
                NodeKind::DirectiveComment,
                self.scanner.token_span(),
                text,
            ))
        } else {
            None
        }
    }

    fn unexpected(&self, expected: Vec<&'static str>) -> GrammarError {
        let unexpected = if self.scanner.token() == SyntaxKind::EndOfFile {
            "end of file".to_string()
        } else {
            format!("'{}'", self.scanner.token_text())
        };
        GrammarError::new(
            self.path,
            self.text,
            self.scanner.token_start(),
            unexpected,
            expected,
        )
    }

    fn eof_error(&self, expected: Vec<&'static str>) -> GrammarError {
        GrammarError::new(
            self.path,
            self.text,
            self.scanner.pos(),
            "end of file",
            expected,
        )
    }
}

/// True when a `//` comment encodes generator directives.
pub fn is_directive_comment(comment: &str) -> bool {
    comment
        .trim_start_matches('/')
        .trim_start()
        .starts_with("directive:")
}
