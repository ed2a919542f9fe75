//! Dart class-declaration parser for the dartgen shadow-class generator.
//!
//! This crate provides the front half of the pipeline:
//! - `SyntaxKind` / `Scanner` - tokenizer with raw opaque-block capture
//! - `NodeKind` / `Node` - parse tree
//! - `ParserState` - recursive-descent parser for the restricted grammar
//! - `lower` - AST builder converting the parse tree to the domain model
//! - `ast` - the domain model shared by the resolver and emitter

pub mod scanner;
pub use scanner::{Scanner, SyntaxKind};

pub mod node;
pub use node::{Node, NodeKind};

pub mod parser;
pub use parser::ParserState;

pub mod error;
pub use error::GrammarError;

pub mod ast;
pub use ast::{ClassDecl, Constructor, Directive, Function, SourceFile, Variable};

pub mod lower;

use std::path::Path;

/// Parse source text into the domain model.
///
/// `path` is used for diagnostics and to derive package-relative import
/// identity; the file is not read here.
pub fn parse_source(text: &str, path: &Path) -> Result<SourceFile, GrammarError> {
    let mut parser = ParserState::new(text, path);
    let root = parser.parse_source_file()?;
    Ok(lower::lower_source_file(&root, path))
}
