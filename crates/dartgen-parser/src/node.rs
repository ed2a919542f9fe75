//! Parse tree produced by the parser.
//!
//! Node kinds form a closed tagged union; the AST builder matches on them
//! exhaustively. Leaf kinds carry the matched source text, which doubles as
//! the default "literal text" answer for any kind that needs no structured
//! handling.

use dartgen_common::Span;

/// Every node kind the grammar can produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    SourceFile,
    /// `import '<path>';` — text is the quoted path.
    ImportDirective,
    /// `part '<path>';` — text is the quoted path.
    PartDirective,
    /// File-level comment before the first declaration.
    LeadingComment,
    /// `// directive:<word>` comment attached to a field.
    DirectiveComment,
    /// `@Name` or `@Name(args)` — text is the whole annotation.
    Annotation,
    /// `abstract`, `final`, `late`, `static`, `factory`, `get`, `set`.
    Modifier,
    ClassDecl,
    /// Declared name, including any literal generic marker (`Cache<T>`).
    Name,
    /// Type expression: identifier + optional generics + optional `?`.
    TypeRef,
    ExtendsClause,
    VariableDecl,
    /// Raw initializer text after `=`.
    Initializer,
    FunctionDecl,
    /// Raw parameter-list text.
    Parameters,
    /// Opaque brace-balanced body (or raw `=>` expression).
    Body,
    ConstructorDecl,
    /// Raw constructor initializer-list text after `:`.
    InitializerList,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(kind: NodeKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn interior(kind: NodeKind, span: Span, children: Vec<Node>) -> Self {
        Self {
            kind,
            span,
            text: String::new(),
            children,
        }
    }

    /// Default handling for kinds without a structured lowering: the literal
    /// matched text, or the concatenation of the children's literal text.
    pub fn literal_text(&self) -> String {
        if !self.text.is_empty() || self.children.is_empty() {
            return self.text.clone();
        }
        self.children
            .iter()
            .map(Node::literal_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First child of the given kind.
    pub fn child(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All children of the given kind, in declaration order.
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.kind == kind)
    }
}
