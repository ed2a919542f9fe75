//! AST builder: converts the parse tree into the domain model.
//!
//! One exhaustive match per node kind; any kind without structured handling
//! falls back to its literal matched text (`Node::literal_text`). This is the
//! closed-enum rendition of a visitor with a generic fallback.

use std::collections::BTreeSet;
use std::path::Path;

use crate::ast::{
    ClassDecl, Constructor, Directive, Function, SourceFile, Variable, directives_in_comment,
};
use crate::node::{Node, NodeKind};

/// Build a `SourceFile` from a `SourceFile` parse-tree root.
pub fn lower_source_file(root: &Node, file_path: &Path) -> SourceFile {
    debug_assert_eq!(root.kind, NodeKind::SourceFile);

    let mut classes = Vec::new();
    let mut imports = BTreeSet::new();
    let mut leading_comments = Vec::new();

    for child in &root.children {
        match child.kind {
            NodeKind::ImportDirective | NodeKind::PartDirective => {
                imports.insert(strip_quotes(&child.text).to_string());
            }
            NodeKind::LeadingComment => leading_comments.push(child.text.clone()),
            NodeKind::ClassDecl => classes.push(lower_class(child)),
            // Stray annotations or other kinds at file level reduce to their
            // literal text and carry no model meaning.
            _ => {
                let _ = child.literal_text();
            }
        }
    }

    SourceFile {
        classes,
        imports,
        leading_comments,
        file_path: file_path.to_path_buf(),
        ensure_final_newline: true,
    }
}

fn lower_class(node: &Node) -> ClassDecl {
    let mut class = ClassDecl::new(String::new());

    for child in &node.children {
        match child.kind {
            NodeKind::Annotation => class.annotations.push(child.text.clone()),
            NodeKind::Name => class.name = child.text.clone(),
            NodeKind::ExtendsClause => {
                class.parent_class_name = child
                    .child(NodeKind::TypeRef)
                    .map(|ty| ty.text.clone())
                    .filter(|t| !t.is_empty());
            }
            NodeKind::VariableDecl => class.member_variables.push(lower_variable(child)),
            NodeKind::FunctionDecl => class.functions.push(lower_function(child)),
            NodeKind::ConstructorDecl => class.constructors.push(lower_constructor(child)),
            // `abstract` and other class-level modifiers are shape-only.
            _ => {
                let _ = child.literal_text();
            }
        }
    }

    // A class generates through its default constructor unless it declares a
    // constructor that takes parameters.
    class.use_default_constructor = !class
        .constructors
        .iter()
        .any(|c| !c.parameters.trim().is_empty());

    class
}

fn lower_variable(node: &Node) -> Variable {
    let mut variable = Variable::new(String::new(), String::new());
    let mut modifiers: Vec<&str> = Vec::new();
    let mut ty = String::new();

    for child in &node.children {
        match child.kind {
            NodeKind::Annotation => variable.annotations.push(child.text.clone()),
            NodeKind::DirectiveComment => {
                variable.directives.extend(directives_in_comment(&child.text));
            }
            NodeKind::Modifier => modifiers.push(&child.text),
            NodeKind::TypeRef => ty = child.text.clone(),
            NodeKind::Name => variable.name = child.text.clone(),
            NodeKind::Initializer => variable.default_value = Some(child.text.clone()),
            _ => {
                let _ = child.literal_text();
            }
        }
    }

    // Modifier tokens merge into a single type-prefix string.
    variable.ty = if modifiers.is_empty() {
        ty
    } else {
        format!("{} {}", modifiers.join(" "), ty)
    };

    // A property-shadowed backing field is addressed by its public property
    // name everywhere except the generated declaration.
    if variable.has_directive(Directive::Property)
        && variable.name.len() > 1
        && variable.name.starts_with('_')
    {
        variable.name.remove(0);
    }
    variable
}

fn lower_function(node: &Node) -> Function {
    let mut function = Function {
        name: String::new(),
        return_type: String::new(),
        parameters: String::new(),
        body: String::new(),
        annotations: Vec::new(),
    };
    let mut modifiers: Vec<&str> = Vec::new();

    for child in &node.children {
        match child.kind {
            NodeKind::Annotation => function.annotations.push(child.text.clone()),
            NodeKind::Modifier => modifiers.push(&child.text),
            NodeKind::TypeRef => function.return_type = child.text.clone(),
            NodeKind::Name => function.name = child.text.clone(),
            NodeKind::Parameters => function.parameters = child.text.clone(),
            NodeKind::Body => function.body = child.text.clone(),
            _ => {
                let _ = child.literal_text();
            }
        }
    }

    if !modifiers.is_empty() {
        function.return_type = format!("{} {}", modifiers.join(" "), function.return_type);
    }
    function
}

fn lower_constructor(node: &Node) -> Constructor {
    let mut ctor = Constructor {
        name: String::new(),
        parameters: String::new(),
        initializer: None,
        body: None,
    };
    let mut factory = false;

    for child in &node.children {
        match child.kind {
            NodeKind::Modifier if child.text == "factory" => factory = true,
            NodeKind::Name => ctor.name = child.text.clone(),
            NodeKind::Parameters => ctor.parameters = child.text.clone(),
            NodeKind::InitializerList => ctor.initializer = Some(child.text.clone()),
            NodeKind::Body => ctor.body = Some(child.text.clone()),
            _ => {
                let _ = child.literal_text();
            }
        }
    }

    if factory {
        ctor.name = format!("factory {}", ctor.name);
    }
    ctor
}

/// Strip the quote characters from a literal import/part path.
fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_quotes_handles_both_styles() {
        assert_eq!(strip_quotes("'a/b.dart'"), "a/b.dart");
        assert_eq!(strip_quotes("\"a/b.dart\""), "a/b.dart");
        assert_eq!(strip_quotes("a/b.dart"), "a/b.dart");
    }
}
