//! Deterministic serializer for the domain model.
//!
//! Pure formatting over the final model: comments, sorted imports, classes in
//! file order. The output is byte-stable for a given model, which is what
//! makes repeated generation runs diff-clean.

use dartgen_parser::{ClassDecl, Constructor, Function, SourceFile, Variable};

/// Render `file` to source text.
pub fn render(file: &SourceFile) -> String {
    let mut out = String::new();

    if !file.leading_comments.is_empty() {
        for comment in &file.leading_comments {
            out.push_str(comment);
            out.push('\n');
        }
        out.push('\n');
    }

    if !file.imports.is_empty() {
        // BTreeSet iteration gives the sorted order directly.
        for import in &file.imports {
            out.push_str("import '");
            out.push_str(import);
            out.push_str("';\n");
        }
        out.push('\n');
    }

    let classes: Vec<String> = file.classes.iter().map(render_class).collect();
    out.push_str(&classes.join("\n\n"));

    if file.ensure_final_newline && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn render_class(class: &ClassDecl) -> String {
    let mut out = String::new();

    for annotation in &class.annotations {
        out.push_str(annotation);
        out.push('\n');
    }
    out.push_str("class ");
    out.push_str(&class.name);
    if let Some(parent) = &class.parent_class_name {
        out.push_str(" extends ");
        out.push_str(parent);
    }
    out.push_str(" {\n");

    for variable in &class.member_variables {
        render_variable(&mut out, variable);
    }
    for constructor in &class.constructors {
        render_constructor(&mut out, constructor);
    }
    for function in &class.functions {
        render_function(&mut out, function);
    }
    out.push_str(&class.class_body);
    out.push('}');
    out
}

fn render_variable(out: &mut String, variable: &Variable) {
    for annotation in &variable.annotations {
        out.push_str("  ");
        out.push_str(annotation);
        out.push('\n');
    }
    match &variable.default_value {
        Some(default) => {
            out.push_str(&format!("  {} {} = {};\n", variable.ty, variable.name, default));
        }
        None => out.push_str(&format!("  {} {};\n", variable.ty, variable.name)),
    }
}

fn render_constructor(out: &mut String, constructor: &Constructor) {
    out.push_str(&format!("\n  {}({})", constructor.name, constructor.parameters));
    if let Some(initializer) = &constructor.initializer {
        out.push_str(" : ");
        out.push_str(initializer);
    }
    match &constructor.body {
        // Declaration only.
        None => out.push(';'),
        Some(body) if body.starts_with("=>") => {
            out.push(' ');
            out.push_str(body);
        }
        Some(body) => out.push_str(&format!(" {{\n{body}\n  }}")),
    }
    out.push('\n');
}

fn render_function(out: &mut String, function: &Function) {
    for annotation in &function.annotations {
        out.push_str("\n  ");
        out.push_str(annotation);
    }
    if function.return_type.is_empty() {
        out.push_str(&format!("\n  {}({})", function.name, function.parameters));
    } else {
        out.push_str(&format!(
            "\n  {} {}({})",
            function.return_type, function.name, function.parameters
        ));
    }
    if function.body.starts_with("=>") {
        out.push(' ');
        out.push_str(&function.body);
    } else {
        out.push_str(&format!(" {{\n{}\n  }}", function.body));
    }
    out.push('\n');
}
