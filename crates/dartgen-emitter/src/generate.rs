//! Entity transform: rewrites a resolved `SourceFile` in place into its
//! shadow persistence-entity form.
//!
//! The transform is destructive by design. Original functions and
//! constructors are replaced wholesale; only member variables (with the
//! parent's fields already merged in) survive, normalized to the binding's
//! conventions.

use std::collections::BTreeSet;
use std::path::Path;

use dartgen_parser::{ClassDecl, Constructor, Directive, Function, SourceFile, Variable};
use tracing::debug;

use crate::include;
use crate::variant::{Variant, VariantConfig};

/// First leading comment of every generated file.
pub const GENERATED_HEADER: &str = "// GENERATED CODE - DO NOT MODIFY BY HAND";
/// Second leading comment: the generated class overrides base-model members
/// without re-annotating them.
pub const LINT_SUPPRESSION: &str = "// ignore_for_file: annotate_overrides";

pub struct EntityGenerator {
    config: &'static VariantConfig,
    /// `package:<name>/<path>` import of the file being transformed, when the
    /// file lives under a package's `lib/`.
    self_import: Option<String>,
}

impl EntityGenerator {
    pub fn new(variant: Variant, self_import: Option<String>) -> Self {
        Self {
            config: variant.config(),
            self_import,
        }
    }

    /// Transform every class of `file` into its shadow entity form and
    /// rewrite the file-level comments and imports.
    pub fn transform(&self, file: &mut SourceFile) {
        file.leading_comments = vec![GENERATED_HEADER.to_string(), LINT_SUPPRESSION.to_string()];

        let mut imports = BTreeSet::new();
        imports.insert(self.config.binding_import.to_string());
        imports.insert(self.config.base_model_import.to_string());
        if let Some(self_import) = &self.self_import {
            imports.insert(self_import.clone());
        }
        file.imports = imports;

        for class in &mut file.classes {
            self.transform_class(class);
        }
    }

    /// Append each class's include file (hand-written code that must live
    /// inside the generated class) to its opaque body. Missing or unreadable
    /// include files are skipped.
    pub fn splice_includes(&self, file: &mut SourceFile, include_dir: &Path) {
        for class in &mut file.classes {
            let original = class
                .name
                .strip_prefix(self.config.class_prefix)
                .unwrap_or(&class.name);
            if let Some(code) = include::load_include(include_dir, original, self.config.file_tag)
            {
                class.class_body.push('\n');
                class.class_body.push_str(&code);
                class.class_body.push('\n');
            }
        }
    }

    fn transform_class(&self, class: &mut ClassDecl) {
        let original_name = SourceFile::normalize_class_name(&class.name);
        let new_name = format!("{}{}", self.config.class_prefix, original_name);

        // An immutable original takes its fields through a named-parameter
        // constructor, not cascade assignment.
        if class
            .annotations
            .iter()
            .any(|a| a.starts_with("@immutable"))
        {
            class.use_default_constructor = false;
        }

        let model_parent = class
            .parent_class_name
            .as_deref()
            .is_some_and(|p| p.split('<').next() == Some("Model"));

        let mut fields: Vec<Variable> = class
            .member_variables
            .drain(..)
            .filter(|v| {
                if is_transient(v) {
                    debug!(class = %original_name, field = %v.name, "dropping transient field");
                    false
                } else {
                    true
                }
            })
            .map(|v| self.convert_variable(v))
            .collect();

        // Classes following the shared Model convention always persist their
        // audit timestamps, merged from the parent or synthesized here.
        if model_parent {
            for name in ["created", "updated"] {
                if !fields.iter().any(|f| f.name == name) {
                    let mut field = Variable::new("late DateTime", name);
                    field
                        .annotations
                        .push(self.config.date_annotation.to_string());
                    fields.push(field);
                }
            }
        }

        // Ordering uses the bare type so the `late` prefix added during
        // conversion does not move a field between sort regions.
        fields.sort_by_key(|f| (unmodified_type(&f.ty).to_lowercase(), f.name.to_lowercase()));

        class.constructors = vec![
            Constructor {
                name: new_name.clone(),
                parameters: String::new(),
                initializer: None,
                body: None,
            },
            from_constructor(&new_name, &original_name, &fields),
        ];
        class.functions = vec![convert_method(
            class.use_default_constructor,
            &original_name,
            &fields,
        )];

        // Property-shadowed fields declare the private backing name; the copy
        // paths above keep using the public property name.
        for field in &mut fields {
            if field.has_directive(Directive::Property) {
                field.name = format!("_{}", field.name);
            }
        }

        // The synthetic identifier is declared first and never copied.
        let mut id = Variable::new("int", self.config.id_field);
        id.annotations.push(self.config.id_annotation.to_string());
        id.default_value = Some("0".to_string());
        fields.insert(0, id);

        class.member_variables = fields;
        class.name = new_name;
        class.parent_class_name = Some(format!("{}<{}>", self.config.base_class, original_name));
        class.annotations = vec![self.config.entity_annotation.to_string()];
    }

    fn convert_variable(&self, mut variable: Variable) -> Variable {
        let base = variable.base_type().to_string();
        let core = unmodified_type(&variable.ty);

        if variable.has_directive(Directive::Unique) {
            apply_annotation(&mut variable.annotations, self.config.unique_annotation);
        }
        if base == "DateTime" {
            apply_annotation(&mut variable.annotations, self.config.date_annotation);
        }

        if base == "List" || base.starts_with("List<") {
            variable.ty = format!("late {core}");
            variable.default_value = Some("[]".to_string());
        } else if variable.default_value.is_none() {
            // The generated default constructor takes no arguments, so every
            // non-defaulted field initializes lazily.
            variable.ty = format!("late {core}");
        } else {
            variable.ty = core;
        }
        variable
    }
}

fn is_transient(variable: &Variable) -> bool {
    variable.has_directive(Directive::Transient)
        || variable
            .annotations
            .iter()
            .any(|a| a.starts_with("@Transient"))
}

/// The type without `final`/`late`/`static` prefixes, generics and
/// nullability preserved.
fn unmodified_type(ty: &str) -> String {
    let mut rest = ty.trim();
    while let Some(word) = rest.split_whitespace().next() {
        if matches!(word, "final" | "late" | "static") {
            rest = rest[word.len()..].trim_start();
        } else {
            break;
        }
    }
    rest.to_string()
}

/// Add `annotation`, replacing any existing annotation with the same
/// instruction prefix (the text before the argument list). Last applied wins.
fn apply_annotation(annotations: &mut Vec<String>, annotation: &str) {
    let prefix = annotation.split('(').next().unwrap_or(annotation);
    annotations.retain(|a| a.split('(').next().unwrap_or(a) != prefix);
    annotations.push(annotation.to_string());
}

fn sorted_names(fields: &[Variable]) -> Vec<&str> {
    let mut names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    names.sort_unstable();
    names
}

/// `<New>.from(<Original> original)` copying every resolved field.
fn from_constructor(new_name: &str, original_name: &str, fields: &[Variable]) -> Constructor {
    let body = sorted_names(fields)
        .iter()
        .map(|name| format!("    {name} = original.{name};"))
        .collect::<Vec<_>>()
        .join("\n");
    Constructor {
        name: format!("{new_name}.from"),
        parameters: format!("{original_name} original"),
        initializer: None,
        body: Some(body),
    }
}

/// `convert()` reconstructing the original class: cascade assignment through
/// the default constructor, or named arguments when the original requires
/// them.
fn convert_method(
    use_default_constructor: bool,
    original_name: &str,
    fields: &[Variable],
) -> Function {
    let names = sorted_names(fields);
    let body = if use_default_constructor {
        if names.is_empty() {
            format!("    return {original_name}();")
        } else {
            let assignments = names
                .iter()
                .map(|name| format!("      ..{name} = {name}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("    return {original_name}()\n{assignments};")
        }
    } else if names.is_empty() {
        format!("    return {original_name}();")
    } else {
        let arguments = names
            .iter()
            .map(|name| format!("{name}: {name}"))
            .collect::<Vec<_>>()
            .join(",\n        ");
        format!("    return {original_name}(\n        {arguments});")
    };
    Function {
        name: "convert".to_string(),
        return_type: original_name.to_string(),
        parameters: String::new(),
        body,
        annotations: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmodified_type_keeps_generics_and_nullability() {
        assert_eq!(unmodified_type("final String"), "String");
        assert_eq!(unmodified_type("static final List<int>"), "List<int>");
        assert_eq!(unmodified_type("late DateTime?"), "DateTime?");
        assert_eq!(unmodified_type("int"), "int");
    }

    #[test]
    fn apply_annotation_replaces_by_instruction_prefix() {
        let mut annotations = vec!["@Property(type: PropertyType.byte)".to_string()];
        apply_annotation(&mut annotations, "@Property(type: PropertyType.date)");
        assert_eq!(annotations, vec!["@Property(type: PropertyType.date)"]);

        apply_annotation(&mut annotations, "@Unique(onConflict: ConflictStrategy.replace)");
        assert_eq!(annotations.len(), 2);
    }

    #[test]
    fn transient_detection_covers_both_channels() {
        let mut by_directive = Variable::new("String", "a");
        by_directive.directives.push(Directive::Transient);
        assert!(is_transient(&by_directive));

        let mut by_annotation = Variable::new("String", "b");
        by_annotation.annotations.push("@Transient()".to_string());
        assert!(is_transient(&by_annotation));

        assert!(!is_transient(&Variable::new("String", "c")));
    }
}
