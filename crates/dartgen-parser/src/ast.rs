//! Domain model: files, classes, variables, functions, constructors.
//!
//! These are the value types the resolver and emitter operate on. A
//! `SourceFile` owns its classes exclusively for the duration of one pipeline
//! run; the parser never mutates a file after construction.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

/// Field-level generator instruction, encoded in source as a
/// `// directive:<word>` comment adjacent to the field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Transient,
    Unique,
    /// The field is a private backing member shadowed by a public property;
    /// generated code addresses it through the property name.
    Property,
}

impl Directive {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "transient" => Some(Directive::Transient),
            "unique" => Some(Directive::Unique),
            "property" => Some(Directive::Property),
            _ => None,
        }
    }
}

/// Extract every directive encoded in one comment. Unknown directive words
/// are ignored (logged), matching the tolerant behavior of comment channels.
pub fn directives_in_comment(comment: &str) -> Vec<Directive> {
    let mut out = Vec::new();
    let mut rest = comment;
    while let Some(idx) = rest.find("directive:") {
        rest = &rest[idx + "directive:".len()..];
        let word: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        match Directive::from_word(&word) {
            Some(directive) => out.push(directive),
            None if !word.is_empty() => {
                debug!(word, "ignoring unknown field directive");
            }
            None => {}
        }
    }
    out
}

/// A member variable declaration.
///
/// `ty` carries the rendered type string, including any modifier prefix the
/// AST builder merged in (`final String`) and nullability markers (`int?`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub ty: String,
    pub name: String,
    pub annotations: Vec<String>,
    pub directives: Vec<Directive>,
    pub default_value: Option<String>,
}

impl Variable {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            annotations: Vec::new(),
            directives: Vec::new(),
            default_value: None,
        }
    }

    pub fn has_directive(&self, directive: Directive) -> bool {
        self.directives.contains(&directive)
    }

    /// The type with modifier prefixes (`final`, `late`, `static`) and a
    /// trailing nullability marker stripped. This is what type-shape rules
    /// (date, list) match against.
    pub fn base_type(&self) -> &str {
        let mut ty = self.ty.as_str();
        loop {
            let trimmed = ty.trim_start();
            let Some(word) = trimmed.split_whitespace().next() else {
                break;
            };
            if matches!(word, "final" | "late" | "static") {
                ty = &trimmed[word.len()..];
            } else {
                ty = trimmed;
                break;
            }
        }
        ty.trim_end().trim_end_matches('?')
    }
}

/// A method, getter or setter. The body is opaque text and is never
/// interpreted downstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub parameters: String,
    pub body: String,
    pub annotations: Vec<String>,
}

/// A constructor declaration. `body: None` is the "declaration only"
/// sentinel rendered as a bare `;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constructor {
    pub name: String,
    pub parameters: String,
    pub initializer: Option<String>,
    pub body: Option<String>,
}

/// One class declaration. Mutable during the pipeline: the resolver appends
/// merged parent fields, the generator replaces members wholesale.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub name: String,
    pub parent_class_name: Option<String>,
    pub member_variables: Vec<Variable>,
    pub functions: Vec<Function>,
    pub constructors: Vec<Constructor>,
    pub annotations: Vec<String>,
    /// Leftover/opaque text appended verbatim before the closing brace.
    /// Carries custom injected code; concatenated, never parsed.
    pub class_body: String,
    pub use_default_constructor: bool,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_class_name: None,
            member_variables: Vec::new(),
            functions: Vec::new(),
            constructors: Vec::new(),
            annotations: Vec::new(),
            class_body: String::new(),
            use_default_constructor: true,
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.member_variables.iter().any(|v| v.name == name)
    }

    /// Append another class's member variables (parent merge). Plain append:
    /// duplicates by name are intentionally not detected.
    pub fn extend_variables(&mut self, other: &ClassDecl) {
        self.member_variables
            .extend(other.member_variables.iter().cloned());
    }
}

/// A parsed source file: classes in declaration order plus the deduplicated
/// import set (order-insensitive; rendered sorted).
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub classes: Vec<ClassDecl>,
    pub imports: BTreeSet<String>,
    pub leading_comments: Vec<String>,
    pub file_path: PathBuf,
    pub ensure_final_newline: bool,
}

impl SourceFile {
    /// Strip the literal generic marker used when comparing class names for
    /// lookup purposes.
    pub fn normalize_class_name(name: &str) -> String {
        name.replace("<T>", "")
    }

    pub fn get_class_by_name(&self, name: &str) -> Option<&ClassDecl> {
        let wanted = Self::normalize_class_name(name);
        self.classes
            .iter()
            .find(|c| Self::normalize_class_name(&c.name) == wanted)
    }

    pub fn get_class_by_name_mut(&mut self, name: &str) -> Option<&mut ClassDecl> {
        let wanted = Self::normalize_class_name(name);
        self.classes
            .iter_mut()
            .find(|c| Self::normalize_class_name(&c.name) == wanted)
    }

    /// Best-effort heuristic: the import whose file-name component
    /// case-insensitively contains the class name. Can mismatch when several
    /// imported files share a substring; callers treat the result as a
    /// candidate, not a guarantee.
    pub fn find_import_for_class(&self, class_name: &str) -> Option<&str> {
        let needle = class_name.to_lowercase();
        self.imports
            .iter()
            .find(|import| {
                let file_name = import.rsplit('/').next().unwrap_or(import);
                file_name.to_lowercase().contains(&needle)
            })
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_generic_marker() {
        assert_eq!(SourceFile::normalize_class_name("Cache<T>"), "Cache");
        assert_eq!(SourceFile::normalize_class_name("Item"), "Item");
    }

    #[test]
    fn base_type_strips_modifiers_and_nullability() {
        assert_eq!(Variable::new("final String", "a").base_type(), "String");
        assert_eq!(Variable::new("late DateTime?", "b").base_type(), "DateTime");
        assert_eq!(
            Variable::new("static final List<int>", "c").base_type(),
            "List<int>"
        );
        assert_eq!(Variable::new("int", "d").base_type(), "int");
    }

    #[test]
    fn directives_parse_known_words_only() {
        assert_eq!(
            directives_in_comment("// directive:transient directive:unique"),
            vec![Directive::Transient, Directive::Unique]
        );
        assert_eq!(
            directives_in_comment("// directive:property"),
            vec![Directive::Property]
        );
        assert_eq!(directives_in_comment("// directive:bogus"), vec![]);
        assert_eq!(directives_in_comment("// plain comment"), vec![]);
    }
}
