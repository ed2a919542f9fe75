//! Parent class location and member-variable merging.
//!
//! Location runs two heuristics in order:
//! 1. the import whose file-name component case-insensitively contains the
//!    parent class name;
//! 2. a textual scan of every resolvable imported file for a top-level
//!    `class <Name>` declaration.
//!
//! Merging appends the parent's member variables to the child without
//! de-duplicating by name; a field shadowed in the child appears twice.
//! Parent chains are followed transitively with a visited set and a hard
//! depth stop so import cycles terminate.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use dartgen_common::limits::{MAX_MANIFEST_WALK_DEPTH, MAX_PARENT_RESOLUTION_DEPTH};
use dartgen_parser::{ClassDecl, SourceFile, parse_source};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::manifest::read_package_name;

/// Resolve an import string to a file on disk, relative to the importing
/// file.
///
/// `dart:` imports name SDK libraries and are never file-resolvable.
/// `package:` imports locate the named package among the importing package's
/// sibling project directories and resolve under its `lib/`. Anything else
/// is a path relative to the importing file's directory.
pub fn import_to_path(import: &str, importing_file: &Path) -> Result<PathBuf, ResolveError> {
    if import.starts_with("dart:") {
        return Err(ResolveError::ImportNotFound {
            import: import.to_string(),
        });
    }
    if let Some(rest) = import.strip_prefix("package:") {
        let (package, rel) = rest.split_once('/').ok_or_else(|| ResolveError::ImportNotFound {
            import: import.to_string(),
        })?;
        let root = find_package_root(package, importing_file)?;
        let full = root.join("lib").join(rel);
        if full.is_file() {
            return Ok(full);
        }
        return Err(ResolveError::ImportNotFound {
            import: import.to_string(),
        });
    }
    let base = importing_file.parent().unwrap_or_else(|| Path::new("."));
    let full = base.join(import);
    if full.is_file() {
        Ok(full)
    } else {
        Err(ResolveError::ImportNotFound {
            import: import.to_string(),
        })
    }
}

/// Locate the root directory of `package` starting from a file inside a
/// sibling project.
///
/// Walks up to the nearest enclosing package root, then enumerates that
/// root's parent directory for a project whose pubspec declares `package`
/// (the importing package itself included). If no sibling matches, the walk
/// continues one level further up, bounded by `MAX_MANIFEST_WALK_DEPTH`.
fn find_package_root(package: &str, importing_file: &Path) -> Result<PathBuf, ResolveError> {
    let mut dir = importing_file.parent();
    for _ in 0..MAX_MANIFEST_WALK_DEPTH {
        let Some(current) = dir else { break };
        if !current.join("pubspec.yaml").is_file() {
            dir = current.parent();
            continue;
        }
        let Some(parent) = current.parent() else { break };
        if let Some(root) = sibling_with_package_name(parent, package) {
            return Ok(root);
        }
        dir = parent.parent();
    }
    Err(ResolveError::PackageNotFound {
        package: package.to_string(),
    })
}

/// One-level enumeration of `parent` for a directory whose pubspec declares
/// `package`.
fn sibling_with_package_name(parent: &Path, package: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(parent).ok()?;
    for entry in entries.flatten() {
        let candidate = entry.path();
        let pubspec = candidate.join("pubspec.yaml");
        if !pubspec.is_file() {
            continue;
        }
        match read_package_name(&pubspec) {
            Ok(name) if name == package => return Some(candidate),
            Ok(_) => {}
            Err(err) => debug!(pubspec = %pubspec.display(), %err, "skipping unreadable manifest"),
        }
    }
    None
}

/// Find the file declaring `parent_class_name`, given the importing file's
/// import set.
pub fn find_parent_class_path(
    parent_class_name: &str,
    imports: &BTreeSet<String>,
    importing_file: &Path,
) -> Result<PathBuf, ResolveError> {
    // Heuristic 1: the import whose file name contains the class name.
    let needle = parent_class_name.to_lowercase();
    let by_name = imports.iter().find(|import| {
        let file_name = import.rsplit('/').next().unwrap_or(import);
        file_name.to_lowercase().contains(&needle)
    });
    if let Some(import) = by_name {
        return import_to_path(import, importing_file);
    }

    // Heuristic 2: scan every resolvable imported file for the declaration.
    for import in imports {
        let Ok(path) = import_to_path(import, importing_file) else {
            continue;
        };
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        if declares_class(&text, parent_class_name) {
            return Ok(path);
        }
    }

    Err(ResolveError::ClassNotFound {
        class: parent_class_name.to_string(),
    })
}

/// Word-boundary search for `class <name>` in raw source text. Cheaper than
/// a re-parse and good enough for a fallback heuristic.
fn declares_class(text: &str, name: &str) -> bool {
    for (idx, _) in text.match_indices("class") {
        let before_ok = idx == 0 || text.as_bytes()[idx - 1].is_ascii_whitespace();
        if !before_ok {
            continue;
        }
        let rest_raw = &text[idx + "class".len()..];
        if !rest_raw.starts_with(char::is_whitespace) {
            continue;
        }
        let rest = rest_raw.trim_start();
        if let Some(after) = rest.strip_prefix(name) {
            let boundary = after
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric() && c != '_');
            if boundary {
                return true;
            }
        }
    }
    false
}

/// Merges parent member variables into child classes, following parent
/// chains across files.
pub struct ParentResolver {
    visited: FxHashSet<(PathBuf, String)>,
}

impl Default for ParentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ParentResolver {
    pub fn new() -> Self {
        Self {
            visited: FxHashSet::default(),
        }
    }

    /// Merge parent fields into every class of `file` that declares a
    /// parent. Failures are logged and leave the class unmerged.
    pub fn resolve_file(&mut self, file: &mut SourceFile) {
        let imports = file.imports.clone();
        let importing_file = file.file_path.clone();
        for class in &mut file.classes {
            let Some(parent_name) = class.parent_class_name.clone() else {
                continue;
            };
            let base = base_class_name(&parent_name);
            self.visited.clear();
            if let Err(err) = self.merge_from_parent(class, base, &imports, &importing_file, 0) {
                warn!(
                    class = %class.name,
                    parent = base,
                    %err,
                    "parent not resolved; generating without inherited fields"
                );
            }
        }
    }

    fn merge_from_parent(
        &mut self,
        class: &mut ClassDecl,
        parent_name: &str,
        imports: &BTreeSet<String>,
        importing_file: &Path,
        depth: usize,
    ) -> Result<(), ResolveError> {
        if depth >= MAX_PARENT_RESOLUTION_DEPTH {
            return Err(ResolveError::DepthExceeded {
                class: parent_name.to_string(),
                limit: MAX_PARENT_RESOLUTION_DEPTH,
            });
        }

        let parent_path = find_parent_class_path(parent_name, imports, importing_file)?;
        if !self
            .visited
            .insert((parent_path.clone(), parent_name.to_string()))
        {
            debug!(parent = parent_name, "parent chain cycle; stopping merge");
            return Ok(());
        }

        let text = fs::read_to_string(&parent_path).map_err(|source| ResolveError::Io {
            path: parent_path.clone(),
            source,
        })?;
        let parent_file = parse_source(&text, &parent_path)?;
        let Some(parent_class) = parent_file.get_class_by_name(parent_name) else {
            return Err(ResolveError::ClassNotFound {
                class: parent_name.to_string(),
            });
        };

        // Grandparents merge into the parent first so the child receives the
        // whole chain in one append.
        let mut parent_class = parent_class.clone();
        if let Some(grand) = parent_class.parent_class_name.clone() {
            let base = base_class_name(&grand);
            if let Err(err) = self.merge_from_parent(
                &mut parent_class,
                base,
                &parent_file.imports,
                &parent_path,
                depth + 1,
            ) {
                debug!(parent = parent_name, grandparent = base, %err, "grandparent not resolved");
            }
        }

        class.extend_variables(&parent_class);
        Ok(())
    }
}

/// `Model<Item>` names the class `Model`.
fn base_class_name(name: &str) -> &str {
    name.split('<').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_class_requires_word_boundaries() {
        assert!(declares_class("class Item {}", "Item"));
        assert!(declares_class("abstract class Item {}", "Item"));
        assert!(!declares_class("class ItemList {}", "Item"));
        assert!(!declares_class("subclass Item {}", "Item"));
        assert!(!declares_class("// class gone", "Item"));
    }

    #[test]
    fn base_name_strips_generic_arguments() {
        assert_eq!(base_class_name("Model<Item>"), "Model");
        assert_eq!(base_class_name("Parent"), "Parent");
    }
}
