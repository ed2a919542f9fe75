//! Package manifest discovery.
//!
//! A Dart package is rooted at the directory holding its `pubspec.yaml`.
//! Only the top-level `name:` entry is needed here, so the manifest is read
//! with a line scan rather than a full YAML parse.

use std::fs;
use std::path::{Path, PathBuf};

use dartgen_common::limits::MAX_MANIFEST_WALK_DEPTH;
use tracing::trace;

use crate::error::ResolveError;

/// The identity of the package containing a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageManifest {
    pub package_name: String,
    pub root_directory: PathBuf,
}

impl PackageManifest {
    /// Walk parent directories of `start_file` looking for `pubspec.yaml`.
    ///
    /// The walk is bounded by `MAX_MANIFEST_WALK_DEPTH`; a file outside any
    /// package yields `MissingManifest` instead of climbing to the
    /// filesystem root.
    pub fn discover(start_file: &Path) -> Result<Self, ResolveError> {
        let mut dir = start_file.parent();
        for _ in 0..MAX_MANIFEST_WALK_DEPTH {
            let Some(current) = dir else { break };
            let pubspec = current.join("pubspec.yaml");
            if pubspec.is_file() {
                let package_name = read_package_name(&pubspec)?;
                trace!(package = %package_name, root = %current.display(), "found manifest");
                return Ok(Self {
                    package_name,
                    root_directory: current.to_path_buf(),
                });
            }
            dir = current.parent();
        }
        Err(ResolveError::MissingManifest {
            start: start_file.to_path_buf(),
        })
    }

    /// The `package:<name>/<path-under-lib>` import identifying `file` from
    /// any other package. `None` when the file is not under this package's
    /// `lib/` directory.
    pub fn package_import_identifier(&self, file: &Path) -> Option<String> {
        let rel = file.strip_prefix(self.root_directory.join("lib")).ok()?;
        let mut parts = Vec::new();
        for component in rel.components() {
            parts.push(component.as_os_str().to_str()?);
        }
        Some(format!("package:{}/{}", self.package_name, parts.join("/")))
    }
}

/// Read the top-level `name:` entry from a pubspec.
pub(crate) fn read_package_name(pubspec: &Path) -> Result<String, ResolveError> {
    let text = fs::read_to_string(pubspec).map_err(|source| ResolveError::Io {
        path: pubspec.to_path_buf(),
        source,
    })?;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("name:") {
            let name = rest.trim().trim_matches(|c| c == '"' || c == '\'');
            if !name.is_empty() {
                return Ok(name.to_string());
            }
        }
    }
    Err(ResolveError::UnnamedManifest {
        path: pubspec.to_path_buf(),
    })
}
