//! Typed resolution failures.

use std::path::PathBuf;

use dartgen_parser::GrammarError;

/// Why a parent class (or the file declaring it) could not be resolved.
///
/// All variants are recoverable: the driver logs them and continues without
/// the parent merge.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no pubspec.yaml found above {}", start.display())]
    MissingManifest { start: PathBuf },

    #[error("pubspec.yaml at {} has no name entry", path.display())]
    UnnamedManifest { path: PathBuf },

    #[error("package '{package}' not found among sibling projects")]
    PackageNotFound { package: String },

    #[error("imported file '{import}' not found")]
    ImportNotFound { import: String },

    #[error("class '{class}' not declared by any resolvable import")]
    ClassNotFound { class: String },

    #[error("parent chain deeper than {limit} while resolving '{class}'")]
    DepthExceeded { class: String, limit: usize },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] GrammarError),
}
