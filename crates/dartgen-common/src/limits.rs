//! Centralized limits and thresholds for the generator pipeline.
//!
//! Centralizing these values prevents duplicate definitions with
//! inconsistent bounds and documents the rationale for each limit.

/// Maximum number of parent directories walked when searching for a package
/// manifest (`pubspec.yaml`).
///
/// The search for a package root otherwise terminates only at the filesystem
/// root; a bounded walk turns a pathologically deep tree into a typed
/// "manifest not found" result instead of a long crawl.
pub const MAX_MANIFEST_WALK_DEPTH: usize = 32;

/// Maximum depth of transitive parent-class resolution.
///
/// Parent merging follows `extends` chains across files. A visited set
/// already breaks cycles; this depth stop additionally bounds degenerate
/// non-cyclic chains (machine-generated hierarchies).
pub const MAX_PARENT_RESOLUTION_DEPTH: usize = 16;

/// Half-width, in bytes, of the context window shown in grammar errors.
pub const ERROR_CONTEXT_BYTES: usize = 40;
