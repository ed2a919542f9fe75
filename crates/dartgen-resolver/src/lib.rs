//! Symbol resolution for the dartgen pipeline: locating the file that
//! declares a parent class and merging its member variables into the child.
//!
//! Resolution is best-effort by design. Any failure here is recoverable:
//! the caller logs it and generates the class without the parent's fields.

pub mod error;
pub use error::ResolveError;

pub mod manifest;
pub use manifest::PackageManifest;

pub mod resolve;
pub use resolve::{ParentResolver, find_parent_class_path, import_to_path};
