//! Back half of the dartgen pipeline: transform a resolved domain model into
//! a shadow persistence-entity class per storage variant, then render it to
//! byte-stable source text.

pub mod variant;
pub use variant::{Variant, VariantConfig};

pub mod generate;
pub use generate::EntityGenerator;

pub mod include;

pub mod render;
pub use render::render;
