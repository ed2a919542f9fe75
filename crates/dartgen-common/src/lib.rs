//! Common types and utilities for the dartgen shadow-class generator.
//!
//! This crate provides foundational types used across all dartgen crates:
//! - Source spans (`Span`)
//! - Line/column mapping for diagnostics (`LineMap`, `Position`)
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Centralized limits and thresholds
pub mod limits;
