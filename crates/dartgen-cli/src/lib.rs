//! Batch driver for the dartgen pipeline: argument parsing, job
//! configuration and per-file generation with an end-of-run summary.

pub mod args;
pub mod config;
pub mod driver;
