use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dartgen_emitter::Variant;
use serde::Deserialize;

/// CLI arguments for the dartgen binary.
#[derive(Parser, Debug)]
#[command(
    name = "dartgen",
    version,
    about = "Generate database entity Dart classes from model files"
)]
pub struct CliArgs {
    /// Input Dart model file or directory.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output directory for generated files.
    #[arg(short = 'o', long, default_value = ".")]
    pub output: PathBuf,

    /// Database binding to generate for.
    #[arg(short = 'd', long, value_enum, ignore_case = true)]
    pub db: Option<DbType>,

    /// Path to a TOML job configuration file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of the environment filter.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Storage binding selector, as spelled on the command line and in job
/// configuration files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Objectbox,
    Hive,
}

impl DbType {
    pub fn variant(self) -> Variant {
        match self {
            DbType::Objectbox => Variant::ObjectBox,
            DbType::Hive => Variant::Hive,
        }
    }
}
