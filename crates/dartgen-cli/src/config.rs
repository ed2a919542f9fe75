//! Job configuration.
//!
//! A config file is a TOML document with one `[[jobs]]` table per job. When
//! no config file is given, the CLI flags form a single job.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::args::{CliArgs, DbType};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// One unit of batch work: a set of inputs generated into one output
/// directory for one binding.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Input files or directories (directories enumerate `*.dart`
    /// non-recursively).
    pub input: Vec<PathBuf>,
    pub output_dir: PathBuf,
    #[serde(default = "Job::default_db_type")]
    pub db_type: DbType,
    /// File names excluded from directory enumeration.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Job {
    fn default_db_type() -> DbType {
        DbType::Objectbox
    }
}

/// Resolve the job list: the config file when given, otherwise a single job
/// from the CLI flags.
pub fn load(args: &CliArgs) -> Result<Vec<Job>> {
    if let Some(path) = &args.config {
        return load_file(path);
    }
    let input = args
        .input
        .clone()
        .context("no input file, directory or config file specified")?;
    Ok(vec![Job {
        input: vec![input],
        output_dir: args.output.clone(),
        db_type: args.db.unwrap_or(DbType::Objectbox),
        ignore: Vec::new(),
    }])
}

fn load_file(path: &Path) -> Result<Vec<Job>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: Config =
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config.jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jobs_parse_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [[jobs]]
            input = ["../repository/lib/model"]
            output_dir = "../repository_ob/lib/model"

            [[jobs]]
            input = ["../repository/lib/model"]
            output_dir = "../repository_hive/lib/model"
            db_type = "hive"
            ignore = ["abstract_item.dart"]
            "#,
        )
        .unwrap();

        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs[0].db_type, DbType::Objectbox);
        assert!(config.jobs[0].ignore.is_empty());
        assert_eq!(config.jobs[1].db_type, DbType::Hive);
        assert_eq!(config.jobs[1].ignore, vec!["abstract_item.dart"]);
    }

    #[test]
    fn empty_document_has_no_jobs() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.jobs.is_empty());
    }
}
