//! Batch pipeline: discover inputs, run parse → resolve → transform →
//! render per file, write outputs and summarize.
//!
//! Failures are isolated per input file; one malformed model never aborts
//! the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use dartgen_emitter::{EntityGenerator, Variant, render};
use dartgen_parser::parse_source;
use dartgen_resolver::{PackageManifest, ParentResolver};
use globset::{Glob, GlobMatcher};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Job;

/// What happened to one input file.
#[derive(Debug)]
pub enum Outcome {
    Generated { input: PathBuf, output: PathBuf },
    Skipped { input: PathBuf, reason: String },
    Failed { input: PathBuf, reason: String },
}

#[derive(Debug, Default)]
pub struct Summary {
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn generated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Generated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }

    /// Print the per-file outcomes and totals.
    pub fn print(&self) {
        for outcome in &self.outcomes {
            match outcome {
                Outcome::Generated { input, output } => {
                    println!(
                        "{} {} -> {}",
                        "generated".green(),
                        input.display(),
                        output.display()
                    );
                }
                Outcome::Skipped { input, reason } => {
                    println!("{} {} ({reason})", "skipped".yellow(), input.display());
                }
                Outcome::Failed { input, reason } => {
                    println!("{} {}: {reason}", "failed".red(), input.display());
                }
            }
        }
        println!(
            "\n{} generated, {} skipped, {} failed",
            self.generated(),
            self.skipped(),
            self.failed()
        );
    }
}

/// Run one job end to end.
pub fn run_job(job: &Job) -> Result<Summary> {
    let mut summary = Summary::default();
    let inputs = discover_inputs(job, &mut summary)?;

    fs::create_dir_all(&job.output_dir)
        .with_context(|| format!("creating output directory {}", job.output_dir.display()))?;

    let variant = job.db_type.variant();
    for input in inputs {
        match generate_file(&input, &job.output_dir, variant) {
            Ok(output) => {
                info!(input = %input.display(), output = %output.display(), "generated");
                summary.outcomes.push(Outcome::Generated { input, output });
            }
            Err(err) => {
                summary.outcomes.push(Outcome::Failed {
                    input,
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    Ok(summary)
}

/// Expand the job's input specs into a sorted list of model files, recording
/// skipped entries in the summary.
fn discover_inputs(job: &Job, summary: &mut Summary) -> Result<Vec<PathBuf>> {
    // Files with a secondary extension are previously generated or derived,
    // never hand-written models.
    let derived = Glob::new("*.*.dart")?.compile_matcher();

    let mut files = Vec::new();
    for spec in &job.input {
        if spec.is_dir() {
            for entry in WalkDir::new(spec).follow_links(true).min_depth(1).max_depth(1) {
                // An unreadable entry fails on its own; the rest of the
                // directory still generates.
                let path = match entry {
                    Ok(entry) => entry.into_path(),
                    Err(err) => {
                        summary.outcomes.push(Outcome::Failed {
                            input: err.path().map(Path::to_path_buf).unwrap_or_else(|| spec.clone()),
                            reason: err.to_string(),
                        });
                        continue;
                    }
                };
                if path.extension().and_then(|e| e.to_str()) != Some("dart") {
                    continue;
                }
                consider(path, job, &derived, &mut files, summary);
            }
        } else if spec.is_file() {
            consider(spec.clone(), job, &derived, &mut files, summary);
        } else {
            summary.outcomes.push(Outcome::Failed {
                input: spec.clone(),
                reason: "path does not exist".to_string(),
            });
        }
    }
    files.sort();
    Ok(files)
}

fn consider(
    path: PathBuf,
    job: &Job,
    derived: &GlobMatcher,
    files: &mut Vec<PathBuf>,
    summary: &mut Summary,
) {
    let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
        return;
    };
    if derived.is_match(&name) {
        debug!(file = %path.display(), "skipping derived file");
        summary.outcomes.push(Outcome::Skipped {
            input: path,
            reason: "derived file".to_string(),
        });
        return;
    }
    if job.ignore.iter().any(|ignored| ignored == &name) {
        summary.outcomes.push(Outcome::Skipped {
            input: path,
            reason: "ignored by configuration".to_string(),
        });
        return;
    }
    files.push(path);
}

/// Run the whole pipeline for one model file and write the result.
fn generate_file(input: &Path, output_dir: &Path, variant: Variant) -> Result<PathBuf> {
    let text =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let mut file = parse_source(&text, input).map_err(|err| anyhow!("{}", err.report()))?;

    ParentResolver::new().resolve_file(&mut file);

    let self_import = match PackageManifest::discover(input) {
        Ok(manifest) => manifest.package_import_identifier(input),
        Err(err) => {
            debug!(%err, input = %input.display(), "no package manifest; omitting self import");
            None
        }
    };

    let generator = EntityGenerator::new(variant, self_import);
    generator.transform(&mut file);
    generator.splice_includes(&mut file, output_dir);

    let rendered = render(&file);
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("non-UTF-8 file name {}", input.display()))?;
    let output = output_dir.join(format!("{stem}.{}.dart", variant.file_tag()));
    fs::write(&output, rendered).with_context(|| format!("writing {}", output.display()))?;
    Ok(output)
}
