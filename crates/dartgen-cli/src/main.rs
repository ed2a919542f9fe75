use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use dartgen_cli::args::CliArgs;
use dartgen_cli::{config, driver};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> anyhow::Result<usize> {
    let jobs = config::load(args)?;
    let mut failures = 0;
    for job in &jobs {
        let summary = driver::run_job(job)?;
        summary.print();
        failures += summary.failed();
    }
    Ok(failures)
}

/// Initialise the tracing subscriber. Logging stays off unless requested via
/// `--verbose` or `RUST_LOG`, and always writes to stderr so it never mixes
/// with the batch summary on stdout.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
