//! sourcemark: replay an attribution alignment job and print the annotated tree.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use sourcemark::job::AlignmentJob;
use sourcemark::{AlignConfig, Error};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sourcemark")]
#[command(about = "Align knowledge-source attribution with rendered markdown", long_about = None)]
struct Args {
    /// Job file holding `full_text`, `segments` and `tree` as JSON ("-" reads stdin)
    #[arg(value_name = "JOB")]
    job: PathBuf,

    /// Load settings from this TOML file instead of ./sourcemark.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the skip-step bound per visible character
    #[arg(long, value_name = "N")]
    max_skip_steps: Option<usize>,

    /// Print the reconciled segment stream instead of the annotated tree
    #[arg(long)]
    reconcile_only: bool,

    /// Report span counts on stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sourcemark=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => AlignConfig::load_from(path)?,
        None => AlignConfig::load(),
    };

    // Override config with command line args
    if let Some(steps) = args.max_skip_steps {
        cfg.max_skip_steps = steps;
    }

    let job = read_job(&args.job)?;

    if args.reconcile_only {
        let stream = sourcemark::reconcile(&job.full_text, &job.segments);
        println!("{}", serde_json::to_string_pretty(&stream)?);
        return Ok(());
    }

    let outcome = job.run(&cfg);
    if args.stats {
        eprintln!(
            "segments: {}, attributed spans: {}",
            outcome.segments.len(),
            outcome.attributed_spans
        );
    }
    println!("{}", serde_json::to_string_pretty(&outcome.tree)?);

    Ok(())
}

fn read_job(path: &Path) -> Result<AlignmentJob, Error> {
    if path.as_os_str() == "-" {
        let mut contents = String::new();
        io::stdin()
            .read_to_string(&mut contents)
            .map_err(Error::Stdin)?;
        return AlignmentJob::from_json(&contents);
    }
    AlignmentJob::from_path(path)
}
