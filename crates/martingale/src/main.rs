use std::path::PathBuf;

use clap::Parser;
use martingale::report::summary_line;
use martingale::{Overrides, RunnerConfig, init_logging, write_artifacts};
use martingale_core::analysis::{SweepProgress, sweep_evaluate};

#[derive(Parser, Debug)]
#[command(name = "martingale")]
#[command(about = "Monte Carlo study of the Martingale strategy on a single-zero roulette wheel")]
struct Args {
    /// YAML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the CSV results and the log file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Runs per scenario
    #[arg(short, long)]
    repetitions: Option<usize>,

    /// Root seed for every run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads (default: CPU count)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Abandon unfinished runs after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Also write one row per run to simulation_results.csv
    #[arg(long)]
    raw_results: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Write the default configuration to this file and exit
    #[arg(long, value_name = "FILE")]
    write_default_config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            log_level: self.log_level.clone(),
            repetitions: self.repetitions,
            seed: self.seed,
            threads: self.threads,
            timeout_secs: self.timeout_secs,
            raw_results: self.raw_results,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        RunnerConfig::default().save(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    config.apply(&args.overrides());

    init_logging(&config.output_dir, &config.log_level)?;
    tracing::info!(?config, "configuration loaded");

    let progress = SweepProgress::default();
    let outcome = sweep_evaluate(&config.sweep, Some(&progress))?;
    let paths = write_artifacts(&config.output_dir, &outcome)?;

    for metrics in &outcome.metrics {
        println!("{}", summary_line(metrics));
    }
    for id in &outcome.skipped {
        println!("scenario {id} skipped: fewer than 2 completed runs");
    }

    println!(
        "\n{} runs completed, {} failed",
        outcome.completed_runs, outcome.failed_runs
    );
    if outcome.timed_out {
        println!("Timed out: results are partial");
    }
    if let Some(raw) = &paths.raw_results {
        println!("Raw results: {}", raw.display());
    }
    println!("Metrics:     {}", paths.metrics.display());

    tracing::info!("Application shutting down");
    Ok(())
}
