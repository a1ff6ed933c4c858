//! Command-line runner for the martingale roulette simulation
//!
//! Loads a YAML sweep configuration, runs the sweep from `martingale_core`
//! and writes the raw and aggregated results as CSV files.

pub mod config;
pub mod logging;
pub mod report;

pub use config::{Overrides, RunnerConfig};
pub use logging::init_logging;
pub use report::{ArtifactPaths, summary_line, write_artifacts, write_metrics, write_runs};
