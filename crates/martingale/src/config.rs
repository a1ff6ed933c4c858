//! Runner configuration
//!
//! A YAML file with every field optional; missing fields fall back to the
//! defaults below. Command-line flags are applied on top through
//! `Overrides`.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use martingale_core::analysis::SweepConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Directory for the CSV artifacts and the log file
    pub output_dir: PathBuf,
    /// Default log level for the runner (`RUST_LOG` wins when set)
    pub log_level: String,
    pub sweep: SweepConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            log_level: "info".to_string(),
            sweep: SweepConfig::default(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub repetitions: Option<usize>,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub raw_results: bool,
}

impl RunnerConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let yaml = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&yaml).wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> color_eyre::Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).wrap_err_with(|| format!("failed to write {}", path.display()))
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(dir) = &overrides.output_dir {
            self.output_dir.clone_from(dir);
        }
        if let Some(level) = &overrides.log_level {
            self.log_level.clone_from(level);
        }
        if let Some(repetitions) = overrides.repetitions {
            self.sweep.repetitions = repetitions;
        }
        if let Some(seed) = overrides.seed {
            self.sweep.seed = seed;
        }
        if let Some(threads) = overrides.threads {
            self.sweep.threads = Some(threads);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.sweep.timeout_secs = Some(timeout);
        }
        if overrides.raw_results {
            self.sweep.collect_runs = true;
        }
    }
}
