//! CSV output artifacts
//!
//! Header rows come from the `FIELD_NAMES` constants next to each record;
//! data rows are serialized without serde-generated headers.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use martingale_core::analysis::SweepOutcome;
use martingale_core::model::{AggregatedMetrics, RunResult};
use serde::Serialize;

/// Raw per-run results
pub const RAW_RESULTS_FILE: &str = "simulation_results.csv";
/// Per-scenario metrics
pub const METRICS_FILE: &str = "simulation_results_analysed.csv";

/// Files written for one sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Only present when raw results were collected
    pub raw_results: Option<PathBuf>,
    pub metrics: PathBuf,
}

fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> color_eyre::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_runs(path: &Path, runs: &[RunResult]) -> color_eyre::Result<()> {
    write_rows(path, &RunResult::FIELD_NAMES, runs)
}

pub fn write_metrics(path: &Path, metrics: &[AggregatedMetrics]) -> color_eyre::Result<()> {
    write_rows(path, &AggregatedMetrics::FIELD_NAMES, metrics)
}

/// Write the metrics file, plus the raw file when the outcome carries runs
pub fn write_artifacts(
    output_dir: &Path,
    outcome: &SweepOutcome,
) -> color_eyre::Result<ArtifactPaths> {
    fs::create_dir_all(output_dir)?;

    let raw_results = if outcome.runs.is_empty() {
        None
    } else {
        let path = output_dir.join(RAW_RESULTS_FILE);
        write_runs(&path, &outcome.runs)?;
        tracing::info!(path = %path.display(), rows = outcome.runs.len(), "wrote raw results");
        Some(path)
    };

    let metrics = output_dir.join(METRICS_FILE);
    write_metrics(&metrics, &outcome.metrics)?;
    tracing::info!(path = %metrics.display(), rows = outcome.metrics.len(), "wrote metrics");

    Ok(ArtifactPaths {
        raw_results,
        metrics,
    })
}

/// One human-readable line per scenario
#[must_use]
pub fn summary_line(metrics: &AggregatedMetrics) -> String {
    let params = metrics.scenario_id.decode();
    format!(
        "stake {:>8.3}  rounds {:>6}  alternate {:<5}  mean {:>10.2}  median {:>10.2}  ruin {:>6.2}%  target {:>6.2}%  95% CI [{:.2}, {:.2}]",
        params.base_stake,
        params.round_budget,
        params.alternate_color_on_win,
        metrics.average_profit,
        metrics.median_profit,
        metrics.probability_of_ruin * 100.0,
        metrics.probability_of_reaching_target * 100.0,
        metrics.confidence_interval_lower,
        metrics.confidence_interval_upper,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use martingale_core::analysis::{SweepConfig, sweep_evaluate};
    use martingale_core::model::ScenarioId;
    use tempfile::tempdir;

    fn outcome(collect_runs: bool) -> SweepOutcome {
        let config = SweepConfig {
            base_stakes: vec![1.0, 2.0],
            round_budgets: vec![100],
            alternate_color_options: vec![false],
            repetitions: 20,
            seed: 5,
            collect_runs,
            ..Default::default()
        };
        sweep_evaluate(&config, None).unwrap()
    }

    #[test]
    fn test_field_names_match_serialized_order() {
        let outcome = outcome(true);

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&outcome.runs[0]).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().next().unwrap(), RunResult::FIELD_NAMES.join(","));

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&outcome.metrics[0]).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            AggregatedMetrics::FIELD_NAMES.join(",")
        );
    }

    #[test]
    fn test_artifacts_round_trip() {
        let dir = tempdir().unwrap();
        let outcome = outcome(true);

        let paths = write_artifacts(dir.path(), &outcome).unwrap();
        assert_eq!(paths.metrics, dir.path().join(METRICS_FILE));
        let raw_path = paths.raw_results.unwrap();

        let mut reader = csv::Reader::from_path(&raw_path).unwrap();
        let runs: Vec<RunResult> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(runs, outcome.runs);
        assert_eq!(runs.len(), 40);

        let mut reader = csv::Reader::from_path(&paths.metrics).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, AggregatedMetrics::FIELD_NAMES);
        let metrics: Vec<AggregatedMetrics> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(metrics, outcome.metrics);
    }

    #[test]
    fn test_raw_file_skipped_without_runs() {
        let dir = tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &outcome(false)).unwrap();

        assert_eq!(paths.raw_results, None);
        assert!(!dir.path().join(RAW_RESULTS_FILE).exists());
        assert!(paths.metrics.exists());
    }

    #[test]
    fn test_empty_metrics_still_write_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(METRICS_FILE);
        write_metrics(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), AggregatedMetrics::FIELD_NAMES.join(","));
    }

    #[test]
    fn test_summary_line_decodes_scenario() {
        let metrics = AggregatedMetrics {
            scenario_id: ScenarioId((2000 << 31) | (200 << 1) | 1),
            average_profit: -3.5,
            median_profit: 12.0,
            profit_std_dev: 100.0,
            probability_of_ruin: 0.05,
            probability_of_reaching_target: 0.7,
            average_rounds_played: 150.0,
            confidence_interval_lower: -10.0,
            confidence_interval_upper: 3.0,
        };
        let line = summary_line(&metrics);
        assert!(line.contains("stake    2.000"), "{line}");
        assert!(line.contains("rounds    200"), "{line}");
        assert!(line.contains("alternate true"), "{line}");
        assert!(line.contains("ruin   5.00%"), "{line}");
    }
}
