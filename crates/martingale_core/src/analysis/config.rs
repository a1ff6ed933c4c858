//! Configuration for a parameter sweep.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::model::{
    DEFAULT_BANKROLL_DOUBLINGS, RunConfig, ScenarioParameters, StakingSettings,
};

use super::accumulator::DEFAULT_SAMPLE_CAPACITY;

/// Grid of scenarios plus the settings shared by every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub base_stakes: Vec<f64>,
    pub round_budgets: Vec<u32>,
    pub alternate_color_options: Vec<bool>,
    /// Runs per scenario
    pub repetitions: usize,
    /// Root seed; every run seed is derived from it
    pub seed: u64,
    /// Profits retained per scenario for the median estimate
    pub sample_capacity: usize,
    pub bankroll_doublings: u32,
    /// Table limit on the doubled stake
    pub max_stake: Option<f64>,
    /// Abandon unfinished work after this many seconds
    pub timeout_secs: Option<u64>,
    /// Keep every `RunResult` in the outcome
    pub collect_runs: bool,
    /// Worker count override (defaults to CPU count)
    pub threads: Option<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            base_stakes: vec![1.0, 2.0, 5.0],
            round_budgets: vec![100, 200, 500],
            alternate_color_options: vec![true, false],
            repetitions: 1000,
            seed: 0,
            sample_capacity: DEFAULT_SAMPLE_CAPACITY,
            bankroll_doublings: DEFAULT_BANKROLL_DOUBLINGS,
            max_stake: None,
            timeout_secs: None,
            collect_runs: false,
            threads: None,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.base_stakes.is_empty() {
            return Err(ParameterError::EmptyGrid("base stakes"));
        }
        if self.round_budgets.is_empty() {
            return Err(ParameterError::EmptyGrid("round budgets"));
        }
        if self.alternate_color_options.is_empty() {
            return Err(ParameterError::EmptyGrid("color alternation options"));
        }
        if self.repetitions == 0 {
            return Err(ParameterError::ZeroRepetitions);
        }
        if self.sample_capacity == 0 {
            return Err(ParameterError::ZeroSampleCapacity);
        }
        Ok(())
    }

    #[must_use]
    pub fn staking(&self) -> StakingSettings {
        StakingSettings {
            bankroll_doublings: self.bankroll_doublings,
            max_stake: self.max_stake,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Every point of the grid, in grid order (stake, then budget, then flag)
    #[must_use]
    pub fn scenarios(&self) -> Vec<ScenarioParameters> {
        let mut scenarios = Vec::with_capacity(self.total_points());
        for &base_stake in &self.base_stakes {
            for &round_budget in &self.round_budgets {
                for &alternate_color_on_win in &self.alternate_color_options {
                    scenarios.push(ScenarioParameters {
                        base_stake,
                        round_budget,
                        alternate_color_on_win,
                    });
                }
            }
        }
        scenarios
    }

    /// Validate the grid and derive one `RunConfig` per distinct scenario.
    ///
    /// Duplicate grid points collapse onto the first occurrence, since they
    /// share a scenario id.
    pub fn run_configs(&self) -> Result<Vec<RunConfig>, ParameterError> {
        self.validate()?;
        let staking = self.staking();

        let mut configs: Vec<RunConfig> = Vec::with_capacity(self.total_points());
        for scenario in self.scenarios() {
            let config = RunConfig::for_scenario(scenario, &staking)?;
            if configs.iter().all(|c| c.scenario_id != config.scenario_id) {
                configs.push(config);
            }
        }
        Ok(configs)
    }

    #[must_use]
    pub fn total_points(&self) -> usize {
        self.base_stakes.len() * self.round_budgets.len() * self.alternate_color_options.len()
    }
}

/// Worker threads for `work_items` units of work: the override or the CPU
/// count, never more than there is work.
#[must_use]
pub fn worker_count(threads: Option<usize>, work_items: usize) -> usize {
    let available = threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    });
    available.min(work_items).max(1)
}
