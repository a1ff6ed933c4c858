//! Mergeable per-scenario statistics
//!
//! Counters and sums are exact under any merge order. The profit sample used
//! for the median is a bounded reservoir: after any sequence of `add` and
//! `combine` calls it is a uniform random subset of every profit seen, so its
//! distribution does not depend on how runs were partitioned across workers.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::AnalysisError;
use crate::model::{AggregatedMetrics, RunResult, ScenarioId};

use super::stats::{median, students_t_critical};

/// Default number of profits retained for the median estimate
pub const DEFAULT_SAMPLE_CAPACITY: usize = 1000;

/// Confidence level of the interval on mean profit
pub const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone)]
pub struct ScenarioAccumulator {
    count: u64,
    profit_sum: f64,
    profit_sum_sq: f64,
    rounds_sum: u64,
    ruin_count: u64,
    target_count: u64,
    samples: Vec<f64>,
    capacity: usize,
    rng: SmallRng,
}

impl ScenarioAccumulator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_CAPACITY, seed)
    }

    /// `seed` drives the reservoir replacement choices only
    #[must_use]
    pub fn with_capacity(capacity: usize, seed: u64) -> Self {
        Self {
            count: 0,
            profit_sum: 0.0,
            profit_sum_sq: 0.0,
            rounds_sum: 0,
            ruin_count: 0,
            target_count: 0,
            samples: Vec::with_capacity(capacity.min(DEFAULT_SAMPLE_CAPACITY)),
            capacity,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The retained profit sample, in no particular order
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn add(&mut self, result: &RunResult) {
        let profit = result.net_profit;

        self.count += 1;
        self.profit_sum += profit;
        self.profit_sum_sq += profit * profit;
        self.rounds_sum += result.rounds_played;
        self.ruin_count += u64::from(result.ruined);
        self.target_count += u64::from(result.target_reached);

        if self.samples.len() < self.capacity {
            self.samples.push(profit);
        } else {
            let j = self.rng.random_range(0..self.count);
            if let Ok(j) = usize::try_from(j)
                && j < self.capacity
            {
                self.samples[j] = profit;
            }
        }
    }

    /// Fold in an accumulator that covers a disjoint set of runs of the same
    /// scenario. The merged reservoir shrinks to the smaller of the two
    /// capacities, the largest size both sides can fill uniformly.
    pub fn combine(&mut self, other: ScenarioAccumulator) {
        let left_count = self.count;
        let right_count = other.count;
        self.capacity = self.capacity.min(other.capacity);

        self.count += other.count;
        self.profit_sum += other.profit_sum;
        self.profit_sum_sq += other.profit_sum_sq;
        self.rounds_sum += other.rounds_sum;
        self.ruin_count += other.ruin_count;
        self.target_count += other.target_count;

        let mut right = other.samples;
        let left_complete = self.samples.len() as u64 == left_count;
        let right_complete = right.len() as u64 == right_count;

        if left_complete && right_complete && self.samples.len() + right.len() <= self.capacity {
            self.samples.append(&mut right);
            return;
        }

        // Draw the merged sample size without replacement from the union of
        // both populations, then take that many from each side uniformly.
        let keep = (self.capacity as u64).min(self.count);
        let mut left_remaining = left_count;
        let mut right_remaining = right_count;
        let mut take_left = 0usize;
        for _ in 0..keep {
            let pick = self.rng.random_range(0..left_remaining + right_remaining);
            if pick < left_remaining {
                left_remaining -= 1;
                take_left += 1;
            } else {
                right_remaining -= 1;
            }
        }
        let take_right = keep as usize - take_left;

        self.samples.shuffle(&mut self.rng);
        self.samples.truncate(take_left);
        right.shuffle(&mut self.rng);
        right.truncate(take_right);
        self.samples.append(&mut right);
    }

    /// Summarise everything added so far.
    ///
    /// Fails with `InsufficientSamples` below two runs, where the variance
    /// and the confidence interval are undefined.
    pub fn to_metrics(&self, scenario_id: ScenarioId) -> Result<AggregatedMetrics, AnalysisError> {
        if self.count < 2 {
            return Err(AnalysisError::InsufficientSamples {
                scenario_id,
                count: self.count,
            });
        }

        let n = self.count as f64;
        let mean = self.profit_sum / n;
        let variance = ((self.profit_sum_sq - self.profit_sum * self.profit_sum / n) / (n - 1.0))
            .max(0.0);
        let std_dev = variance.sqrt();
        let margin = students_t_critical(n - 1.0, CONFIDENCE_LEVEL) * std_dev / n.sqrt();

        Ok(AggregatedMetrics {
            scenario_id,
            average_profit: mean,
            median_profit: median(&self.samples),
            profit_std_dev: std_dev,
            probability_of_ruin: self.ruin_count as f64 / n,
            probability_of_reaching_target: self.target_count as f64 / n,
            average_rounds_played: self.rounds_sum as f64 / n,
            confidence_interval_lower: mean - margin,
            confidence_interval_upper: mean + margin,
        })
    }
}
