//! Tests for merge-order independence of `ScenarioAccumulator`
//!
//! Counters and sums must match exactly for every merge tree; the sampled
//! median only has to match in expectation.

use crate::analysis::ScenarioAccumulator;
use crate::model::{RunConfig, RunResult, ScenarioId, ScenarioParameters, StakingSettings};
use crate::simulation::monte_carlo_simulate;

fn runs(count: usize, seed: u64) -> Vec<RunResult> {
    let scenario = ScenarioParameters {
        base_stake: 1.0,
        round_budget: 100,
        alternate_color_on_win: false,
    };
    let config = RunConfig::for_scenario(scenario, &StakingSettings::default()).unwrap();
    monte_carlo_simulate(&config, count, seed).unwrap()
}

fn accumulate(results: &[RunResult], capacity: usize, seed: u64) -> ScenarioAccumulator {
    let mut acc = ScenarioAccumulator::with_capacity(capacity, seed);
    for r in results {
        acc.add(r);
    }
    acc
}

fn synthetic(values: std::ops::Range<u32>) -> Vec<RunResult> {
    let template = runs(1, 0)[0];
    values
        .map(|v| RunResult {
            net_profit: f64::from(v),
            ..template
        })
        .collect()
}

#[test]
fn test_merge_tree_shape_keeps_exact_totals() {
    let a = runs(300, 1);
    let b = runs(450, 2);
    let c = runs(250, 3);
    let all: Vec<RunResult> = a.iter().chain(&b).chain(&c).copied().collect();
    let id = all[0].scenario_id;

    let mut left = accumulate(&a, 100, 10);
    left.combine(accumulate(&b, 100, 11));
    left.combine(accumulate(&c, 100, 12));

    let mut right_inner = accumulate(&b, 100, 13);
    right_inner.combine(accumulate(&c, 100, 14));
    let mut right = accumulate(&a, 100, 15);
    right.combine(right_inner);

    let mut swapped = accumulate(&c, 100, 16);
    swapped.combine(accumulate(&a, 100, 17));
    swapped.combine(accumulate(&b, 100, 18));

    let flat = accumulate(&all, 100, 19).to_metrics(id).unwrap();
    for acc in [&left, &right, &swapped] {
        assert_eq!(acc.count(), 1000);
        assert_eq!(acc.samples().len(), 100);

        let m = acc.to_metrics(id).unwrap();
        // Profits are whole numbers, so every summation order is exact
        assert_eq!(m.average_profit, flat.average_profit);
        assert_eq!(m.profit_std_dev, flat.profit_std_dev);
        assert_eq!(m.probability_of_ruin, flat.probability_of_ruin);
        assert_eq!(m.probability_of_reaching_target, flat.probability_of_reaching_target);
        assert_eq!(m.average_rounds_played, flat.average_rounds_played);
        assert_eq!(m.confidence_interval_lower, flat.confidence_interval_lower);
        assert_eq!(m.confidence_interval_upper, flat.confidence_interval_upper);
    }
}

#[test]
fn test_sampled_median_matches_in_expectation() {
    // Uneven partitions of 0..3000: the true median is 1499.5
    let a = synthetic(0..500);
    let b = synthetic(500..2000);
    let c = synthetic(2000..3000);
    let id = ScenarioId(1);

    let trials = 100u64;
    let mut left_sum = 0.0;
    let mut right_sum = 0.0;
    for t in 0..trials {
        let seed = t * 10;

        let mut left = accumulate(&a, 200, seed);
        left.combine(accumulate(&b, 200, seed + 1));
        left.combine(accumulate(&c, 200, seed + 2));
        left_sum += left.to_metrics(id).unwrap().median_profit;

        let mut inner = accumulate(&c, 200, seed + 3);
        inner.combine(accumulate(&b, 200, seed + 4));
        let mut right = accumulate(&a, 200, seed + 5);
        right.combine(inner);
        right_sum += right.to_metrics(id).unwrap().median_profit;
    }

    let left_mean = left_sum / trials as f64;
    let right_mean = right_sum / trials as f64;
    assert!((left_mean - 1499.5).abs() < 50.0, "left tree median {left_mean}");
    assert!((right_mean - 1499.5).abs() < 50.0, "right tree median {right_mean}");
}
