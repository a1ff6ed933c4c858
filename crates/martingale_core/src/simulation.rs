use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::bet::evaluate;
use crate::error::{Result, SimulationError};
use crate::model::{RunConfig, RunResult, StopReason};
use crate::simulation_state::RunState;
use crate::wheel::STANDARD_WHEEL;

/// Runs per batch; each batch owns one generator
pub const MAX_BATCH_SIZE: usize = 100;

/// Play one Martingale run to completion.
///
/// Every round places the current stake on the current color, spins the
/// standard wheel and settles the wager. A win resets the stake to base
/// (flipping the color when configured), a loss doubles it. The run stops
/// on ruin, on reaching the profit target, once the round budget is spent
/// outside a recovery, or when the balance can no longer cover the stake.
pub fn simulate<R: Rng + ?Sized>(
    config: &RunConfig,
    rng: &mut R,
) -> Result<RunResult> {
    config.validate()?;

    let mut state = RunState::from_config(config);
    if state.balance < state.stake {
        return Ok(state.into_result(StopReason::InsufficientFunds));
    }

    loop {
        let wager = state.place_wager();
        let slot = STANDARD_WHEEL.draw(rng);
        let payout = evaluate(&wager, &slot)?;

        if payout > 0.0 {
            state.settle_win(wager.stake, payout);
        } else {
            state.settle_loss(wager.stake);
        }

        if let Some(stop) = state.stop_reason() {
            return Ok(state.into_result(stop));
        }
    }
}

pub fn simulate_seeded(config: &RunConfig, seed: u64) -> Result<RunResult> {
    let mut rng = SmallRng::seed_from_u64(seed);
    simulate(config, &mut rng)
}

/// Derive an independent generator seed for one batch of one stream.
///
/// SplitMix64 finalizer over the combined inputs, so neighbouring batch
/// indices do not produce correlated `SmallRng` states.
#[must_use]
pub fn batch_seed(seed: u64, stream: u64, batch: u64) -> u64 {
    let mut z = seed
        ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ batch.wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Run one batch of `size` runs from a single generator
pub fn simulate_batch(
    config: &RunConfig,
    size: usize,
    seed: u64,
) -> Result<Vec<RunResult>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..size)
        .map(|_| {
            let run_seed = rng.next_u64();
            simulate_seeded(config, run_seed)
        })
        .collect()
}

/// Repeat a run `num_iterations` times in batches of `MAX_BATCH_SIZE`.
///
/// Results are deterministic for a given `seed` regardless of thread count.
pub fn monte_carlo_simulate(
    config: &RunConfig,
    num_iterations: usize,
    seed: u64,
) -> Result<Vec<RunResult>> {
    let num_batches = num_iterations.div_ceil(MAX_BATCH_SIZE);
    let batch_size = |i: usize| {
        if i == num_batches - 1 {
            num_iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        }
    };
    let stream = config.scenario_id.0;

    #[cfg(feature = "parallel")]
    let batches: Vec<Result<Vec<RunResult>>> = (0..num_batches)
        .into_par_iter()
        .map(|i| simulate_batch(config, batch_size(i), batch_seed(seed, stream, i as u64)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Result<Vec<RunResult>>> = (0..num_batches)
        .map(|i| simulate_batch(config, batch_size(i), batch_seed(seed, stream, i as u64)))
        .collect();

    let mut runs = Vec::with_capacity(num_iterations);
    for batch in batches {
        runs.extend(batch?);
    }
    Ok(runs)
}
