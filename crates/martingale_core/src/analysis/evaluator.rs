//! Parameter sweep evaluator - fans runs out over a worker pool and folds
//! them into per-scenario metrics.
//!
//! Work is split into (scenario, batch) items of at most `MAX_BATCH_SIZE`
//! runs. Each item folds its runs into a private accumulator and merges it
//! into the scenario's shared accumulator under that scenario's lock, so
//! workers only contend when they finish a batch of the same scenario.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rustc_hash::FxHashMap;

use crate::error::ParameterError;
use crate::model::{AggregatedMetrics, RunConfig, RunResult, ScenarioId};
use crate::simulation::{MAX_BATCH_SIZE, batch_seed, simulate_seeded};

use super::accumulator::ScenarioAccumulator;
use super::config::{SweepConfig, worker_count};

/// Mixed into batch seeds to give reservoirs their own random stream
const SAMPLER_SALT: u64 = 0x5A4D_504C_4552_0001;

/// Progress tracking for a running sweep
#[derive(Debug, Clone)]
pub struct SweepProgress {
    /// Completed runs counter
    completed: Arc<AtomicUsize>,
    /// Total runs
    total: Arc<AtomicUsize>,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl SweepProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset the counters; the cancellation flag is left alone
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Stop starting new runs. Runs already in flight still finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SweepProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Everything a finished (or abandoned) sweep produced
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    /// One entry per scenario with at least two runs, sorted by scenario id
    pub metrics: Vec<AggregatedMetrics>,
    /// Scenarios left out of `metrics` for having fewer than two runs
    pub skipped: Vec<ScenarioId>,
    /// Raw results, only filled when `collect_runs` is set
    pub runs: Vec<RunResult>,
    pub completed_runs: u64,
    /// Runs aborted by an error or a panic
    pub failed_runs: u64,
    /// The deadline passed before all work was started; results are partial
    pub timed_out: bool,
    /// Cancelled through `SweepProgress`; results are partial
    pub cancelled: bool,
}

impl SweepOutcome {
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.timed_out || self.cancelled
    }
}

/// One batch of one scenario
#[derive(Debug, Clone, Copy)]
struct WorkItem {
    index: usize,
    config: RunConfig,
    batch: u64,
    size: usize,
}

fn plan_work(configs: &[RunConfig], repetitions: usize) -> Vec<WorkItem> {
    let num_batches = repetitions.div_ceil(MAX_BATCH_SIZE);
    let mut items = Vec::with_capacity(configs.len() * num_batches);
    for config in configs {
        for i in 0..num_batches {
            let size = if i == num_batches - 1 {
                repetitions - i * MAX_BATCH_SIZE
            } else {
                MAX_BATCH_SIZE
            };
            items.push(WorkItem {
                index: items.len(),
                config: *config,
                batch: i as u64,
                size,
            });
        }
    }
    items
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Merges never panic midway, so a poisoned value is still consistent
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Shared state of one sweep, borrowed by every worker
struct SweepRun<'a> {
    config: &'a SweepConfig,
    progress: &'a SweepProgress,
    deadline: Option<Instant>,
    accumulators: FxHashMap<ScenarioId, Mutex<ScenarioAccumulator>>,
    runs: Mutex<Vec<(usize, Vec<RunResult>)>>,
    completed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicBool,
}

impl SweepRun<'_> {
    /// False once the sweep was cancelled or ran out of time
    fn should_continue(&self) -> bool {
        if self.progress.is_cancelled() {
            return false;
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            if !self.timed_out.swap(true, Ordering::Relaxed) {
                tracing::warn!("sweep deadline reached, abandoning unstarted runs");
            }
            self.progress.cancel();
            return false;
        }
        true
    }

    fn process(&self, item: &WorkItem) {
        let scenario_id = item.config.scenario_id;
        let stream = scenario_id.0;
        let seed = batch_seed(self.config.seed, stream, item.batch);

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut local =
            ScenarioAccumulator::with_capacity(self.config.sample_capacity, seed ^ SAMPLER_SALT);
        let mut local_runs = Vec::new();

        for _ in 0..item.size {
            if !self.should_continue() {
                break;
            }
            let run_seed = rng.next_u64();

            match catch_unwind(AssertUnwindSafe(|| simulate_seeded(&item.config, run_seed))) {
                Ok(Ok(result)) => {
                    local.add(&result);
                    if self.config.collect_runs {
                        local_runs.push(result);
                    }
                    self.completed.fetch_add(1, Ordering::Relaxed);
                }
                Ok(Err(e)) => {
                    tracing::error!(%scenario_id, run_seed, error = %e, "run failed");
                    self.failed.fetch_add(1, Ordering::Relaxed);
                }
                Err(_) => {
                    tracing::error!(%scenario_id, run_seed, "run panicked");
                    self.failed.fetch_add(1, Ordering::Relaxed);
                }
            }
            self.progress.increment();
        }

        if local.is_empty() {
            return;
        }
        if let Some(shared) = self.accumulators.get(&scenario_id) {
            lock(shared).combine(local);
        }
        if !local_runs.is_empty() {
            lock(&self.runs).push((item.index, local_runs));
        }
    }
}

#[cfg(feature = "parallel")]
fn execute(sweep: &SweepRun<'_>, items: &[WorkItem], threads: usize) {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| items.par_iter().for_each(|item| sweep.process(item))),
        Err(e) => {
            tracing::warn!(error = %e, "could not build worker pool, running sequentially");
            items.iter().for_each(|item| sweep.process(item));
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn execute(sweep: &SweepRun<'_>, items: &[WorkItem], _threads: usize) {
    items.iter().for_each(|item| sweep.process(item));
}

/// Run every scenario of the grid `config.repetitions` times and reduce the
/// results to per-scenario metrics.
///
/// Run seeds depend only on the sweep seed, the scenario and the run's
/// position, so raw results are reproducible for any worker count. Only the
/// retained median sample depends on merge order.
///
/// A failed run is logged and dropped; its scenario simply has one run
/// fewer. On timeout or cancellation the runs already finished are still
/// aggregated and the outcome is flagged as partial.
pub fn sweep_evaluate(
    config: &SweepConfig,
    progress: Option<&SweepProgress>,
) -> Result<SweepOutcome, ParameterError> {
    let run_configs = config.run_configs()?;
    let items = plan_work(&run_configs, config.repetitions);
    let total_runs = run_configs.len() * config.repetitions;

    let local_progress = SweepProgress::new(total_runs);
    let progress = progress.unwrap_or(&local_progress);
    progress.reset(total_runs);

    let accumulators: FxHashMap<ScenarioId, Mutex<ScenarioAccumulator>> = run_configs
        .iter()
        .map(|rc| {
            let id = rc.scenario_id;
            let seed = batch_seed(config.seed, id.0, u64::MAX) ^ SAMPLER_SALT;
            (
                id,
                Mutex::new(ScenarioAccumulator::with_capacity(config.sample_capacity, seed)),
            )
        })
        .collect();

    let sweep = SweepRun {
        config,
        progress,
        deadline: config.timeout().map(|t| Instant::now() + t),
        accumulators,
        runs: Mutex::new(Vec::new()),
        completed: AtomicU64::new(0),
        failed: AtomicU64::new(0),
        timed_out: AtomicBool::new(false),
    };

    let threads = worker_count(config.threads, items.len());
    tracing::info!(
        scenarios = run_configs.len(),
        repetitions = config.repetitions,
        work_items = items.len(),
        threads,
        "starting sweep"
    );

    execute(&sweep, &items, threads);

    let timed_out = sweep.timed_out.load(Ordering::Relaxed);
    let cancelled = !timed_out && progress.is_cancelled();
    let completed_runs = sweep.completed.load(Ordering::Relaxed);
    let failed_runs = sweep.failed.load(Ordering::Relaxed);

    let mut batches = sweep
        .runs
        .into_inner()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    batches.sort_by_key(|(index, _)| *index);
    let runs: Vec<RunResult> = batches.into_iter().flat_map(|(_, runs)| runs).collect();

    let mut accumulators: Vec<(ScenarioId, ScenarioAccumulator)> = sweep
        .accumulators
        .into_iter()
        .map(|(id, acc)| {
            (
                id,
                acc.into_inner()
                    .unwrap_or_else(std::sync::PoisonError::into_inner),
            )
        })
        .collect();
    accumulators.sort_by_key(|(id, _)| *id);

    let mut metrics = Vec::with_capacity(accumulators.len());
    let mut skipped = Vec::new();
    for (id, acc) in &accumulators {
        match acc.to_metrics(*id) {
            Ok(m) => metrics.push(m),
            Err(e) => {
                tracing::warn!(scenario_id = %id, error = %e, "skipping scenario");
                skipped.push(*id);
            }
        }
    }

    if timed_out {
        tracing::warn!(completed_runs, total_runs, "sweep timed out, results are partial");
    } else if cancelled {
        tracing::warn!(completed_runs, total_runs, "sweep cancelled, results are partial");
    } else {
        tracing::info!(completed_runs, failed_runs, "sweep finished");
    }

    Ok(SweepOutcome {
        metrics,
        skipped,
        runs,
        completed_runs,
        failed_runs,
        timed_out,
        cancelled,
    })
}
