//! Scenario aggregation and parameter sweeps.
//!
//! `ScenarioAccumulator` reduces the runs of one scenario to
//! `AggregatedMetrics`; `sweep_evaluate` runs a whole grid of scenarios on a
//! worker pool and returns one metrics row per scenario:
//!
//! ```ignore
//! use martingale_core::analysis::{SweepConfig, SweepProgress, sweep_evaluate};
//!
//! let config = SweepConfig {
//!     repetitions: 10_000,
//!     timeout_secs: Some(600),
//!     ..Default::default()
//! };
//!
//! let progress = SweepProgress::default();
//! let outcome = sweep_evaluate(&config, Some(&progress))?;
//! assert!(!outcome.is_partial());
//! ```

mod accumulator;
mod config;
mod evaluator;
pub mod stats;

pub use accumulator::*;
pub use config::*;
pub use evaluator::*;
