//! Martingale roulette simulation library
//!
//! This crate estimates the long-run behavior of a doubling ("Martingale")
//! betting strategy on a single-zero roulette wheel. It supports:
//! - A 37-slot wheel model with color/parity/range/dozen/column classification
//! - Payout evaluation for the six outside/inside wager types
//! - A reversible 64-bit scenario identifier for parameter tuples
//! - A single-run simulator with ruin, target, budget and stall stopping rules
//! - Mergeable per-scenario statistics (mean, median, deviation, CI)
//! - A parallel parameter sweep that folds runs into per-scenario metrics
//!
//! # Example
//!
//! ```ignore
//! use martingale_core::analysis::{SweepConfig, sweep_evaluate};
//!
//! let config = SweepConfig {
//!     base_stakes: vec![1.0, 2.0],
//!     round_budgets: vec![100, 500],
//!     alternate_color_options: vec![false, true],
//!     repetitions: 1_000,
//!     ..Default::default()
//! };
//!
//! let outcome = sweep_evaluate(&config, None)?;
//! for metrics in &outcome.metrics {
//!     println!("{} -> ruin {:.3}", metrics.scenario_id, metrics.probability_of_ruin);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod bet;
pub mod error;
pub mod simulation;
pub mod simulation_state;
pub mod wheel;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{ScenarioAccumulator, SweepConfig, SweepOutcome, SweepProgress, sweep_evaluate};
pub use bet::{Selection, Wager, WagerType, evaluate};
pub use error::{AnalysisError, CodecError, ParameterError, SimulationError, WagerError};
pub use model::{AggregatedMetrics, RunConfig, RunResult, ScenarioId, ScenarioParameters, StopReason};
pub use simulation::{monte_carlo_simulate, simulate, simulate_seeded};
pub use wheel::{Color, Wheel, WheelSlot};
