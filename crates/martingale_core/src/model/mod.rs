mod ids;
mod params;
mod results;

pub use ids::{BASE_STAKE_SCALE, MAX_ROUND_BUDGET, MAX_SCALED_STAKE, ScenarioId};
pub use params::{
    COLOR_LOSS_PROBABILITY, DEFAULT_BANKROLL_DOUBLINGS, RunConfig, ScenarioParameters,
    StakingSettings, initial_balance, probability_of_failure, probability_of_success,
    profit_target, ruin_streak_length,
};
pub use results::{AggregatedMetrics, RunResult, StopReason};
