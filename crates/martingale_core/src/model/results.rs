//! Run and scenario result records
//!
//! Both records carry a hand-maintained `FIELD_NAMES` list in the same order
//! as their serialized fields; output writers use it for the header row.

use serde::{Deserialize, Serialize};

use super::ids::ScenarioId;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    Ruined,
    TargetReached,
    /// Round budget exceeded while not recovering from a loss
    BudgetExhausted,
    /// Balance no longer covers the next stake
    InsufficientFunds,
}

/// Outcome of exactly one simulated run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub initial_balance: f64,
    pub base_stake: f64,
    pub round_budget: u32,
    pub profit_target: f64,
    pub final_balance: f64,
    pub net_profit: f64,
    /// Sum of net winnings over winning rounds
    pub total_won: f64,
    /// Sum of stakes lost over losing rounds
    pub total_lost: f64,
    pub rounds_played: u64,
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
    pub target_reached: bool,
    pub ruined: bool,
    pub alternate_color_on_win: bool,
    pub scenario_id: ScenarioId,
}

impl RunResult {
    /// Column names, in serialization order
    pub const FIELD_NAMES: [&'static str; 15] = [
        "initialBalance",
        "baseStake",
        "roundBudget",
        "profitTarget",
        "finalBalance",
        "netProfit",
        "totalWon",
        "totalLost",
        "roundsPlayed",
        "maxWinStreak",
        "maxLossStreak",
        "targetReached",
        "ruined",
        "alternateColorOnWin",
        "scenarioId",
    ];

    #[must_use]
    pub fn stop_reason(&self) -> StopReason {
        if self.ruined {
            StopReason::Ruined
        } else if self.target_reached {
            StopReason::TargetReached
        } else if self.rounds_played > u64::from(self.round_budget) {
            StopReason::BudgetExhausted
        } else {
            StopReason::InsufficientFunds
        }
    }
}

/// Summary statistics for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    pub scenario_id: ScenarioId,
    pub average_profit: f64,
    /// Approximate: computed from the bounded profit sample
    pub median_profit: f64,
    pub profit_std_dev: f64,
    pub probability_of_ruin: f64,
    pub probability_of_reaching_target: f64,
    pub average_rounds_played: f64,
    /// 95% Student-t interval on the mean profit
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
}

impl AggregatedMetrics {
    pub const FIELD_NAMES: [&'static str; 9] = [
        "scenarioId",
        "averageProfit",
        "medianProfit",
        "profitStdDev",
        "probabilityOfRuin",
        "probabilityOfReachingTarget",
        "averageRoundsPlayed",
        "confidenceIntervalLower",
        "confidenceIntervalUpper",
    ];
}
