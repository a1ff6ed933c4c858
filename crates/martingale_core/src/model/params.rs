//! Scenario parameters and per-run configuration
//!
//! `ScenarioParameters` is the identity of a scenario. `RunConfig` adds what
//! a single run needs on top of it: the starting bankroll, the precomputed
//! profit target and the optional table cap.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::wheel::Color;

use super::ids::ScenarioId;

/// Probability that an even-money color wager loses (18 of the other color + zero)
pub const COLOR_LOSS_PROBABILITY: f64 = 19.0 / 37.0;

/// Default bankroll: the base stake doubled this many times
pub const DEFAULT_BANKROLL_DOUBLINGS: u32 = 10;

/// One point of the parameter sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub base_stake: f64,
    pub round_budget: u32,
    pub alternate_color_on_win: bool,
}

impl ScenarioParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.base_stake.is_finite() && self.base_stake > 0.0) {
            return Err(ParameterError::NonPositiveStake(self.base_stake));
        }
        if self.round_budget == 0 {
            return Err(ParameterError::ZeroRoundBudget);
        }
        Ok(())
    }

    /// Validate and encode into the aggregation key
    pub fn scenario_id(&self) -> Result<ScenarioId, ParameterError> {
        self.validate()?;
        Ok(ScenarioId::encode(self)?)
    }
}

/// Sweep-wide staking rules shared by every scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakingSettings {
    /// Initial balance is `base_stake * 2^bankroll_doublings`
    pub bankroll_doublings: u32,
    /// Table limit applied to the doubled stake after a loss
    pub max_stake: Option<f64>,
}

impl Default for StakingSettings {
    fn default() -> Self {
        Self {
            bankroll_doublings: DEFAULT_BANKROLL_DOUBLINGS,
            max_stake: None,
        }
    }
}

/// Starting bankroll for a base stake
#[must_use]
pub fn initial_balance(base_stake: f64, doublings: u32) -> f64 {
    base_stake * 2f64.powi(doublings as i32)
}

/// Number of consecutive losses the doubling progression can fund from
/// `initial_balance` before the stake has to be capped.
#[must_use]
pub fn ruin_streak_length(initial_balance: f64, base_stake: f64) -> u32 {
    (initial_balance / base_stake + 1.0).log2().floor().max(0.0) as u32
}

/// Estimated probability of hitting a ruinous losing streak within the round
/// budget.
///
/// A betting cycle ends on the first win and lasts about two rounds, so the
/// budget covers `round_budget / 2` cycles, each failing with probability
/// `q^k` where `k` is the fundable streak length.
#[must_use]
pub fn probability_of_failure(initial_balance: f64, base_stake: f64, round_budget: u32) -> f64 {
    let streak = ruin_streak_length(initial_balance, base_stake);
    let per_cycle = COLOR_LOSS_PROBABILITY.powi(streak as i32);
    let cycles = f64::from(round_budget) / 2.0;

    (1.0 - (1.0 - per_cycle).powf(cycles)).clamp(0.0, 1.0)
}

#[must_use]
pub fn probability_of_success(initial_balance: f64, base_stake: f64, round_budget: u32) -> f64 {
    1.0 - probability_of_failure(initial_balance, base_stake, round_budget)
}

/// Profit target for a scenario: one base stake per surviving cycle,
/// weighted by the probability of surviving the budget.
#[must_use]
pub fn profit_target(initial_balance: f64, base_stake: f64, round_budget: u32) -> f64 {
    let cycles = f64::from(round_budget) / 2.0;
    probability_of_success(initial_balance, base_stake, round_budget) * cycles * base_stake
}

/// Everything a single run needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub scenario: ScenarioParameters,
    pub scenario_id: ScenarioId,
    pub initial_balance: f64,
    /// Net profit at which the run stops with `target_reached`
    pub profit_target: f64,
    pub max_stake: Option<f64>,
    /// Color of the first wager
    pub starting_color: Color,
}

impl RunConfig {
    /// Derive the bankroll and profit target for a scenario
    pub fn for_scenario(
        scenario: ScenarioParameters,
        settings: &StakingSettings,
    ) -> Result<Self, ParameterError> {
        let scenario_id = scenario.scenario_id()?;
        let initial_balance = initial_balance(scenario.base_stake, settings.bankroll_doublings);
        let profit_target = profit_target(initial_balance, scenario.base_stake, scenario.round_budget);

        let config = Self {
            scenario,
            scenario_id,
            initial_balance,
            profit_target,
            max_stake: settings.max_stake,
            starting_color: Color::Black,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_profit_target(mut self, profit_target: f64) -> Self {
        self.profit_target = profit_target;
        self
    }

    #[must_use]
    pub fn with_initial_balance(mut self, initial_balance: f64) -> Self {
        self.initial_balance = initial_balance;
        self
    }

    #[must_use]
    pub fn with_max_stake(mut self, max_stake: Option<f64>) -> Self {
        self.max_stake = max_stake;
        self
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        self.scenario.validate()?;
        if !(self.initial_balance.is_finite() && self.initial_balance > 0.0) {
            return Err(ParameterError::NonPositiveBalance(self.initial_balance));
        }
        if let Some(cap) = self.max_stake
            && !(cap.is_finite() && cap > 0.0)
        {
            return Err(ParameterError::NonPositiveStake(cap));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(base_stake: f64, round_budget: u32) -> ScenarioParameters {
        ScenarioParameters {
            base_stake,
            round_budget,
            alternate_color_on_win: false,
        }
    }

    #[test]
    fn test_initial_balance() {
        assert_eq!(initial_balance(1.0, 10), 1024.0);
        assert_eq!(initial_balance(2.5, 3), 20.0);
    }

    #[test]
    fn test_ruin_streak_length() {
        // 1 + 2 + ... + 512 = 1023 <= 1024, the 11th stake would not be covered
        assert_eq!(ruin_streak_length(1024.0, 1.0), 10);
        assert_eq!(ruin_streak_length(7.0, 1.0), 3);
        assert_eq!(ruin_streak_length(6.0, 1.0), 2);
        assert_eq!(ruin_streak_length(1.0, 1.0), 1);
    }

    #[test]
    fn test_probability_of_failure_is_continuous() {
        let short = probability_of_failure(1024.0, 1.0, 100);
        let long = probability_of_failure(1024.0, 1.0, 10_000);

        assert!(short > 0.0 && short < 1.0, "got {short}");
        assert!(long > short);
        assert!(long < 1.0);

        let total = probability_of_failure(1024.0, 1.0, 100)
            + probability_of_success(1024.0, 1.0, 100);
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_profit_target_scales_with_stake() {
        let unit = profit_target(1024.0, 1.0, 100);
        let double = profit_target(2048.0, 2.0, 100);

        assert!(unit > 0.0 && unit < 50.0, "got {unit}");
        assert!((double - 2.0 * unit).abs() < 1e-9);
    }

    #[test]
    fn test_run_config_for_scenario() {
        let config = RunConfig::for_scenario(scenario(2.0, 200), &StakingSettings::default())
            .unwrap();

        assert_eq!(config.initial_balance, 2048.0);
        assert_eq!(config.scenario_id.decode(), config.scenario);
        assert!(config.profit_target > 0.0);
        assert_eq!(config.max_stake, None);
    }

    #[test]
    fn test_run_config_rejects_invalid() {
        let settings = StakingSettings::default();
        assert!(matches!(
            RunConfig::for_scenario(scenario(0.0, 100), &settings),
            Err(ParameterError::NonPositiveStake(_))
        ));
        assert!(matches!(
            RunConfig::for_scenario(scenario(1.0, 0), &settings),
            Err(ParameterError::ZeroRoundBudget)
        ));
        assert!(matches!(
            RunConfig::for_scenario(scenario(0.0001, 100), &settings),
            Err(ParameterError::Codec(_))
        ));

        let capped = StakingSettings {
            max_stake: Some(-5.0),
            ..Default::default()
        };
        assert!(RunConfig::for_scenario(scenario(1.0, 100), &capped).is_err());
    }
}
