//! Mutable state of a single Martingale run
//!
//! The run loop in `simulation` drives this through one round at a time:
//! `place_wager` debits the stake, then exactly one of `settle_win` or
//! `settle_loss` adjusts the stake for the next round, then `stop_reason`
//! decides whether the run is over.

use crate::bet::Wager;
use crate::model::{RunConfig, RunResult, StopReason};
use crate::wheel::Color;

#[derive(Debug, Clone)]
pub struct RunState {
    config: RunConfig,
    pub balance: f64,
    /// Stake for the next wager
    pub stake: f64,
    pub color: Color,
    pub rounds_played: u64,
    pub total_won: f64,
    pub total_lost: f64,
    pub current_win_streak: u32,
    pub current_loss_streak: u32,
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
}

impl RunState {
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            config: *config,
            balance: config.initial_balance,
            stake: config.scenario.base_stake,
            color: config.starting_color,
            rounds_played: 0,
            total_won: 0.0,
            total_lost: 0.0,
            current_win_streak: 0,
            current_loss_streak: 0,
            max_win_streak: 0,
            max_loss_streak: 0,
        }
    }

    #[must_use]
    pub fn net_profit(&self) -> f64 {
        self.balance - self.config.initial_balance
    }

    /// True while the stake differs from base. A balance cap that brings the
    /// stake back down to base ends the recovery even mid-streak.
    #[must_use]
    pub fn in_recovery(&self) -> bool {
        self.stake != self.config.scenario.base_stake
    }

    /// Build the wager for this round and debit its stake
    pub fn place_wager(&mut self) -> Wager {
        let wager = Wager::on_color(self.stake, self.color);
        self.balance -= self.stake;
        self.rounds_played += 1;
        wager
    }

    pub fn settle_win(&mut self, stake: f64, payout: f64) {
        self.balance += payout;
        self.total_won += payout - stake;

        self.stake = self.config.scenario.base_stake;
        if self.config.scenario.alternate_color_on_win {
            self.color = self.color.flipped();
        }

        self.current_loss_streak = 0;
        self.current_win_streak += 1;
        self.max_win_streak = self.max_win_streak.max(self.current_win_streak);
    }

    pub fn settle_loss(&mut self, stake: f64) {
        self.total_lost += stake;

        let mut next = stake * 2.0;
        if let Some(cap) = self.config.max_stake {
            next = next.min(cap);
        }
        // Never stake more than what is left
        self.stake = next.min(self.balance);

        self.current_win_streak = 0;
        self.current_loss_streak += 1;
        self.max_loss_streak = self.max_loss_streak.max(self.current_loss_streak);
    }

    /// Stopping rules, checked in order after every round
    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.balance <= 0.0 {
            return Some(StopReason::Ruined);
        }
        if self.net_profit() >= self.config.profit_target {
            return Some(StopReason::TargetReached);
        }
        if self.rounds_played > u64::from(self.config.scenario.round_budget) && !self.in_recovery()
        {
            return Some(StopReason::BudgetExhausted);
        }
        if self.balance < self.stake {
            return Some(StopReason::InsufficientFunds);
        }
        None
    }

    #[must_use]
    pub fn into_result(self, stop: StopReason) -> RunResult {
        RunResult {
            initial_balance: self.config.initial_balance,
            base_stake: self.config.scenario.base_stake,
            round_budget: self.config.scenario.round_budget,
            profit_target: self.config.profit_target,
            final_balance: self.balance,
            net_profit: self.net_profit(),
            total_won: self.total_won,
            total_lost: self.total_lost,
            rounds_played: self.rounds_played,
            max_win_streak: self.max_win_streak,
            max_loss_streak: self.max_loss_streak,
            target_reached: stop == StopReason::TargetReached,
            ruined: stop == StopReason::Ruined,
            alternate_color_on_win: self.config.scenario.alternate_color_on_win,
            scenario_id: self.config.scenario_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScenarioParameters, StakingSettings};

    fn config(alternate: bool) -> RunConfig {
        let scenario = ScenarioParameters {
            base_stake: 1.0,
            round_budget: 10,
            alternate_color_on_win: alternate,
        };
        RunConfig::for_scenario(scenario, &StakingSettings::default()).unwrap()
    }

    #[test]
    fn test_loss_doubles_stake() {
        let mut state = RunState::from_config(&config(false));

        let wager = state.place_wager();
        state.settle_loss(wager.stake);
        assert_eq!(state.stake, 2.0);
        assert_eq!(state.balance, 1023.0);

        let wager = state.place_wager();
        state.settle_loss(wager.stake);
        assert_eq!(state.stake, 4.0);
        assert_eq!(state.balance, 1021.0);
        assert_eq!(state.max_loss_streak, 2);
        assert!(state.in_recovery());
    }

    #[test]
    fn test_win_resets_stake_and_recovers() {
        let mut state = RunState::from_config(&config(false));

        for _ in 0..3 {
            let wager = state.place_wager();
            state.settle_loss(wager.stake);
        }
        let wager = state.place_wager();
        state.settle_win(wager.stake, wager.stake * 2.0);

        assert_eq!(state.stake, 1.0);
        assert_eq!(state.net_profit(), 1.0);
        assert_eq!(state.total_lost, 7.0);
        assert_eq!(state.total_won, 8.0);
        assert!(!state.in_recovery());
        assert_eq!(state.max_win_streak, 1);
        assert_eq!(state.max_loss_streak, 3);
    }

    #[test]
    fn test_stake_capped_at_balance() {
        let cfg = config(false).with_initial_balance(5.0);
        let mut state = RunState::from_config(&cfg);

        // 5 -> 4 (stake 2) -> 2 (stake 4 capped to 2)
        let wager = state.place_wager();
        state.settle_loss(wager.stake);
        let wager = state.place_wager();
        state.settle_loss(wager.stake);

        assert_eq!(state.balance, 2.0);
        assert_eq!(state.stake, 2.0);
    }

    #[test]
    fn test_table_cap() {
        let cfg = config(false).with_max_stake(Some(3.0));
        let mut state = RunState::from_config(&cfg);

        for _ in 0..4 {
            let wager = state.place_wager();
            state.settle_loss(wager.stake);
        }
        assert_eq!(state.stake, 3.0);
    }

    #[test]
    fn test_color_alternates_only_when_enabled() {
        let mut fixed = RunState::from_config(&config(false));
        let wager = fixed.place_wager();
        fixed.settle_win(wager.stake, wager.stake * 2.0);
        assert_eq!(fixed.color, Color::Black);

        let mut alternating = RunState::from_config(&config(true));
        let wager = alternating.place_wager();
        alternating.settle_win(wager.stake, wager.stake * 2.0);
        assert_eq!(alternating.color, Color::Red);
    }

    #[test]
    fn test_budget_only_stops_outside_recovery() {
        let cfg = config(false).with_profit_target(f64::INFINITY);
        let mut state = RunState::from_config(&cfg);
        state.rounds_played = 11;

        state.stake = 4.0;
        assert_eq!(state.stop_reason(), None);

        state.stake = 1.0;
        assert_eq!(state.stop_reason(), Some(StopReason::BudgetExhausted));
    }

    #[test]
    fn test_stake_capped_back_to_base_ends_recovery() {
        let scenario = ScenarioParameters {
            base_stake: 1.0,
            round_budget: 1,
            alternate_color_on_win: false,
        };
        let cfg = RunConfig::for_scenario(scenario, &StakingSettings::default())
            .unwrap()
            .with_initial_balance(4.0)
            .with_profit_target(f64::INFINITY);
        let mut state = RunState::from_config(&cfg);

        // 4 -> 3 (stake 2), still within budget and recovering
        let wager = state.place_wager();
        state.settle_loss(wager.stake);
        assert!(state.in_recovery());
        assert_eq!(state.stop_reason(), None);

        // 3 -> 1 (stake 4 capped to 1): back at base although the streak continues
        let wager = state.place_wager();
        state.settle_loss(wager.stake);
        assert_eq!(state.balance, 1.0);
        assert_eq!(state.stake, 1.0);
        assert_eq!(state.current_loss_streak, 2);
        assert!(!state.in_recovery());
        assert_eq!(state.stop_reason(), Some(StopReason::BudgetExhausted));
    }
}
