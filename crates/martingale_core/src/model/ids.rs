//! Scenario identifiers
//!
//! A `ScenarioId` packs a `ScenarioParameters` tuple into one `u64` so that
//! workers agree on the aggregation key without a shared lookup table.
//!
//! Bit layout (least significant first):
//! - bit 0: alternate-color-on-win flag
//! - bits 1..=30: round budget (30 bits, up to ~1.07 billion)
//! - bits 31..=63: base stake scaled by 1000 (33 bits, up to ~8.59 million)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

use super::params::ScenarioParameters;

/// Fixed decimal scale applied to the base stake (3 decimal places)
pub const BASE_STAKE_SCALE: f64 = 1000.0;

const FLAG_BITS: u32 = 1;
const ROUND_BUDGET_BITS: u32 = 30;
const STAKE_BITS: u32 = u64::BITS - ROUND_BUDGET_BITS - FLAG_BITS;

const ROUND_BUDGET_SHIFT: u32 = FLAG_BITS;
const STAKE_SHIFT: u32 = FLAG_BITS + ROUND_BUDGET_BITS;

const ROUND_BUDGET_MASK: u64 = (1 << ROUND_BUDGET_BITS) - 1;
const STAKE_MASK: u64 = (1 << STAKE_BITS) - 1;

/// Largest encodable round budget
pub const MAX_ROUND_BUDGET: u32 = ROUND_BUDGET_MASK as u32;
/// Largest encodable scaled base stake
pub const MAX_SCALED_STAKE: u64 = STAKE_MASK;

/// Aggregation key for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub u64);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ScenarioId {
    /// Pack scenario parameters into an id.
    ///
    /// Fails when the base stake has more than 3 decimal places or does not
    /// fit its bit field, or when the round budget is 0 or too wide.
    pub fn encode(params: &ScenarioParameters) -> Result<Self, CodecError> {
        let scaled = scale_stake(params.base_stake)?;

        if params.round_budget == 0 || params.round_budget > MAX_ROUND_BUDGET {
            return Err(CodecError::RoundBudgetOutOfRange {
                round_budget: params.round_budget,
                max: MAX_ROUND_BUDGET,
            });
        }

        let flag = u64::from(params.alternate_color_on_win);
        let rounds = u64::from(params.round_budget);

        Ok(Self(
            (scaled << STAKE_SHIFT) | (rounds << ROUND_BUDGET_SHIFT) | flag,
        ))
    }

    /// Unpack the parameters this id was encoded from
    #[must_use]
    pub fn decode(self) -> ScenarioParameters {
        let alternate_color_on_win = self.0 & 1 == 1;
        let round_budget = ((self.0 >> ROUND_BUDGET_SHIFT) & ROUND_BUDGET_MASK) as u32;
        let scaled = (self.0 >> STAKE_SHIFT) & STAKE_MASK;

        ScenarioParameters {
            base_stake: scaled as f64 / BASE_STAKE_SCALE,
            round_budget,
            alternate_color_on_win,
        }
    }
}

fn scale_stake(base_stake: f64) -> Result<u64, CodecError> {
    if !base_stake.is_finite() || base_stake < 0.0 {
        return Err(CodecError::StakeNotRepresentable(base_stake));
    }

    let scaled = (base_stake * BASE_STAKE_SCALE).round();
    if scaled > MAX_SCALED_STAKE as f64 {
        return Err(CodecError::StakeOutOfRange {
            base_stake,
            max: MAX_SCALED_STAKE as f64 / BASE_STAKE_SCALE,
        });
    }

    // Reject rather than truncate anything finer than the scale
    if scaled / BASE_STAKE_SCALE != base_stake {
        return Err(CodecError::StakeNotRepresentable(base_stake));
    }

    Ok(scaled as u64)
}
