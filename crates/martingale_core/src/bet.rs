//! Wagers and payout evaluation
//!
//! A wager carries a `WagerType` discriminant next to its `Selection`. The two
//! must agree; `evaluate` rejects a mismatch instead of treating it as a loss.

use serde::{Deserialize, Serialize};

use crate::error::WagerError;
use crate::wheel::{Color, Column, Dozen, Half, Parity, SLOT_COUNT, WheelSlot};

/// Total return multiplier (stake included) for a winning single number
pub const NUMBER_PAYOUT: f64 = 36.0;
/// Total return multiplier for color, odd/even and high/low
pub const EVEN_MONEY_PAYOUT: f64 = 2.0;
/// Total return multiplier for dozen and column
pub const DOZEN_PAYOUT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerType {
    Number,
    Color,
    OddEven,
    HighLow,
    Dozen,
    Column,
}

impl WagerType {
    /// Total return multiplier applied to the stake on a win
    #[must_use]
    pub fn payout_multiplier(self) -> f64 {
        match self {
            WagerType::Number => NUMBER_PAYOUT,
            WagerType::Color | WagerType::OddEven | WagerType::HighLow => EVEN_MONEY_PAYOUT,
            WagerType::Dozen | WagerType::Column => DOZEN_PAYOUT,
        }
    }
}

/// What the wager is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    Number(u8),
    Color(Color),
    OddEven(Parity),
    HighLow(Half),
    Dozen(Dozen),
    Column(Column),
}

impl Selection {
    /// The bet type this selection belongs to
    #[must_use]
    pub fn wager_type(&self) -> WagerType {
        match self {
            Selection::Number(_) => WagerType::Number,
            Selection::Color(_) => WagerType::Color,
            Selection::OddEven(_) => WagerType::OddEven,
            Selection::HighLow(_) => WagerType::HighLow,
            Selection::Dozen(_) => WagerType::Dozen,
            Selection::Column(_) => WagerType::Column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wager {
    pub wager_type: WagerType,
    pub stake: f64,
    pub selection: Selection,
}

impl Wager {
    /// Build a wager whose type is taken from the selection
    #[must_use]
    pub fn new(stake: f64, selection: Selection) -> Self {
        Self {
            wager_type: selection.wager_type(),
            stake,
            selection,
        }
    }

    #[must_use]
    pub fn on_color(stake: f64, color: Color) -> Self {
        Self::new(stake, Selection::Color(color))
    }

    /// Check the type/selection pairing, the number range and the stake
    pub fn validate(&self) -> Result<(), WagerError> {
        if self.selection.wager_type() != self.wager_type {
            return Err(WagerError::SelectionMismatch {
                wager_type: self.wager_type,
                selection: self.selection,
            });
        }
        if let Selection::Number(n) = self.selection
            && n as usize >= SLOT_COUNT
        {
            return Err(WagerError::NumberOutOfRange(n));
        }
        if !(self.stake.is_finite() && self.stake > 0.0) {
            return Err(WagerError::NonPositiveStake(self.stake));
        }
        Ok(())
    }
}

/// Total return for `wager` when the ball lands on `slot`: stake times the
/// type's multiplier on a win, 0 on a loss.
pub fn evaluate(wager: &Wager, slot: &WheelSlot) -> Result<f64, WagerError> {
    wager.validate()?;

    let wins = match wager.selection {
        Selection::Number(n) => n == slot.number,
        Selection::Color(color) => slot.color == Some(color),
        Selection::OddEven(parity) => slot.parity() == Some(parity),
        Selection::HighLow(half) => slot.half() == Some(half),
        Selection::Dozen(dozen) => slot.dozen() == Some(dozen),
        Selection::Column(column) => slot.column() == Some(column),
    };

    if wins {
        Ok(wager.stake * wager.wager_type.payout_multiplier())
    } else {
        Ok(0.0)
    }
}
