//! Single-zero roulette wheel model
//!
//! The wheel is 37 immutable slots (0..=36). Slot 0 is the house slot: it has
//! no color and belongs to no parity, half, dozen, or column.

use std::sync::LazyLock;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of slots on a single-zero wheel
pub const SLOT_COUNT: usize = 37;

/// Red numbers on a standard European wheel
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Black numbers on a standard European wheel
pub const BLACK_NUMBERS: [u8; 18] = [
    2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35,
];

/// Shared read-only wheel, built on first use
pub static STANDARD_WHEEL: LazyLock<Wheel> = LazyLock::new(Wheel::standard);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// The other color
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    /// 1..=18
    Low,
    /// 19..=36
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dozen {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    First,
    Second,
    Third,
}

/// Color of a wheel number, `None` for 0 and for numbers off the wheel
#[must_use]
pub fn classify(number: u8) -> Option<Color> {
    if RED_NUMBERS.contains(&number) {
        Some(Color::Red)
    } else if BLACK_NUMBERS.contains(&number) {
        Some(Color::Black)
    } else {
        None
    }
}

/// One position on the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WheelSlot {
    pub number: u8,
    pub color: Option<Color>,
}

impl WheelSlot {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.number == 0
    }

    #[must_use]
    pub fn parity(&self) -> Option<Parity> {
        match self.number {
            0 => None,
            n if n % 2 == 0 => Some(Parity::Even),
            _ => Some(Parity::Odd),
        }
    }

    #[must_use]
    pub fn half(&self) -> Option<Half> {
        match self.number {
            0 => None,
            1..=18 => Some(Half::Low),
            _ => Some(Half::High),
        }
    }

    #[must_use]
    pub fn dozen(&self) -> Option<Dozen> {
        match self.number {
            0 => None,
            1..=12 => Some(Dozen::First),
            13..=24 => Some(Dozen::Second),
            _ => Some(Dozen::Third),
        }
    }

    #[must_use]
    pub fn column(&self) -> Option<Column> {
        if self.number == 0 {
            return None;
        }
        match (self.number - 1) % 3 {
            0 => Some(Column::First),
            1 => Some(Column::Second),
            _ => Some(Column::Third),
        }
    }
}

/// The ordered sequence of all 37 slots
#[derive(Debug, Clone)]
pub struct Wheel {
    slots: [WheelSlot; SLOT_COUNT],
}

impl Wheel {
    /// Build the standard single-zero wheel
    #[must_use]
    pub fn standard() -> Self {
        let slots = std::array::from_fn(|i| {
            let number = i as u8;
            WheelSlot {
                number,
                color: classify(number),
            }
        });
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[WheelSlot] {
        &self.slots
    }

    /// Slot for a number, `None` if the number is not on the wheel
    #[must_use]
    pub fn slot(&self, number: u8) -> Option<&WheelSlot> {
        self.slots.get(number as usize)
    }

    /// Spin the wheel using the caller's random source
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> WheelSlot {
        self.slots[rng.random_range(0..SLOT_COUNT)]
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Self::standard()
    }
}
