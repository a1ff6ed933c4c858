use std::fmt;

use crate::bet::{Selection, WagerType};
use crate::model::ScenarioId;

/// A wager whose selection does not belong to its declared bet type.
///
/// This is a programming error, never a data condition: the run that hits it
/// is aborted and discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum WagerError {
    SelectionMismatch {
        wager_type: WagerType,
        selection: Selection,
    },
    /// Single-number selection outside 0..=36
    NumberOutOfRange(u8),
    NonPositiveStake(f64),
}

impl fmt::Display for WagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerError::SelectionMismatch {
                wager_type,
                selection,
            } => write!(
                f,
                "selection {selection:?} is not valid for a {wager_type:?} wager"
            ),
            WagerError::NumberOutOfRange(n) => write!(f, "number {n} is not on the wheel"),
            WagerError::NonPositiveStake(stake) => {
                write!(f, "stake must be positive and finite, got {stake}")
            }
        }
    }
}

impl std::error::Error for WagerError {}

/// Scenario parameters that cannot be packed into a `ScenarioId`
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Base stake is negative, non-finite, or has more than 3 decimal places
    StakeNotRepresentable(f64),
    /// Scaled base stake does not fit its bit field
    StakeOutOfRange { base_stake: f64, max: f64 },
    /// Round budget is zero or does not fit its bit field
    RoundBudgetOutOfRange { round_budget: u32, max: u32 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::StakeNotRepresentable(stake) => write!(
                f,
                "base stake {stake} cannot be represented with 3 decimal places"
            ),
            CodecError::StakeOutOfRange { base_stake, max } => {
                write!(f, "base stake {base_stake} exceeds the encodable maximum {max}")
            }
            CodecError::RoundBudgetOutOfRange { round_budget, max } => {
                write!(f, "round budget {round_budget} must be within 1..={max}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Invalid run or sweep configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    NonPositiveStake(f64),
    NonPositiveBalance(f64),
    ZeroRoundBudget,
    ZeroRepetitions,
    ZeroSampleCapacity,
    EmptyGrid(&'static str),
    Codec(CodecError),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::NonPositiveStake(stake) => {
                write!(f, "base stake must be positive and finite, got {stake}")
            }
            ParameterError::NonPositiveBalance(balance) => {
                write!(f, "initial balance must be positive and finite, got {balance}")
            }
            ParameterError::ZeroRoundBudget => write!(f, "round budget must be at least 1"),
            ParameterError::ZeroRepetitions => write!(f, "repetitions must be at least 1"),
            ParameterError::ZeroSampleCapacity => {
                write!(f, "sample capacity must be at least 1")
            }
            ParameterError::EmptyGrid(axis) => write!(f, "parameter grid has no {axis}"),
            ParameterError::Codec(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ParameterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParameterError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for ParameterError {
    fn from(e: CodecError) -> Self {
        ParameterError::Codec(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Wager(WagerError),
    Parameter(ParameterError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Wager(e) => write!(f, "{e}"),
            SimulationError::Parameter(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Wager(e) => Some(e),
            SimulationError::Parameter(e) => Some(e),
        }
    }
}

impl From<WagerError> for SimulationError {
    fn from(err: WagerError) -> Self {
        SimulationError::Wager(err)
    }
}

impl From<ParameterError> for SimulationError {
    fn from(err: ParameterError) -> Self {
        SimulationError::Parameter(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Variance and confidence interval need at least two runs
    InsufficientSamples { scenario_id: ScenarioId, count: u64 },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InsufficientSamples { scenario_id, count } => write!(
                f,
                "scenario {scenario_id} has {count} result(s), at least 2 are required"
            ),
        }
    }
}

impl std::error::Error for AnalysisError {}

pub type Result<T> = std::result::Result<T, SimulationError>;
