//! Cross-module tests for the martingale simulation library
//!
//! Tests are organized by topic:
//! - `wheel_distribution` - Statistical checks on wheel draws
//! - `run_termination` - Stopping rules and balance bounds over many seeds
//! - `accumulator_merge` - Merge-order independence of scenario statistics
//! - `end_to_end` - Full sweeps against the expected house-edge behavior

mod accumulator_merge;
