//! Read-model summaries of an environment.
//!
//! This module provides:
//! - Financial summary (totals, margin, control level)
//! - Deadline goal completion counts
//! - Unexpected expense analysis with alert levels
//! - Achievement distribution per goal period

pub mod calculator;
pub mod types;

pub use calculator::SummaryCalculator;
pub use types::*;
