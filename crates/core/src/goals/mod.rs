//! Period-bound savings goals.
//!
//! This module implements:
//! - Goal records and schedule resolution
//! - Control levels derived from lifetime achievements
//! - The evaluation engine that detects period changes and tests targets

pub mod engine;
pub mod error;
pub mod level;
pub mod types;


pub use engine::{GoalEvaluation, GoalEvaluationEngine, GoalPassReport};
pub use error::GoalError;
pub use level::{CONTROL_LEVEL_TRIGGERS, ControlLevel};
pub use types::{Goal, GoalOutcome, GoalSchedule};
