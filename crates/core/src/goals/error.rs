//! Goal error types.

use fincontrol_shared::types::GoalId;
use thiserror::Error;

/// Data-integrity faults found on goals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    /// The goal has neither a recurring period with an anchor nor a deadline.
    #[error("Goal {0} has neither a recurring period nor a deadline")]
    MissingSchedule(GoalId),
}
