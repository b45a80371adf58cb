//! Goal domain types.

use chrono::NaiveDate;
use fincontrol_shared::types::{Amount, EnvironmentId, GoalId};
use serde::{Deserialize, Serialize};

use super::error::GoalError;
use crate::recurrence::Recurrence;

/// A savings goal owned by one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier.
    pub id: GoalId,
    /// Owning environment.
    pub environment_id: EnvironmentId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Threshold to reach.
    pub target_value: Amount,
    /// Period length for recurring goals. `None` or [`Recurrence::None`]
    /// means a single-deadline goal.
    #[serde(default)]
    pub period_type: Option<Recurrence>,
    /// First date a recurring goal becomes active.
    #[serde(default)]
    pub anchor_date: Option<NaiveDate>,
    /// Deadline of a single-deadline goal.
    #[serde(default)]
    pub deadline_date: Option<NaiveDate>,
    /// Last date the goal was checked for a period change.
    #[serde(default)]
    pub last_evaluated: Option<NaiveDate>,
    /// Completion state of the current period (or overall for deadline goals).
    #[serde(default)]
    pub achieved: bool,
    /// Lifetime count of completed periods.
    #[serde(default)]
    pub achievement_count: u32,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

/// How a goal is evaluated, resolved from its optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalSchedule {
    /// Re-evaluated once per period, starting at `anchor`.
    Recurring {
        /// Period length.
        period: Recurrence,
        /// First active date.
        anchor: NaiveDate,
    },
    /// Evaluated against the balance until `deadline`.
    Single {
        /// Last date the goal can be achieved.
        deadline: NaiveDate,
    },
}

/// Result of evaluating one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalOutcome {
    /// Recurring goal evaluated before its anchor date.
    NotStarted,
    /// Recurring goal already evaluated in the current period.
    SamePeriod,
    /// Target reached during this pass.
    Achieved,
    /// Single-deadline goal achieved in an earlier pass.
    AlreadyAchieved,
    /// Target not reached.
    Missed,
}

impl Goal {
    /// Creates a recurring goal.
    #[must_use]
    pub fn recurring(
        environment_id: EnvironmentId,
        target_value: Amount,
        period: Recurrence,
        anchor_date: NaiveDate,
    ) -> Self {
        Self {
            id: GoalId::new(),
            environment_id,
            name: String::new(),
            target_value,
            period_type: Some(period),
            anchor_date: Some(anchor_date),
            deadline_date: None,
            last_evaluated: None,
            achieved: false,
            achievement_count: 0,
            is_deleted: false,
        }
    }

    /// Creates a single-deadline goal.
    #[must_use]
    pub fn single(
        environment_id: EnvironmentId,
        target_value: Amount,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: GoalId::new(),
            environment_id,
            name: String::new(),
            target_value,
            period_type: None,
            anchor_date: None,
            deadline_date: Some(deadline),
            last_evaluated: None,
            achieved: false,
            achievement_count: 0,
            is_deleted: false,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resolves how this goal is evaluated.
    ///
    /// A recurring period with an anchor wins over a deadline, so a goal is
    /// never evaluated both ways in the same pass.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::MissingSchedule` if neither schedule is usable.
    pub fn schedule(&self) -> Result<GoalSchedule, GoalError> {
        match (self.period_type, self.anchor_date, self.deadline_date) {
            (Some(period), Some(anchor), _) if period.is_recurring() => {
                Ok(GoalSchedule::Recurring { period, anchor })
            }
            (_, _, Some(deadline)) => Ok(GoalSchedule::Single { deadline }),
            _ => Err(GoalError::MissingSchedule(self.id)),
        }
    }

    /// Returns the period type unless it is absent or [`Recurrence::None`].
    ///
    /// Unlike [`Goal::schedule`], an anchor is not required.
    #[must_use]
    pub fn recurring_period(&self) -> Option<Recurrence> {
        self.period_type.filter(|period| period.is_recurring())
    }
}
