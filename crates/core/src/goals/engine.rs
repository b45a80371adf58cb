//! Goal evaluation.
//!
//! Recurring goals are checked once per period: the `last_evaluated` marker
//! tells whether `today` opens a new period. Single-deadline goals are
//! checked against the running balance until achieved, after which they
//! never change again.

use chrono::NaiveDate;
use fincontrol_shared::types::GoalId;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::error::GoalError;
use super::types::{Goal, GoalOutcome, GoalSchedule};
use crate::environment::Environment;
use crate::ledger::LedgerEntry;
use crate::recurrence::{Recurrence, RecurrenceCalendar};

/// Outcome of evaluating one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalEvaluation {
    /// Evaluated goal.
    pub goal_id: GoalId,
    /// What happened.
    pub outcome: GoalOutcome,
}

/// Result of evaluating every goal of an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPassReport {
    /// One evaluation per valid goal, in input order.
    pub evaluations: Vec<GoalEvaluation>,
    /// Goals whose state changed; these must be persisted.
    pub updated: Vec<Goal>,
    /// Goals skipped because they have no usable schedule.
    pub rejected: Vec<GoalId>,
    /// Number of goals achieved during the pass.
    pub achieved: u32,
}

/// Per-goal state machine driven by period boundaries.
pub struct GoalEvaluationEngine;

impl GoalEvaluationEngine {
    /// Signed sum of the occurrences, within the period containing `today`,
    /// of every active entry repeating on `period`.
    #[must_use]
    pub fn recurrence_total(
        period: Recurrence,
        entries: &[LedgerEntry],
        today: NaiveDate,
    ) -> Decimal {
        let Some(period_start) = RecurrenceCalendar::period_start(period, today) else {
            return Decimal::ZERO;
        };

        entries
            .iter()
            .filter(|e| {
                e.is_active()
                    && e.recurrence == period
                    && e.effective_date <= today
                    && e.validate().is_ok()
            })
            .map(|e| {
                let occurrences =
                    RecurrenceCalendar::occurrences(period, e.effective_date, period_start, today);
                e.signed_total(occurrences)
            })
            .sum()
    }

    /// Evaluates one goal, mutating it and the environment counters in place.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::MissingSchedule` if the goal has no usable schedule.
    /// Nothing is mutated in that case.
    pub fn evaluate(
        goal: &mut Goal,
        environment: &mut Environment,
        entries: &[LedgerEntry],
        today: NaiveDate,
    ) -> Result<GoalOutcome, GoalError> {
        let outcome = match goal.schedule()? {
            GoalSchedule::Single { deadline } => {
                if goal.achieved {
                    GoalOutcome::AlreadyAchieved
                } else if today <= deadline
                    && environment.total_balance >= goal.target_value.value()
                {
                    GoalOutcome::Achieved
                } else {
                    GoalOutcome::Missed
                }
            }
            GoalSchedule::Recurring { period, anchor } => {
                if today < anchor {
                    return Ok(GoalOutcome::NotStarted);
                }
                let is_new_period = goal.last_evaluated.is_none_or(|last| {
                    !RecurrenceCalendar::is_same_period(period, last, today)
                });
                goal.last_evaluated = Some(today);

                if is_new_period {
                    goal.achieved = false;
                    let total = Self::recurrence_total(period, entries, today);
                    debug!(goal_id = %goal.id, %period, %total, "New goal period");
                    if total >= goal.target_value.value() {
                        GoalOutcome::Achieved
                    } else {
                        GoalOutcome::Missed
                    }
                } else {
                    GoalOutcome::SamePeriod
                }
            }
        };

        if outcome == GoalOutcome::Achieved {
            goal.achieved = true;
            goal.achievement_count = goal.achievement_count.saturating_add(1);
            environment.record_achievement();
            info!(
                goal_id = %goal.id,
                total_goals_achieved = environment.total_goals_achieved,
                control_level = ?environment.control_level,
                "Goal achieved"
            );
        }
        Ok(outcome)
    }

    /// Evaluates every active goal against the environment.
    ///
    /// Goals without a usable schedule are logged and skipped; the rest of
    /// the batch is still evaluated.
    #[must_use]
    pub fn evaluate_all(
        goals: &[Goal],
        environment: &mut Environment,
        entries: &[LedgerEntry],
        today: NaiveDate,
    ) -> GoalPassReport {
        let mut report = GoalPassReport::default();

        for goal in goals.iter().filter(|g| !g.is_deleted) {
            let mut candidate = goal.clone();
            match Self::evaluate(&mut candidate, environment, entries, today) {
                Ok(outcome) => {
                    if outcome == GoalOutcome::Achieved {
                        report.achieved += 1;
                    }
                    report.evaluations.push(GoalEvaluation {
                        goal_id: goal.id,
                        outcome,
                    });
                    if candidate != *goal {
                        report.updated.push(candidate);
                    }
                }
                Err(err) => {
                    warn!(goal_id = %goal.id, error = %err, "Skipping invalid goal");
                    report.rejected.push(goal.id);
                }
            }
        }
        report
    }
}
