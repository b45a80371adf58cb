//! Environment service.
//!
//! Loads an environment's working set from the store, runs the engine
//! components, and persists only the records that changed. Callers must
//! serialize passes over the same environment; distinct environments are
//! independent.

use chrono::NaiveDate;
use fincontrol_shared::config::EngineConfig;
use fincontrol_shared::types::{EnvironmentId, GoalId, LedgerEntryId};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::EngineError;
use crate::environment::Environment;
use crate::goals::{ControlLevel, GoalEvaluationEngine, GoalPassReport};
use crate::ledger::{EntryOrigin, IncrementalBalanceProcessor, LedgerEntry};
use crate::projection::{BalanceProjectionSimulator, PeriodUnit, ProjectedBalance, ProjectionParams};
use crate::store::LedgerStore;
use crate::summary::{
    FinancialSummary, GoalsSummary, PeriodAchievements, SummaryCalculator,
    UnexpectedExpenseAnalysis,
};
use crate::timeline::{BalancePoint, BalanceTimelineReconstructor};

/// Result of folding pending entries into an environment's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRefresh {
    /// Balance before the pass.
    pub previous_balance: Decimal,
    /// Balance after the pass.
    pub balance: Decimal,
    /// Entries whose marker advanced.
    pub entries_processed: usize,
    /// Invalid entries that were skipped.
    pub rejected_entries: Vec<LedgerEntryId>,
}

/// Result of a daily pass (balance refresh, then goal evaluation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    /// Environment processed.
    pub environment_id: EnvironmentId,
    /// Reference date of the pass.
    pub today: NaiveDate,
    /// Balance refresh outcome.
    pub refresh: BalanceRefresh,
    /// Goals evaluated (valid, not deleted).
    pub goals_evaluated: usize,
    /// Goals achieved during the pass.
    pub goals_achieved: u32,
    /// Goals skipped for lack of a schedule.
    pub rejected_goals: Vec<GoalId>,
    /// Lifetime achievements after the pass.
    pub total_goals_achieved: u32,
    /// Tier after the pass.
    pub control_level: ControlLevel,
}

/// Service running the engine against one store.
pub struct EnvironmentService<'a, S: LedgerStore> {
    store: &'a S,
    config: EngineConfig,
}

impl<'a, S: LedgerStore> EnvironmentService<'a, S> {
    /// Creates a new service.
    #[must_use]
    pub const fn new(store: &'a S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    fn environment(&self, id: EnvironmentId) -> Result<Environment, EngineError> {
        self.store
            .load_environment(id)?
            .ok_or(EngineError::EnvironmentNotFound(id))
    }

    fn all_entries(&self, id: EnvironmentId) -> Result<Vec<LedgerEntry>, EngineError> {
        let mut entries = self.store.load_entries(id, EntryOrigin::Planned)?;
        entries.extend(self.store.load_entries(id, EntryOrigin::Unplanned)?);
        Ok(entries)
    }

    /// Folds every pending occurrence up to `today` into the balance.
    ///
    /// Advanced entries are persisted, then the environment if its balance
    /// moved. A pass with nothing pending writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    pub fn refresh_balance(
        &self,
        id: EnvironmentId,
        today: NaiveDate,
    ) -> Result<BalanceRefresh, EngineError> {
        let mut environment = self.environment(id)?;
        let entries = self.all_entries(id)?;
        let previous_balance = environment.total_balance;

        let outcome = IncrementalBalanceProcessor::process(previous_balance, &entries, today);
        for entry in &outcome.updated {
            self.store.persist_entry(entry)?;
        }
        if outcome.balance != previous_balance {
            environment.total_balance = outcome.balance;
            self.store.persist_environment(&environment)?;
        }

        Ok(BalanceRefresh {
            previous_balance,
            balance: outcome.balance,
            entries_processed: outcome.updated.len(),
            rejected_entries: outcome.rejected,
        })
    }

    /// Evaluates every goal of the environment as of `today`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    pub fn evaluate_goals(
        &self,
        id: EnvironmentId,
        today: NaiveDate,
    ) -> Result<GoalPassReport, EngineError> {
        let mut environment = self.environment(id)?;
        let goals = self.store.load_goals(id)?;
        let entries = self.store.load_entries(id, EntryOrigin::Planned)?;

        let report = GoalEvaluationEngine::evaluate_all(&goals, &mut environment, &entries, today);
        for goal in &report.updated {
            self.store.persist_goal(goal)?;
        }
        if report.achieved > 0 {
            self.store.persist_environment(&environment)?;
        }
        Ok(report)
    }

    /// Refreshes the balance, then evaluates goals against it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    #[instrument(skip_all, fields(environment_id = %id, %today))]
    pub fn run_daily(
        &self,
        id: EnvironmentId,
        today: NaiveDate,
    ) -> Result<DailyReport, EngineError> {
        let refresh = self.refresh_balance(id, today)?;
        let goals = self.evaluate_goals(id, today)?;
        let environment = self.environment(id)?;

        info!(
            balance = %refresh.balance,
            entries_processed = refresh.entries_processed,
            goals_achieved = goals.achieved,
            "Daily pass complete"
        );
        Ok(DailyReport {
            environment_id: id,
            today,
            refresh,
            goals_evaluated: goals.evaluations.len(),
            goals_achieved: goals.achieved,
            rejected_goals: goals.rejected,
            total_goals_achieved: environment.total_goals_achieved,
            control_level: environment.control_level,
        })
    }

    /// Reconstructs the balance history inside `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Timeline` for an inverted window, or a lookup failure.
    pub fn balance_over_time(
        &self,
        id: EnvironmentId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BalancePoint>, EngineError> {
        let environment = self.environment(id)?;
        let entries = self.all_entries(id)?;
        Ok(BalanceTimelineReconstructor::reconstruct(
            environment.total_balance,
            &entries,
            start,
            end,
        )?)
    }

    /// Projects the balance `period_count` periods past `today`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Projection` if the count exceeds the configured
    /// maximum or the horizon leaves the calendar, or a lookup failure.
    pub fn project_balance(
        &self,
        id: EnvironmentId,
        period_count: u32,
        unit: PeriodUnit,
        today: NaiveDate,
    ) -> Result<Vec<ProjectedBalance>, EngineError> {
        let params = ProjectionParams {
            start_date: today,
            period_count,
            unit,
        };
        params.validate(self.config.max_projection_periods)?;

        let environment = self.environment(id)?;
        let entries = self.store.load_entries(id, EntryOrigin::Planned)?;
        Ok(BalanceProjectionSimulator::project(
            environment.total_balance,
            &entries,
            &params,
        )?)
    }

    /// Builds the financial summary.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    pub fn financial_summary(
        &self,
        id: EnvironmentId,
        today: NaiveDate,
    ) -> Result<FinancialSummary, EngineError> {
        let environment = self.environment(id)?;
        let entries = self.all_entries(id)?;
        Ok(SummaryCalculator::financial_summary(
            &environment,
            &entries,
            today,
        ))
    }

    /// Counts completed and pending deadline goals.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    pub fn goals_summary(
        &self,
        id: EnvironmentId,
        today: NaiveDate,
    ) -> Result<GoalsSummary, EngineError> {
        self.environment(id)?;
        let goals = self.store.load_goals(id)?;
        Ok(SummaryCalculator::goals_summary(&goals, today))
    }

    /// Analyzes recent unplanned expenses.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    pub fn unexpected_expenses(
        &self,
        id: EnvironmentId,
        today: NaiveDate,
    ) -> Result<UnexpectedExpenseAnalysis, EngineError> {
        self.environment(id)?;
        let entries = self.all_entries(id)?;
        Ok(SummaryCalculator::unexpected_expenses(
            &entries,
            today,
            &self.config,
        ))
    }

    /// Sums achievements per recurring goal period.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    pub fn achievement_distribution(
        &self,
        id: EnvironmentId,
    ) -> Result<Vec<PeriodAchievements>, EngineError> {
        self.environment(id)?;
        let goals = self.store.load_goals(id)?;
        Ok(SummaryCalculator::achievement_distribution(&goals))
    }

    /// Replaces the balance manually. Returns the previous balance.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EnvironmentNotFound` or a store failure.
    pub fn override_balance(
        &self,
        id: EnvironmentId,
        value: Decimal,
    ) -> Result<Decimal, EngineError> {
        let mut environment = self.environment(id)?;
        let previous = environment.override_balance(value);
        if previous != value {
            self.store.persist_environment(&environment)?;
        }
        info!(environment_id = %id, %previous, balance = %value, "Balance overridden");
        Ok(previous)
    }
}

impl<S: LedgerStore + Sync> EnvironmentService<'_, S> {
    /// Runs the daily pass for many environments in parallel.
    ///
    /// Each environment succeeds or fails on its own; results keep input order.
    pub fn run_daily_batch(
        &self,
        ids: &[EnvironmentId],
        today: NaiveDate,
    ) -> Vec<(EnvironmentId, Result<DailyReport, EngineError>)> {
        let results: Vec<_> = ids
            .par_iter()
            .map(|&id| (id, self.run_daily(id, today)))
            .collect();

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        if failed > 0 {
            warn!(
                failed,
                total = ids.len(),
                "Some environments failed the daily pass"
            );
        }
        results
    }
}
