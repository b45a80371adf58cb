//! In-memory store backed by concurrent maps.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;
use fincontrol_shared::types::{EnvironmentId, GoalId, LedgerEntryId};
use serde::{Deserialize, Serialize};

use super::LedgerStore;
use super::error::StoreError;
use crate::environment::Environment;
use crate::goals::Goal;
use crate::ledger::{EntryOrigin, LedgerEntry};

/// Serializable content of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Environments.
    #[serde(default)]
    pub environments: Vec<Environment>,
    /// Ledger entries of every origin.
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
    /// Goals.
    #[serde(default)]
    pub goals: Vec<Goal>,
}

/// Number of persist calls received, per record type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreWrites {
    /// Environment writes.
    pub environments: usize,
    /// Entry writes.
    pub entries: usize,
    /// Goal writes.
    pub goals: usize,
}

impl StoreWrites {
    /// Total writes.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.environments + self.entries + self.goals
    }
}

/// Thread-safe store keeping every record in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    environments: DashMap<EnvironmentId, Environment>,
    entries: DashMap<LedgerEntryId, LedgerEntry>,
    goals: DashMap<GoalId, Goal>,
    environment_writes: AtomicUsize,
    entry_writes: AtomicUsize,
    goal_writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the records of `snapshot`. Write counters start at zero.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        for environment in snapshot.environments {
            store.environments.insert(environment.id, environment);
        }
        for entry in snapshot.entries {
            store.entries.insert(entry.id, entry);
        }
        for goal in snapshot.goals {
            store.goals.insert(goal.id, goal);
        }
        store
    }

    /// Exports every record, including soft-deleted ones, in a stable order.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut environments: Vec<Environment> = self
            .environments
            .iter()
            .map(|r| r.value().clone())
            .collect();
        environments.sort_by_key(|e| e.id);
        let mut entries: Vec<LedgerEntry> =
            self.entries.iter().map(|r| r.value().clone()).collect();
        entries.sort_by_key(|e| (e.effective_date, e.id));
        let mut goals: Vec<Goal> = self.goals.iter().map(|r| r.value().clone()).collect();
        goals.sort_by_key(|g| g.id);

        StoreSnapshot {
            environments,
            entries,
            goals,
        }
    }

    /// Writes received since creation.
    #[must_use]
    pub fn writes(&self) -> StoreWrites {
        StoreWrites {
            environments: self.environment_writes.load(Ordering::Relaxed),
            entries: self.entry_writes.load(Ordering::Relaxed),
            goals: self.goal_writes.load(Ordering::Relaxed),
        }
    }

    /// Makes every subsequent call fail with `StoreError::Backend` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Backend("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl LedgerStore for InMemoryStore {
    fn load_environment(&self, id: EnvironmentId) -> Result<Option<Environment>, StoreError> {
        self.check_available()?;
        Ok(self
            .environments
            .get(&id)
            .map(|r| r.value().clone())
            .filter(|e| !e.is_deleted))
    }

    fn load_entries(
        &self,
        environment_id: EnvironmentId,
        origin: EntryOrigin,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        self.check_available()?;
        let mut entries: Vec<LedgerEntry> = self
            .entries
            .iter()
            .filter(|r| {
                let e = r.value();
                e.environment_id == environment_id && e.origin == origin && e.is_active()
            })
            .map(|r| r.value().clone())
            .collect();
        entries.sort_by_key(|e| (e.effective_date, e.id));
        Ok(entries)
    }

    fn load_goals(&self, environment_id: EnvironmentId) -> Result<Vec<Goal>, StoreError> {
        self.check_available()?;
        let mut goals: Vec<Goal> = self
            .goals
            .iter()
            .filter(|r| {
                let goal = r.value();
                goal.environment_id == environment_id && !goal.is_deleted
            })
            .map(|r| r.value().clone())
            .collect();
        goals.sort_by_key(|g| g.id);
        Ok(goals)
    }

    fn persist_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.insert(entry.id, entry.clone());
        self.entry_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn persist_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        self.check_available()?;
        self.goals.insert(goal.id, goal.clone());
        self.goal_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn persist_environment(&self, environment: &Environment) -> Result<(), StoreError> {
        self.check_available()?;
        self.environments.insert(environment.id, environment.clone());
        self.environment_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
