//! Persistence collaborators consumed by the engine.
//!
//! The engine never talks to a database directly. Callers supply a
//! [`LedgerStore`]; [`InMemoryStore`] backs tests and the snapshot tool.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::{InMemoryStore, StoreSnapshot, StoreWrites};

use fincontrol_shared::types::EnvironmentId;

use crate::environment::Environment;
use crate::goals::Goal;
use crate::ledger::{EntryOrigin, LedgerEntry};

/// Narrow repository interface over one environment's records.
///
/// Loads exclude soft-deleted rows. Persist calls overwrite the stored
/// record with the same ID.
pub trait LedgerStore {
    /// Loads an environment, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn load_environment(&self, id: EnvironmentId) -> Result<Option<Environment>, StoreError>;

    /// Loads the entries of one origin.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn load_entries(
        &self,
        environment_id: EnvironmentId,
        origin: EntryOrigin,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Loads the goals of an environment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn load_goals(&self, environment_id: EnvironmentId) -> Result<Vec<Goal>, StoreError>;

    /// Overwrites an entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn persist_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError>;

    /// Overwrites a goal.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn persist_goal(&self, goal: &Goal) -> Result<(), StoreError>;

    /// Overwrites an environment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn persist_environment(&self, environment: &Environment) -> Result<(), StoreError>;
}
