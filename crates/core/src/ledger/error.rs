//! Ledger error types.

use fincontrol_shared::types::LedgerEntryId;
use thiserror::Error;

use crate::recurrence::Recurrence;

/// Data-integrity faults found on ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Unplanned entries fire once and cannot repeat.
    #[error("Unplanned entry {id} carries recurrence {recurrence}")]
    RecurringUnplannedEntry {
        /// Offending entry.
        id: LedgerEntryId,
        /// Recurrence found on the entry.
        recurrence: Recurrence,
    },
}
