//! Store error types.

use thiserror::Error;

/// Failures reported by a [`super::LedgerStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend rejected or could not complete the operation.
    #[error("Store backend error: {0}")]
    Backend(String),
}
