//! Service-level error types and their mapping onto [`AppError`].

use fincontrol_shared::AppError;
use fincontrol_shared::types::EnvironmentId;
use thiserror::Error;

use crate::goals::GoalError;
use crate::ledger::LedgerError;
use crate::projection::ProjectionError;
use crate::store::StoreError;
use crate::timeline::TimelineError;

/// Errors surfaced by [`super::EnvironmentService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Environment not found (or soft-deleted).
    #[error("Environment not found: {0}")]
    EnvironmentNotFound(EnvironmentId),

    /// Persistence failure, surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid projection request.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Invalid timeline request.
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EnvironmentNotFound(_) => Self::NotFound(err.to_string()),
            EngineError::Store(_) => Self::Storage(err.to_string()),
            EngineError::Projection(_) | EngineError::Timeline(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::InvalidState(err.to_string())
    }
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        Self::InvalidState(err.to_string())
    }
}
