//! Projection error types.

use thiserror::Error;

/// Projection-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// More periods requested than allowed.
    #[error("Projection covers {requested} periods, at most {max} allowed")]
    TooManyPeriods {
        /// Requested period count.
        requested: u32,
        /// Configured maximum.
        max: u32,
    },

    /// A period end falls outside the supported calendar.
    #[error("Projection runs past the supported date range")]
    DateOutOfRange,
}
