//! Timeline error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Timeline reconstruction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    /// Invalid window (start after end).
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow {
        /// Window start.
        start: NaiveDate,
        /// Window end.
        end: NaiveDate,
    },
}
