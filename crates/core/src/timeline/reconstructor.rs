//! Reverse walk from the current balance back through recorded entries.
//!
//! Each entry is assumed to have fired exactly once on its effective date,
//! even when it repeats. Expanding past recurrences is not attempted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::TimelineError;
use crate::ledger::LedgerEntry;

/// Balance that existed immediately before the entries of `date` applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePoint {
    /// Entry date.
    pub date: NaiveDate,
    /// Balance before the entry.
    pub balance: Decimal,
}

/// Rebuilds an approximate balance history.
pub struct BalanceTimelineReconstructor;

impl BalanceTimelineReconstructor {
    /// Undoes entries newest-first from `current_balance` and returns the
    /// points dated inside `[window_start, window_end]`, oldest first.
    ///
    /// Entries sharing a date keep their relative input order.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidWindow` if `window_start > window_end`.
    pub fn reconstruct(
        current_balance: Decimal,
        entries: &[LedgerEntry],
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<BalancePoint>, TimelineError> {
        if window_start > window_end {
            return Err(TimelineError::InvalidWindow {
                start: window_start,
                end: window_end,
            });
        }

        let mut ordered: Vec<&LedgerEntry> = entries
            .iter()
            .filter(|e| e.is_active() && e.validate().is_ok())
            .collect();
        ordered.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));

        let mut running = current_balance;
        let mut points: Vec<BalancePoint> = ordered
            .into_iter()
            .map(|entry| {
                running -= entry.signed_amount();
                BalancePoint {
                    date: entry.effective_date,
                    balance: running,
                }
            })
            .filter(|p| p.date >= window_start && p.date <= window_end)
            .collect();

        // Stable ascending sort keeps the reverse-walk order within a date.
        points.sort_by_key(|p| p.date);
        debug!(points = points.len(), %window_start, %window_end, "Reconstructed balance timeline");
        Ok(points)
    }
}
