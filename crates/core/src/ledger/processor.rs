//! Incremental balance processing.
//!
//! Each entry carries a `last_processed` marker. A pass counts the
//! occurrences that fall after the marker and up to `today`, folds them into
//! the balance, and advances the marker to `today`. Dates already folded in
//! are never counted again, so a second pass on the same day is a no-op.

use chrono::{Days, NaiveDate};
use fincontrol_shared::types::{LedgerEntryId, MONEY_SCALE};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::entry::LedgerEntry;
use crate::recurrence::RecurrenceCalendar;

/// Result of one processing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Balance after the pass.
    pub balance: Decimal,
    /// Net change applied during the pass.
    pub delta: Decimal,
    /// Entries whose marker advanced; these must be persisted.
    pub updated: Vec<LedgerEntry>,
    /// Pending entries skipped because they failed validation.
    pub rejected: Vec<LedgerEntryId>,
}

impl ProcessOutcome {
    /// Returns true if the pass changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty()
    }
}

/// Folds pending ledger occurrences into a running balance.
pub struct IncrementalBalanceProcessor;

impl IncrementalBalanceProcessor {
    /// Returns true if `entry` has occurrences that may not be folded in yet.
    #[must_use]
    pub fn is_pending(entry: &LedgerEntry, today: NaiveDate) -> bool {
        entry.is_active()
            && entry.effective_date <= today
            && entry.last_processed.is_none_or(|last| last < today)
    }

    /// First date not yet folded into the balance.
    ///
    /// `None` when the marker sits on the last representable date.
    #[must_use]
    pub fn window_start(entry: &LedgerEntry) -> Option<NaiveDate> {
        match entry.last_processed {
            Some(last) => last.checked_add_days(Days::new(1)),
            None => Some(entry.effective_date),
        }
    }

    /// Signed change contributed by `entry` between its marker and `today`.
    #[must_use]
    pub fn entry_delta(entry: &LedgerEntry, today: NaiveDate) -> Decimal {
        let Some(from) = Self::window_start(entry) else {
            return Decimal::ZERO;
        };
        let occurrences =
            RecurrenceCalendar::occurrences(entry.recurrence, entry.effective_date, from, today);
        entry.signed_total(occurrences)
    }

    /// Runs one pass over `entries`.
    ///
    /// Deleted entries, entries effective after `today` and entries already
    /// processed through `today` are left untouched. Invalid pending entries
    /// are logged, skipped and reported in [`ProcessOutcome::rejected`].
    #[must_use]
    pub fn process(balance: Decimal, entries: &[LedgerEntry], today: NaiveDate) -> ProcessOutcome {
        let mut delta = Decimal::ZERO;
        let mut updated = Vec::new();
        let mut rejected = Vec::new();

        for entry in entries.iter().filter(|e| Self::is_pending(e, today)) {
            if let Err(err) = entry.validate() {
                warn!(entry_id = %entry.id, error = %err, "Skipping invalid ledger entry");
                rejected.push(entry.id);
                continue;
            }

            let entry_delta = Self::entry_delta(entry, today);
            debug!(
                entry_id = %entry.id,
                recurrence = %entry.recurrence,
                delta = %entry_delta,
                "Folded ledger entry"
            );
            delta += entry_delta;

            let mut advanced = entry.clone();
            advanced.last_processed = Some(today);
            updated.push(advanced);
        }

        let balance = balance + delta;
        if balance.normalize().scale() > MONEY_SCALE {
            warn!(%balance, "Running balance carries sub-cent precision");
        }
        if !updated.is_empty() {
            info!(
                processed = updated.len(),
                rejected = rejected.len(),
                %delta,
                %today,
                "Balance pass complete"
            );
        }

        ProcessOutcome {
            balance,
            delta,
            updated,
            rejected,
        }
    }
}
