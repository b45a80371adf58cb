//! Ledger entry domain types.

use chrono::NaiveDate;
use fincontrol_shared::types::{Amount, EnvironmentId, LedgerEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::recurrence::Recurrence;

/// Sign of a ledger entry's monetary effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money coming in.
    Profit,
    /// Money going out.
    Expense,
}

/// Where an entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrigin {
    /// Scheduled movement, possibly repeating.
    Planned,
    /// One-off movement recorded after the fact.
    Unplanned,
}

/// A financial movement owned by exactly one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// The environment this entry belongs to.
    pub environment_id: EnvironmentId,
    /// Free-form label.
    #[serde(default)]
    pub description: String,
    /// Profit or expense.
    pub kind: EntryKind,
    /// Planned or unplanned.
    pub origin: EntryOrigin,
    /// Unsigned amount of a single occurrence.
    pub amount: Amount,
    /// Date of the first (or only) occurrence.
    pub effective_date: NaiveDate,
    /// Repetition cadence. Always `None` for unplanned entries.
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Last date through which occurrences were folded into the balance.
    #[serde(default)]
    pub last_processed: Option<NaiveDate>,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

impl LedgerEntry {
    /// Creates a planned entry.
    #[must_use]
    pub fn planned(
        environment_id: EnvironmentId,
        kind: EntryKind,
        amount: Amount,
        effective_date: NaiveDate,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            environment_id,
            description: String::new(),
            kind,
            origin: EntryOrigin::Planned,
            amount,
            effective_date,
            recurrence,
            last_processed: None,
            is_deleted: false,
        }
    }

    /// Creates a single-fire unplanned entry.
    #[must_use]
    pub fn unplanned(
        environment_id: EnvironmentId,
        kind: EntryKind,
        amount: Amount,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            origin: EntryOrigin::Unplanned,
            ..Self::planned(
                environment_id,
                kind,
                amount,
                effective_date,
                Recurrence::None,
            )
        }
    }

    /// Returns the signed amount of one occurrence (positive for profit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Profit => self.amount.value(),
            EntryKind::Expense => -self.amount.value(),
        }
    }

    /// Returns the signed effect of `occurrences` repetitions, saturating at
    /// the bounds of `Decimal`.
    #[must_use]
    pub fn signed_total(&self, occurrences: u32) -> Decimal {
        self.signed_amount()
            .saturating_mul(Decimal::from(occurrences))
    }

    /// Returns true unless the entry was soft-deleted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Checks the data-integrity rules of an entry.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecurringUnplannedEntry` if an unplanned entry
    /// carries a recurrence.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.origin == EntryOrigin::Unplanned && self.recurrence.is_recurring() {
            return Err(LedgerError::RecurringUnplannedEntry {
                id: self.id,
                recurrence: self.recurrence,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_signed_amount_by_kind() {
        let env = EnvironmentId::new();
        let profit = LedgerEntry::unplanned(env, EntryKind::Profit, amount(dec!(40.50)), day(1));
        let expense = LedgerEntry::unplanned(env, EntryKind::Expense, amount(dec!(12)), day(1));

        assert_eq!(profit.signed_amount(), dec!(40.50));
        assert_eq!(expense.signed_amount(), dec!(-12));
        assert_eq!(expense.signed_total(3), dec!(-36));
    }

    #[test]
    fn test_signed_total_saturates() {
        let env = EnvironmentId::new();
        let profit = LedgerEntry::unplanned(env, EntryKind::Profit, amount(Decimal::MAX), day(1));
        let expense = LedgerEntry::unplanned(env, EntryKind::Expense, amount(Decimal::MAX), day(1));

        assert_eq!(profit.signed_total(2), Decimal::MAX);
        assert_eq!(expense.signed_total(2), Decimal::MIN);
        assert_eq!(expense.signed_total(0), Decimal::ZERO);
    }

    #[test]
    fn test_unplanned_never_recurs() {
        let entry = LedgerEntry::unplanned(
            EnvironmentId::new(),
            EntryKind::Profit,
            amount(dec!(1)),
            day(2),
        );
        assert_eq!(entry.origin, EntryOrigin::Unplanned);
        assert_eq!(entry.recurrence, Recurrence::None);
        assert!(entry.validate().is_ok());
        assert!(entry.is_active());
        assert_eq!(entry.last_processed, None);
    }

    #[test]
    fn test_validate_rejects_recurring_unplanned() {
        let mut entry = LedgerEntry::unplanned(
            EnvironmentId::new(),
            EntryKind::Expense,
            amount(dec!(5)),
            day(3),
        );
        entry.recurrence = Recurrence::Weekly;

        assert!(matches!(
            entry.validate(),
            Err(LedgerError::RecurringUnplannedEntry {
                recurrence: Recurrence::Weekly,
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_defaults_markers() {
        let json = r#"{
            "id": "0191d3a4-7c1e-7000-8000-000000000001",
            "environment_id": "0191d3a4-7c1e-7000-8000-000000000002",
            "kind": "expense",
            "origin": "planned",
            "amount": "19.90",
            "effective_date": "2024-05-01",
            "recurrence": "monthly"
        }"#;
        let entry: LedgerEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.amount.value(), dec!(19.90));
        assert_eq!(entry.recurrence, Recurrence::Monthly);
        assert_eq!(entry.last_processed, None);
        assert!(!entry.is_deleted);
        assert!(entry.description.is_empty());
    }
}
