//! Property-based tests for incremental balance processing.

use chrono::{Days, NaiveDate};
use fincontrol_shared::types::{Amount, EnvironmentId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::entry::{EntryKind, LedgerEntry};
use super::processor::IncrementalBalanceProcessor;
use crate::recurrence::Recurrence;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn entry_strategy() -> impl Strategy<Value = LedgerEntry> {
    (
        any::<bool>(),
        any::<bool>(),
        0i64..1_000_000,
        0u64..400,
        prop::sample::select(Recurrence::ALL.to_vec()),
    )
        .prop_map(|(is_profit, is_planned, cents, offset, recurrence)| {
            let kind = if is_profit {
                EntryKind::Profit
            } else {
                EntryKind::Expense
            };
            let amount = Amount::new(Decimal::new(cents, 2)).unwrap();
            let effective = base_date() + Days::new(offset);
            let env = EnvironmentId::new();
            if is_planned {
                LedgerEntry::planned(env, kind, amount, effective, recurrence)
            } else {
                LedgerEntry::unplanned(env, kind, amount, effective)
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: Idempotence
    /// A second pass on the same day changes neither the balance nor any entry.
    #[test]
    fn prop_second_pass_is_noop(
        entries in prop::collection::vec(entry_strategy(), 0..20),
        start in -100_000i64..100_000,
        today_offset in 0u64..500,
    ) {
        let today = base_date() + Days::new(today_offset);
        let start = Decimal::new(start, 2);

        let first = IncrementalBalanceProcessor::process(start, &entries, today);
        let mut after: Vec<LedgerEntry> = entries.clone();
        for updated in &first.updated {
            if let Some(slot) = after.iter_mut().find(|e| e.id == updated.id) {
                *slot = updated.clone();
            }
        }
        let second = IncrementalBalanceProcessor::process(first.balance, &after, today);

        prop_assert!(second.is_noop());
        prop_assert_eq!(second.balance, first.balance);
    }

    /// Property 2: No double counting
    /// Processing up to an intermediate day and then up to `today` yields the
    /// same total as a single pass up to `today`.
    #[test]
    fn prop_split_passes_match_single_pass(
        entries in prop::collection::vec(entry_strategy(), 0..20),
        mid_offset in 0u64..500,
        extra_days in 0u64..300,
    ) {
        let mid = base_date() + Days::new(mid_offset);
        let today = mid + Days::new(extra_days);

        let single = IncrementalBalanceProcessor::process(Decimal::ZERO, &entries, today);

        let first = IncrementalBalanceProcessor::process(Decimal::ZERO, &entries, mid);
        let mut after: Vec<LedgerEntry> = entries.clone();
        for updated in &first.updated {
            if let Some(slot) = after.iter_mut().find(|e| e.id == updated.id) {
                *slot = updated.clone();
            }
        }
        let second = IncrementalBalanceProcessor::process(first.balance, &after, today);

        prop_assert_eq!(second.balance, single.balance);
    }

    /// Property 3: Bounded drift
    /// Thousands of daily sub-cent increments accumulate exactly.
    #[test]
    fn prop_daily_increments_accumulate_exactly(days in 1_000u64..5_000) {
        let mut entry = LedgerEntry::planned(
            EnvironmentId::new(),
            EntryKind::Profit,
            Amount::new(dec!(0.01)).unwrap(),
            base_date(),
            Recurrence::Daily,
        );
        let mut balance = Decimal::ZERO;
        let mut today = base_date();
        let end = base_date() + Days::new(days - 1);

        // One pass every 7 days, then a final pass on the last day.
        while today < end {
            let outcome =
                IncrementalBalanceProcessor::process(balance, std::slice::from_ref(&entry), today);
            balance = outcome.balance;
            if let Some(updated) = outcome.updated.into_iter().next() {
                entry = updated;
            }
            today = (today + Days::new(7)).min(end);
        }
        let outcome =
            IncrementalBalanceProcessor::process(balance, std::slice::from_ref(&entry), end);

        prop_assert_eq!(outcome.balance, Decimal::from(days) * dec!(0.01));
    }
}
