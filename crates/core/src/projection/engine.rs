//! Projection engine: simulates planned entries forward in time.

use chrono::{Days, NaiveDate};
use fincontrol_shared::types::round_money;
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use super::error::ProjectionError;
use super::types::{PeriodLabel, ProjectedBalance, ProjectionParams};
use crate::ledger::{EntryOrigin, LedgerEntry};
use crate::recurrence::RecurrenceCalendar;

/// Read-only forward simulation of the running balance.
pub struct BalanceProjectionSimulator;

impl BalanceProjectionSimulator {
    /// Net change of `entries` over the half-open window `(from, to]`.
    #[must_use]
    pub fn period_change(entries: &[LedgerEntry], from: NaiveDate, to: NaiveDate) -> Decimal {
        let Some(first_day) = from.checked_add_days(Days::new(1)) else {
            return Decimal::ZERO;
        };

        entries
            .iter()
            .filter(|e| Self::is_projected(e) && e.effective_date <= to)
            .map(|e| {
                let occurrences =
                    RecurrenceCalendar::occurrences(e.recurrence, e.effective_date, first_day, to);
                e.signed_total(occurrences)
            })
            .sum()
    }

    /// Projects `current_balance` over `params.period_count` periods.
    ///
    /// The first point is the unchanged snapshot labeled
    /// [`PeriodLabel::Current`]. Balances are rounded to cents when
    /// emitted; the running total keeps full precision.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::DateOutOfRange` if the last period end
    /// cannot be represented. Nothing is computed in that case.
    pub fn project(
        current_balance: Decimal,
        entries: &[LedgerEntry],
        params: &ProjectionParams,
    ) -> Result<Vec<ProjectedBalance>, ProjectionError> {
        params
            .unit
            .advance(params.start_date, params.period_count)
            .ok_or(ProjectionError::DateOutOfRange)?;

        let mut points = vec![ProjectedBalance {
            label: PeriodLabel::Current,
            period_end: params.start_date,
            balance: round_money(current_balance),
        }];

        let mut running = current_balance;
        let mut cursor_start = params.start_date;
        for i in 1..=params.period_count {
            let cursor_end = params
                .unit
                .advance(params.start_date, i)
                .ok_or(ProjectionError::DateOutOfRange)?;
            running += Self::period_change(entries, cursor_start, cursor_end);

            points.push(ProjectedBalance {
                label: params.unit.label(cursor_end),
                period_end: cursor_end,
                balance: round_money(running),
            });
            cursor_start = cursor_end;
        }

        debug!(
            periods = params.period_count,
            unit = ?params.unit,
            final_balance = %running,
            "Projected balance"
        );
        Ok(points)
    }

    /// Runs independent projections in parallel, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub fn project_many(
        scenarios: &[(Decimal, &[LedgerEntry])],
        params: &ProjectionParams,
    ) -> Result<Vec<Vec<ProjectedBalance>>, ProjectionError> {
        scenarios
            .par_iter()
            .map(|&(balance, entries)| {
                Self::project(balance, entries, params)
            })
            .collect()
    }

    fn is_projected(entry: &LedgerEntry) -> bool {
        entry.is_active() && entry.origin == EntryOrigin::Planned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EntryKind;
    use crate::recurrence::Recurrence;
    use fincontrol_shared::types::{Amount, EnvironmentId};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn planned(
        kind: EntryKind,
        value: Decimal,
        effective: NaiveDate,
        recurrence: Recurrence,
    ) -> LedgerEntry {
        LedgerEntry::planned(
            EnvironmentId::new(),
            kind,
            Amount::new(value).unwrap(),
            effective,
            recurrence,
        )
    }

    #[test]
    fn test_monthly_income_scenario() {
        let today = date(2026, 10, 17);
        let entry = planned(
            EntryKind::Profit,
            dec!(50),
            date(2026, 9, 17),
            Recurrence::Monthly,
        );

        let params = ProjectionParams::months(today, 2);
        let points = BalanceProjectionSimulator::project(dec!(1000), &[entry], &params).unwrap();

        let summary: Vec<(String, Decimal)> = points
            .iter()
            .map(|p| (p.label.to_string(), p.balance))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("current".to_string(), dec!(1000)),
                ("2026-11".to_string(), dec!(1050)),
                ("2026-12".to_string(), dec!(1100)),
            ]
        );
    }

    #[test]
    fn test_no_entries_keeps_balance() {
        let points = BalanceProjectionSimulator::project(
            dec!(100),
            &[],
            &ProjectionParams::months(date(2024, 1, 31), 3),
        )
        .unwrap();

        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.balance == dec!(100)));
        assert!(points.windows(2).all(|w| w[0].label < w[1].label));
        // Ends are anchored to the start date, not chained.
        assert_eq!(points[3].period_end, date(2024, 4, 30));
    }

    #[test]
    fn test_yearly_projection_and_labels() {
        let entry = planned(
            EntryKind::Expense,
            dec!(10),
            date(2024, 1, 1),
            Recurrence::Monthly,
        );

        let points = BalanceProjectionSimulator::project(
            dec!(500),
            &[entry],
            &ProjectionParams::years(date(2024, 6, 15), 2),
        )
        .unwrap();

        assert_eq!(points[1].label, PeriodLabel::Year(2025));
        assert_eq!(points[1].label.to_string(), "2025");
        assert_eq!(points[1].balance, dec!(380));
        assert_eq!(points[2].balance, dec!(260));
    }

    #[test]
    fn test_one_off_planned_entry_and_unplanned_ignored() {
        let one_off = planned(
            EntryKind::Expense,
            dec!(75),
            date(2024, 2, 10),
            Recurrence::None,
        );
        let unplanned = LedgerEntry::unplanned(
            EnvironmentId::new(),
            EntryKind::Profit,
            Amount::new(dec!(999)).unwrap(),
            date(2024, 2, 10),
        );

        let points = BalanceProjectionSimulator::project(
            dec!(100),
            &[one_off, unplanned],
            &ProjectionParams::months(date(2024, 1, 15), 3),
        )
        .unwrap();

        let balances: Vec<Decimal> = points.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![dec!(100), dec!(25), dec!(25), dec!(25)]);
    }

    #[test]
    fn test_rounding_only_at_emission() {
        let entry = planned(
            EntryKind::Profit,
            dec!(0.004),
            date(2024, 1, 1),
            Recurrence::Daily,
        );

        let points = BalanceProjectionSimulator::project(
            dec!(0),
            &[entry],
            &ProjectionParams::months(date(2024, 1, 1), 2),
        )
        .unwrap();

        // 31 days then 29 days of 0.004: 0.124 and 0.240.
        assert_eq!(points[1].balance, dec!(0.12));
        assert_eq!(points[2].balance, dec!(0.24));
    }

    #[test]
    fn test_date_out_of_range() {
        let result = BalanceProjectionSimulator::project(
            dec!(0),
            &[],
            &ProjectionParams::years(NaiveDate::MAX, 1),
        );
        assert_eq!(result, Err(ProjectionError::DateOutOfRange));
    }

    #[test]
    fn test_unbounded_period_count_fails_before_simulating() {
        let start = date(2024, 1, 1);

        for params in [
            ProjectionParams::months(start, u32::MAX),
            ProjectionParams::years(start, u32::MAX),
        ] {
            let result = BalanceProjectionSimulator::project(dec!(0), &[], &params);
            assert_eq!(result, Err(ProjectionError::DateOutOfRange));
        }
    }

    #[test]
    fn test_project_many_preserves_order() {
        let entries = vec![planned(
            EntryKind::Profit,
            dec!(1),
            date(2024, 1, 1),
            Recurrence::Monthly,
        )];
        let scenarios: Vec<(Decimal, &[LedgerEntry])> =
            vec![(dec!(10), entries.as_slice()), (dec!(20), &[][..])];

        let results = BalanceProjectionSimulator::project_many(
            &scenarios,
            &ProjectionParams::months(date(2024, 1, 1), 1),
        )
        .unwrap();

        assert_eq!(results[0][1].balance, dec!(11));
        assert_eq!(results[1][1].balance, dec!(20));
    }
}
