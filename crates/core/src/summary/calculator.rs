//! Summary calculations over an environment's records.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use fincontrol_shared::config::EngineConfig;
use rust_decimal::Decimal;

use super::types::{
    AlertLevel, FinancialSummary, GoalsSummary, PeriodAchievements, UnexpectedExpenseAnalysis,
};
use crate::environment::Environment;
use crate::goals::Goal;
use crate::ledger::{EntryKind, EntryOrigin, LedgerEntry};

/// Stateless summary calculator.
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Totals every unplanned entry and every planned entry effective on or
    /// before `today`, each counted once.
    #[must_use]
    pub fn financial_summary(
        environment: &Environment,
        entries: &[LedgerEntry],
        today: NaiveDate,
    ) -> FinancialSummary {
        let counted = entries.iter().filter(|e| {
            e.is_active()
                && (e.origin == EntryOrigin::Unplanned || e.effective_date <= today)
        });

        let (total_profit, total_expense) =
            counted.fold((Decimal::ZERO, Decimal::ZERO), |(profit, expense), e| {
                match e.kind {
                    EntryKind::Profit => (profit.saturating_add(e.amount.value()), expense),
                    EntryKind::Expense => (profit, expense.saturating_add(e.amount.value())),
                }
            });

        FinancialSummary {
            current_balance: environment.total_balance,
            total_profit,
            total_expense,
            profit_margin_percent: percentage_of(
                total_profit.saturating_sub(total_expense),
                total_profit,
            ),
            control_level: environment.control_level,
        }
    }

    /// Counts goals without a recurring period whose deadline is on or
    /// before `today`.
    #[must_use]
    pub fn goals_summary(goals: &[Goal], today: NaiveDate) -> GoalsSummary {
        goals
            .iter()
            .filter(|g| !g.is_deleted && g.recurring_period().is_none())
            .filter(|g| g.deadline_date.is_some_and(|d| d <= today))
            .fold(GoalsSummary::default(), |mut summary, goal| {
                if goal.achieved {
                    summary.completed += 1;
                } else {
                    summary.pending += 1;
                }
                summary
            })
    }

    /// Compares unplanned expenses with all profits dated in the last
    /// `config.unexpected_expense_window_days` days (inclusive of `today`).
    #[must_use]
    pub fn unexpected_expenses(
        entries: &[LedgerEntry],
        today: NaiveDate,
        config: &EngineConfig,
    ) -> UnexpectedExpenseAnalysis {
        let window_days = config.unexpected_expense_window_days;
        let window_start = today
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);
        let in_window = entries.iter().filter(|e| {
            e.is_active() && e.effective_date >= window_start && e.effective_date <= today
        });

        let mut total_unexpected_expenses = Decimal::ZERO;
        let mut total_profits = Decimal::ZERO;
        for entry in in_window {
            match (entry.kind, entry.origin) {
                (EntryKind::Expense, EntryOrigin::Unplanned) => {
                    total_unexpected_expenses =
                        total_unexpected_expenses.saturating_add(entry.amount.value());
                }
                (EntryKind::Profit, _) => {
                    total_profits = total_profits.saturating_add(entry.amount.value());
                }
                (EntryKind::Expense, EntryOrigin::Planned) => {}
            }
        }

        let percentage = percentage_of(total_unexpected_expenses, total_profits);
        UnexpectedExpenseAnalysis {
            window_days,
            total_unexpected_expenses,
            total_profits,
            percentage,
            alert_level: AlertLevel::classify(
                percentage,
                Decimal::from(config.alert_moderate_percent),
                Decimal::from(config.alert_high_percent),
            ),
        }
    }

    /// Sums lifetime achievements per recurring period, in period order.
    ///
    /// Grouping uses the goal's period alone, whether or not an anchor is set.
    #[must_use]
    pub fn achievement_distribution(goals: &[Goal]) -> Vec<PeriodAchievements> {
        let mut totals = BTreeMap::new();
        for goal in goals.iter().filter(|g| !g.is_deleted) {
            if let Some(period) = goal.recurring_period() {
                let total: &mut u32 = totals.entry(period).or_default();
                *total = total.saturating_add(goal.achievement_count);
            }
        }

        totals
            .into_iter()
            .map(|(period, total_achievements)| PeriodAchievements {
                period,
                total_achievements,
            })
            .collect()
    }
}

/// `part / whole * 100` rounded to one decimal place; zero when `whole` is
/// not positive. Saturates at the bounds of `Decimal`.
fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or_else(
            || {
                if part.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            },
            |percent| percent.round_dp(1),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::ControlLevel;
    use crate::recurrence::Recurrence;
    use fincontrol_shared::types::{Amount, EnvironmentId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    fn unplanned(
        env: EnvironmentId,
        kind: EntryKind,
        value: Decimal,
        on: NaiveDate,
    ) -> LedgerEntry {
        LedgerEntry::unplanned(env, kind, amount(value), on)
    }

    fn planned(env: EnvironmentId, kind: EntryKind, value: Decimal, on: NaiveDate) -> LedgerEntry {
        LedgerEntry::planned(env, kind, amount(value), on, Recurrence::Monthly)
    }

    #[test]
    fn test_financial_summary() {
        let mut env = Environment::new("home", dec!(640));
        env.control_level = ControlLevel::Beginner;
        let entries = vec![
            unplanned(env.id, EntryKind::Profit, dec!(300), date(2, 1)),
            unplanned(env.id, EntryKind::Expense, dec!(60), date(9, 1)),
            planned(env.id, EntryKind::Profit, dec!(500), date(3, 1)),
            planned(env.id, EntryKind::Expense, dec!(100), date(4, 1)),
            planned(env.id, EntryKind::Profit, dec!(1000), date(12, 1)),
        ];

        let summary = SummaryCalculator::financial_summary(&env, &entries, date(6, 1));

        assert_eq!(summary.current_balance, dec!(640));
        assert_eq!(summary.total_profit, dec!(800));
        assert_eq!(summary.total_expense, dec!(160));
        assert_eq!(summary.profit_margin_percent, dec!(80.0));
        assert_eq!(summary.control_level, ControlLevel::Beginner);
    }

    #[test]
    fn test_financial_summary_without_profit() {
        let env = Environment::new("home", dec!(0));
        let entries = vec![unplanned(env.id, EntryKind::Expense, dec!(10), date(1, 1))];

        let summary = SummaryCalculator::financial_summary(&env, &entries, date(6, 1));
        assert_eq!(summary.profit_margin_percent, Decimal::ZERO);
    }

    #[test]
    fn test_goals_summary_counts_past_deadlines_only() {
        let env = EnvironmentId::new();
        let mut done = Goal::single(env, amount(dec!(1)), date(3, 1));
        done.achieved = true;
        let missed = Goal::single(env, amount(dec!(1)), date(4, 1));
        let open = Goal::single(env, amount(dec!(1)), date(12, 1));
        let recurring = Goal::recurring(env, amount(dec!(1)), Recurrence::Monthly, date(1, 1));

        let summary =
            SummaryCalculator::goals_summary(&[done, missed, open, recurring], date(6, 1));
        assert_eq!(
            summary,
            GoalsSummary {
                completed: 1,
                pending: 1,
            }
        );
    }

    #[rstest]
    #[case(dec!(10), AlertLevel::Low)]
    #[case(dec!(20), AlertLevel::Moderate)]
    #[case(dec!(45), AlertLevel::High)]
    fn test_unexpected_expense_alerts(#[case] spent: Decimal, #[case] expected: AlertLevel) {
        let env = EnvironmentId::new();
        let today = date(6, 30);
        let entries = vec![
            planned(env, EntryKind::Profit, dec!(100), date(6, 5)),
            unplanned(env, EntryKind::Expense, spent, date(6, 20)),
            planned(env, EntryKind::Expense, dec!(80), date(6, 21)),
            unplanned(env, EntryKind::Expense, dec!(1000), date(5, 1)),
        ];

        let analysis =
            SummaryCalculator::unexpected_expenses(&entries, today, &EngineConfig::default());

        assert_eq!(analysis.total_profits, dec!(100));
        assert_eq!(analysis.total_unexpected_expenses, spent);
        assert_eq!(analysis.percentage, spent.round_dp(1));
        assert_eq!(analysis.alert_level, expected);
    }

    #[test]
    fn test_alert_threshold_edges() {
        let classify = |percent| AlertLevel::classify(percent, dec!(15), dec!(30));

        assert_eq!(classify(dec!(14.9)), AlertLevel::Low);
        assert_eq!(classify(dec!(15)), AlertLevel::Moderate);
        assert_eq!(classify(dec!(29.9)), AlertLevel::Moderate);
        assert_eq!(classify(dec!(30)), AlertLevel::High);
    }

    #[test]
    fn test_achievement_distribution() {
        let env = EnvironmentId::new();
        let mut weekly = Goal::recurring(env, amount(dec!(1)), Recurrence::Weekly, date(1, 1));
        weekly.achievement_count = 4;
        let mut monthly_a = Goal::recurring(env, amount(dec!(1)), Recurrence::Monthly, date(1, 1));
        monthly_a.achievement_count = 2;
        let mut monthly_b = Goal::recurring(env, amount(dec!(1)), Recurrence::Monthly, date(1, 1));
        monthly_b.achievement_count = 3;
        let mut single = Goal::single(env, amount(dec!(1)), date(1, 1));
        single.achievement_count = 1;

        let distribution =
            SummaryCalculator::achievement_distribution(&[monthly_a, weekly, single, monthly_b]);

        assert_eq!(
            distribution,
            vec![
                PeriodAchievements {
                    period: Recurrence::Weekly,
                    total_achievements: 4,
                },
                PeriodAchievements {
                    period: Recurrence::Monthly,
                    total_achievements: 5,
                },
            ]
        );
    }

    #[test]
    fn test_unanchored_recurring_goal_is_grouped_by_period() {
        let env = EnvironmentId::new();
        let mut unanchored = Goal::recurring(env, amount(dec!(1)), Recurrence::Annual, date(1, 1));
        unanchored.anchor_date = None;
        unanchored.deadline_date = Some(date(3, 1));
        unanchored.achievement_count = 2;
        unanchored.achieved = true;
        let goals = [unanchored];

        let summary = SummaryCalculator::goals_summary(&goals, date(6, 1));
        let distribution = SummaryCalculator::achievement_distribution(&goals);

        assert_eq!(summary, GoalsSummary::default());
        assert_eq!(
            distribution,
            vec![PeriodAchievements {
                period: Recurrence::Annual,
                total_achievements: 2,
            }]
        );
    }

    #[test]
    fn test_percentages_saturate_instead_of_overflowing() {
        let env = Environment::new("home", dec!(0));
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let entries = vec![
            unplanned(env.id, EntryKind::Profit, dec!(0.01), date(6, 20)),
            unplanned(env.id, EntryKind::Expense, huge, date(6, 21)),
        ];

        let financial = SummaryCalculator::financial_summary(&env, &entries, date(6, 30));
        let analysis =
            SummaryCalculator::unexpected_expenses(&entries, date(6, 30), &EngineConfig::default());

        assert_eq!(financial.profit_margin_percent, Decimal::MIN);
        assert_eq!(analysis.total_unexpected_expenses, huge);
        assert_eq!(analysis.percentage, Decimal::MAX);
        assert_eq!(analysis.alert_level, AlertLevel::High);
    }
}
