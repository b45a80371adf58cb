//! Summary data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::ControlLevel;
use crate::recurrence::Recurrence;

/// Overall financial position of an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Running balance.
    pub current_balance: Decimal,
    /// Sum of profit entries, each counted once.
    pub total_profit: Decimal,
    /// Sum of expense entries, each counted once.
    pub total_expense: Decimal,
    /// `(profit - expense) / profit * 100`, one decimal place.
    pub profit_margin_percent: Decimal,
    /// Current tier.
    pub control_level: ControlLevel,
}

/// Completion counts of deadline goals whose deadline has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsSummary {
    /// Achieved goals.
    pub completed: u32,
    /// Goals not achieved.
    pub pending: u32,
}

/// Severity of unexpected spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Below the moderate threshold.
    Low,
    /// Between the moderate and high thresholds.
    Moderate,
    /// At or above the high threshold.
    High,
}

impl AlertLevel {
    /// Classifies a percentage against the two thresholds.
    #[must_use]
    pub fn classify(percentage: Decimal, moderate: Decimal, high: Decimal) -> Self {
        if percentage < moderate {
            Self::Low
        } else if percentage < high {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

/// Unplanned expenses against profits over a recent window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnexpectedExpenseAnalysis {
    /// Window length in days.
    pub window_days: u32,
    /// Unplanned expenses inside the window.
    pub total_unexpected_expenses: Decimal,
    /// Planned and unplanned profits inside the window.
    pub total_profits: Decimal,
    /// Expenses as a percentage of profits, one decimal place.
    pub percentage: Decimal,
    /// Alert classification of `percentage`.
    pub alert_level: AlertLevel,
}

/// Lifetime achievements of recurring goals sharing a period type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAchievements {
    /// Goal period.
    pub period: Recurrence,
    /// Sum of `achievement_count` over the goals.
    pub total_achievements: u32,
}
