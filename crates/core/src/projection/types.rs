//! Projection data types.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ProjectionError;

/// Length of one projected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    /// One calendar month.
    Month,
    /// One calendar year.
    Year,
}

impl PeriodUnit {
    const fn months(self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Year => 12,
        }
    }

    /// End of the `n`-th period after `start`, counted from `start` so
    /// end-of-month clamping never accumulates.
    #[must_use]
    pub fn advance(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        start.checked_add_months(Months::new(self.months().checked_mul(n)?))
    }

    /// Label of the period ending on `date`.
    #[must_use]
    pub fn label(self, date: NaiveDate) -> PeriodLabel {
        match self {
            Self::Month => PeriodLabel::Month {
                year: date.year(),
                month: date.month(),
            },
            Self::Year => PeriodLabel::Year(date.year()),
        }
    }
}

/// Label of a projected point. Orders chronologically within one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLabel {
    /// The snapshot balance before any projected change.
    Current,
    /// A calendar month.
    Month {
        /// Year.
        year: i32,
        /// Month (1-12).
        month: u32,
    },
    /// A calendar year.
    Year(i32),
}

impl std::fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

/// Parameters for a projection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// Date of the snapshot balance.
    pub start_date: NaiveDate,
    /// Number of periods after the snapshot.
    pub period_count: u32,
    /// Period length.
    pub unit: PeriodUnit,
}

impl ProjectionParams {
    /// Creates monthly projection parameters.
    #[must_use]
    pub const fn months(start_date: NaiveDate, period_count: u32) -> Self {
        Self {
            start_date,
            period_count,
            unit: PeriodUnit::Month,
        }
    }

    /// Creates yearly projection parameters.
    #[must_use]
    pub const fn years(start_date: NaiveDate, period_count: u32) -> Self {
        Self {
            start_date,
            period_count,
            unit: PeriodUnit::Year,
        }
    }

    /// Checks the period count against `max_periods`.
    ///
    /// # Errors
    ///
    /// Returns `ProjectionError::TooManyPeriods` if the count is above the limit.
    pub const fn validate(&self, max_periods: u32) -> Result<(), ProjectionError> {
        if self.period_count > max_periods {
            return Err(ProjectionError::TooManyPeriods {
                requested: self.period_count,
                max: max_periods,
            });
        }
        Ok(())
    }
}

/// One point of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedBalance {
    /// Period label.
    pub label: PeriodLabel,
    /// Last date covered by the point.
    pub period_end: NaiveDate,
    /// Balance rounded to cents.
    pub balance: Decimal,
}
