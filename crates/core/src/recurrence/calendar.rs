//! Recurrence kinds and the calendar arithmetic shared by every engine component.
//!
//! Occurrences follow the cadence anchored at the entry's first date:
//! `anchor + k * step` for `k >= 0`, with month-based steps added from the
//! anchor (so a Jan 31 anchor fires on Feb 29 and again on Mar 31). A window
//! `[from, to]` is closed on both ends.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a ledger entry repeats, or how long a goal period lasts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Fires once, on its anchor date.
    #[default]
    None,
    /// Every day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every calendar month.
    Monthly,
    /// Every 6 months (half-year periods start Jan 1 and Jul 1).
    Semestral,
    /// Every 12 months.
    Annual,
}

/// Step between two consecutive occurrences.
#[derive(Debug, Clone, Copy)]
enum Cadence {
    Days(u64),
    Months(u32),
}

impl Recurrence {
    /// Every recurrence kind, in code order.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Semestral,
        Self::Annual,
    ];

    /// Stable numeric code exchanged with the persistence layer.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Daily => 1,
            Self::Weekly => 2,
            Self::Monthly => 3,
            Self::Semestral => 4,
            Self::Annual => 5,
        }
    }

    /// Parses a numeric code. Unknown codes have no recurrence.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Daily),
            2 => Some(Self::Weekly),
            3 => Some(Self::Monthly),
            4 => Some(Self::Semestral),
            5 => Some(Self::Annual),
            _ => None,
        }
    }

    /// Returns true for every kind except [`Recurrence::None`].
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::None)
    }

    const fn cadence(self) -> Option<Cadence> {
        match self {
            Self::None => None,
            Self::Daily => Some(Cadence::Days(1)),
            Self::Weekly => Some(Cadence::Days(7)),
            Self::Monthly => Some(Cadence::Months(1)),
            Self::Semestral => Some(Cadence::Months(6)),
            Self::Annual => Some(Cadence::Months(12)),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Semestral => "semestral",
            Self::Annual => "annual",
        };
        f.write_str(name)
    }
}

/// Pure date-interval arithmetic over recurrences.
pub struct RecurrenceCalendar;

impl RecurrenceCalendar {
    /// Counts the occurrences of a cadence anchored at `anchor` that fall
    /// inside the closed window `[from, to]`.
    ///
    /// Returns 0 when the anchor lies after `to` or the window is empty.
    /// Never panics for in-range dates.
    #[must_use]
    pub fn occurrences(
        recurrence: Recurrence,
        anchor: NaiveDate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> u32 {
        if anchor > to || from > to {
            return 0;
        }

        match recurrence.cadence() {
            None => u32::from(anchor >= from),
            Some(Cadence::Days(step)) => count_day_steps(anchor, from, to, step),
            Some(Cadence::Months(step)) => count_month_steps(anchor, from, to, step),
        }
    }

    /// Same as [`RecurrenceCalendar::occurrences`] for a raw recurrence code.
    ///
    /// Unknown codes degrade to zero occurrences instead of failing.
    #[must_use]
    pub fn occurrences_by_code(
        code: i32,
        anchor: NaiveDate,
        from: NaiveDate,
        to: NaiveDate,
    ) -> u32 {
        Recurrence::from_code(code).map_or(0, |recurrence| {
            Self::occurrences(recurrence, anchor, from, to)
        })
    }

    /// Returns true if both dates fall inside the same period.
    ///
    /// Weeks are ISO weeks (Monday start, ISO week-year). A non-recurring
    /// kind has no boundaries, so every pair of dates shares its period.
    #[must_use]
    pub fn is_same_period(recurrence: Recurrence, a: NaiveDate, b: NaiveDate) -> bool {
        match recurrence {
            Recurrence::None => true,
            Recurrence::Daily => a == b,
            Recurrence::Weekly => a.iso_week() == b.iso_week(),
            Recurrence::Monthly => a.year() == b.year() && a.month() == b.month(),
            Recurrence::Semestral => a.year() == b.year() && semester(a) == semester(b),
            Recurrence::Annual => a.year() == b.year(),
        }
    }

    /// First day of the period containing `date`.
    #[must_use]
    pub fn period_start(recurrence: Recurrence, date: NaiveDate) -> Option<NaiveDate> {
        match recurrence {
            Recurrence::None => None,
            Recurrence::Daily => Some(date),
            Recurrence::Weekly => {
                let offset = date.weekday().num_days_from_monday();
                date.checked_sub_days(Days::new(u64::from(offset)))
            }
            Recurrence::Monthly => date.with_day(1),
            Recurrence::Semestral => {
                NaiveDate::from_ymd_opt(date.year(), semester(date) * 6 + 1, 1)
            }
            Recurrence::Annual => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        }
    }

    /// Period starts crossed when moving from `from` to `to`, i.e. every
    /// period start `p` with `from < p <= to`, in ascending order.
    #[must_use]
    pub fn boundaries_between(
        recurrence: Recurrence,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<NaiveDate> {
        let mut boundaries = Vec::new();
        if from >= to {
            return boundaries;
        }
        let Some(mut cursor) = Self::period_start(recurrence, from) else {
            return boundaries;
        };

        while let Some(next) = next_period_start(recurrence, cursor) {
            if next > to {
                break;
            }
            boundaries.push(next);
            cursor = next;
        }
        boundaries
    }
}

fn semester(date: NaiveDate) -> u32 {
    date.month0() / 6
}

fn next_period_start(recurrence: Recurrence, start: NaiveDate) -> Option<NaiveDate> {
    match recurrence.cadence()? {
        Cadence::Days(step) => start.checked_add_days(Days::new(step)),
        Cadence::Months(step) => start.checked_add_months(Months::new(step)),
    }
}

fn count_day_steps(anchor: NaiveDate, from: NaiveDate, to: NaiveDate, step: u64) -> u32 {
    let effective_start = anchor.max(from);
    let offset = (effective_start - anchor).num_days().unsigned_abs();
    let span = (to - anchor).num_days().unsigned_abs();

    let first = offset.div_ceil(step);
    let last = span / step;
    if first > last {
        return 0;
    }
    u32::try_from(last - first + 1).unwrap_or(u32::MAX)
}

fn count_month_steps(anchor: NaiveDate, from: NaiveDate, to: NaiveDate, step: u32) -> u32 {
    let effective_start = anchor.max(from);
    let Some(last) = last_month_step_at_or_before(anchor, to, step) else {
        return 0;
    };
    match first_month_step_at_or_after(anchor, effective_start, step) {
        Some(first) if first <= last => last - first + 1,
        _ => 0,
    }
}

fn month_step(anchor: NaiveDate, step: u32, k: u32) -> Option<NaiveDate> {
    anchor.checked_add_months(Months::new(step.checked_mul(k)?))
}

/// Whole calendar months from `earlier` to `later`, ignoring the day of month.
fn months_between(earlier: NaiveDate, later: NaiveDate) -> u32 {
    let diff = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month())
        - i64::from(earlier.month());
    u32::try_from(diff).unwrap_or(0)
}

/// Largest `k` whose occurrence is on or before `date`.
fn last_month_step_at_or_before(anchor: NaiveDate, date: NaiveDate, step: u32) -> Option<u32> {
    if anchor > date {
        return None;
    }
    // Month arithmetic bounds k from above; day clamping can overshoot by one step.
    let mut k = months_between(anchor, date) / step;
    loop {
        match month_step(anchor, step, k) {
            Some(candidate) if candidate <= date => return Some(k),
            _ if k == 0 => return None,
            _ => k -= 1,
        }
    }
}

/// Smallest `k` whose occurrence is on or after `date`.
fn first_month_step_at_or_after(anchor: NaiveDate, date: NaiveDate, step: u32) -> Option<u32> {
    if date <= anchor {
        return Some(0);
    }
    let mut k = months_between(anchor, date).div_ceil(step);
    loop {
        let candidate = month_step(anchor, step, k)?;
        if candidate >= date {
            return Some(k);
        }
        k = k.checked_add(1)?;
    }
}
