//! Control levels derived from lifetime achievements.

use serde::{Deserialize, Serialize};

/// Ordinal achievement tier of an environment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ControlLevel {
    /// No tier reached yet.
    #[default]
    None,
    /// 3 goals achieved.
    Beginner,
    /// 8 goals achieved.
    Learning,
    /// 15 goals achieved.
    Intermediate,
    /// 25 goals achieved.
    Advanced,
    /// 40 goals achieved.
    Expert,
    /// 60 goals achieved.
    Master,
    /// More than 60 goals achieved.
    FinancialController,
}

/// Exact totals at which a new tier is granted, ascending.
pub const CONTROL_LEVEL_TRIGGERS: [(u32, ControlLevel); 6] = [
    (3, ControlLevel::Beginner),
    (8, ControlLevel::Learning),
    (15, ControlLevel::Intermediate),
    (25, ControlLevel::Advanced),
    (40, ControlLevel::Expert),
    (60, ControlLevel::Master),
];

impl ControlLevel {
    /// Returns the tier after the lifetime total reaches `total`.
    ///
    /// A tier changes only on an exact trigger or above the last trigger;
    /// every other total keeps `current`.
    #[must_use]
    pub fn after_total(total: u32, current: Self) -> Self {
        if let Some(&(_, level)) = CONTROL_LEVEL_TRIGGERS
            .iter()
            .find(|(trigger, _)| *trigger == total)
        {
            return level;
        }
        let top = CONTROL_LEVEL_TRIGGERS
            .last()
            .map_or(0, |(trigger, _)| *trigger);
        if total > top {
            Self::FinancialController
        } else {
            current
        }
    }

    /// Stable numeric code exchanged with the persistence layer.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}
