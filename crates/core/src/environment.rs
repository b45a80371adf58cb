//! The environment aggregate: an isolated ledger scope.
//!
//! Lifetime counters live here and are passed by `&mut` into the goal
//! engine, so each test builds its own isolated instance.

use fincontrol_shared::types::EnvironmentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::ControlLevel;

/// A ledger scope owning its entries, goals and running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Unique identifier.
    pub id: EnvironmentId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Running balance, mutated by the balance processor and manual overrides.
    pub total_balance: Decimal,
    /// Lifetime count of achieved goal periods.
    #[serde(default)]
    pub total_goals_achieved: u32,
    /// Tier derived from `total_goals_achieved`.
    #[serde(default)]
    pub control_level: ControlLevel,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Environment {
    /// Creates an environment with the given opening balance.
    #[must_use]
    pub fn new(name: impl Into<String>, total_balance: Decimal) -> Self {
        Self {
            id: EnvironmentId::new(),
            name: name.into(),
            total_balance,
            total_goals_achieved: 0,
            control_level: ControlLevel::None,
            is_deleted: false,
        }
    }

    /// Counts one more achieved goal period and recomputes the tier.
    pub fn record_achievement(&mut self) {
        self.total_goals_achieved = self.total_goals_achieved.saturating_add(1);
        self.control_level =
            ControlLevel::after_total(self.total_goals_achieved, self.control_level);
    }

    /// Replaces the running balance. Returns the previous value.
    pub fn override_balance(&mut self, value: Decimal) -> Decimal {
        std::mem::replace(&mut self.total_balance, value)
    }
}
