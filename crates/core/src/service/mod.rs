//! Orchestration of the engine components over a [`crate::store::LedgerStore`].

pub mod environment;
pub mod error;

pub use environment::{BalanceRefresh, DailyReport, EnvironmentService};
pub use error::EngineError;
