//! Core recurrence and temporal aggregation engine for FinControl.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Callers supply records through the [`store::LedgerStore`] trait.
//!
//! # Modules
//!
//! - `recurrence` - Occurrence counting and period boundaries
//! - `ledger` - Ledger entries and incremental balance processing
//! - `goals` - Period-bound goals and control levels
//! - `environment` - The ledger scope aggregate
//! - `timeline` - Historical balance reconstruction
//! - `projection` - Forward balance projection
//! - `summary` - Read-model summaries
//! - `store` - Persistence collaborators
//! - `service` - Orchestration over a store

pub mod environment;
pub mod goals;
pub mod ledger;
pub mod projection;
pub mod recurrence;
pub mod service;
pub mod store;
pub mod summary;
pub mod timeline;

pub use environment::Environment;
pub use service::{EngineError, EnvironmentService};
