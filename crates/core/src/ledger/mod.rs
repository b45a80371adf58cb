//! Ledger entries and incremental balance processing.
//!
//! This module implements:
//! - Planned and unplanned ledger entries
//! - The incremental processor that folds occurrences into a running balance
//!   exactly once per date
//! - Error types for invalid entries

pub mod entry;
pub mod error;
pub mod processor;

#[cfg(test)]
mod processor_props;

pub use entry::{EntryKind, EntryOrigin, LedgerEntry};
pub use error::LedgerError;
pub use processor::{IncrementalBalanceProcessor, ProcessOutcome};
