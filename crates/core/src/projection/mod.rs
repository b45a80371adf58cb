//! Forward balance projection.

pub mod engine;
pub mod error;
pub mod types;


pub use engine::BalanceProjectionSimulator;
pub use error::ProjectionError;
pub use types::{PeriodLabel, PeriodUnit, ProjectedBalance, ProjectionParams};
