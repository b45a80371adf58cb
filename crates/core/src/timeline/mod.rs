//! Historical balance reconstruction.

pub mod error;
pub mod reconstructor;

pub use error::TimelineError;
pub use reconstructor::{BalancePoint, BalanceTimelineReconstructor};
