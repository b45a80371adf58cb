//! Recurrence kinds and date-interval arithmetic.
//!
//! Every other engine component counts occurrences and period boundaries
//! through [`RecurrenceCalendar`].

pub mod calendar;


pub use calendar::{Recurrence, RecurrenceCalendar};
