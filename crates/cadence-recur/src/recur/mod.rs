//! Recurrence evaluation engine.
//!
//! The engine is composed of small, separately testable pieces:
//! - [`pattern`]: the immutable schedule definition and its validation
//! - [`ordinal`]: "Nth weekday / weekend day of a month" resolution
//! - [`weekly`]: weekly active-weekday cursor advancement
//! - [`periodic`]: per-period anchor advancement for every frequency
//! - [`intraday`]: fixed-interval sub-occurrences within a day
//! - [`filter`]: exception-date suppression and termination checks
//! - [`driver`]: the "next kept occurrence or terminal signal" composition
//!
//! Data flows one way: driver → periodic/intraday → ordinal/weekly → filter →
//! driver. Nothing here reads a clock or touches shared state.

mod cursor;
mod driver;
mod filter;
mod intraday;
mod ordinal;
mod pattern;
mod periodic;
mod weekly;
pub mod zone;

#[cfg(test)]
mod tests;

pub use cursor::{Occurrence, OccurrenceKind, RecurrenceCursor};
pub use driver::{Occurrences, automatic_spacing_elapsed, next_occurrence, next_step};
pub use pattern::{Frequency, IntradayRepeat, OrdinalSelector, SchedulePattern, WeekdaySelector};
