//! Caller-owned recurrence state.

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;

use crate::error::RecurResult;
use crate::recur::pattern::SchedulePattern;
use crate::recur::periodic;

/// How a candidate occurrence was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceKind {
    /// Actionable: the task is expected to run at this instant.
    Kept,
    /// Suppressed by an explicit exception date.
    SkippedException,
    /// Suppressed because the candidate no longer matches the pattern.
    SkippedPatternMismatch,
    /// The recurrence has ended. Terminal and stable: every subsequent
    /// evaluation of the same cursor reports it again.
    Terminated,
}

impl OccurrenceKind {
    #[must_use]
    pub const fn is_kept(self) -> bool {
        matches!(self, Self::Kept)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// A single evaluated occurrence, materialized in the schedule's zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub instant: DateTime<Tz>,
    pub kind: OccurrenceKind,
}

/// The minimal mutable state needed to compute the next occurrence without
/// recomputing history.
///
/// The cursor is owned by the caller and passed by value into each driver
/// call; it carries no synchronization. Evaluating the same schedule from two
/// threads means cloning the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceCursor {
    /// Last scheduled (not intraday-repeated) anchor, in the schedule's own
    /// zone. Monotonically non-decreasing across driver calls.
    pub last_anchor: NaiveDateTime,

    /// Kept-occurrence counter, compared against `max_occurrences`.
    pub occurrence_count: u32,

    /// Set when the day's intraday repeat window is spent; reset when the
    /// anchor moves to a new calendar day.
    pub intraday_exhausted: bool,

    /// False until the initial anchor has been handed out.
    pub(crate) primed: bool,

    /// Intraday sub-occurrences emitted since the current anchor.
    pub(crate) intraday_step: u32,

    /// Latches termination so the terminal signal is stable.
    pub(crate) terminated: bool,
}

impl RecurrenceCursor {
    /// ## Summary
    /// Creates a cursor parked on the pattern's first anchor.
    ///
    /// ## Errors
    /// Returns [`crate::error::RecurError::InvalidPattern`] if the pattern
    /// fails validation.
    pub fn start(pattern: &SchedulePattern) -> RecurResult<Self> {
        pattern.validate()?;
        Ok(Self::at(periodic::first_anchor(pattern)?))
    }

    /// Creates a cursor parked on an explicit anchor, e.g. when resuming from
    /// persisted state.
    #[must_use]
    pub const fn at(anchor: NaiveDateTime) -> Self {
        Self {
            last_anchor: anchor,
            occurrence_count: 0,
            intraday_exhausted: false,
            primed: false,
            intraday_step: 0,
            terminated: false,
        }
    }

    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }
}
