use chrono::NaiveDateTime;
use chrono_tz::Tz;
use thiserror::Error;

/// Recurrence evaluation errors
#[derive(Error, Debug)]
pub enum RecurError {
    /// Malformed or self-contradictory schedule definition. Fix the
    /// configuration; retrying reproduces the same failure.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A computed local instant falls in a DST fold. The caller decides which
    /// offset applies; silently picking one could shift a run by an hour.
    #[error("Ambiguous local time (DST fold): {local} could be {earlier} or {later}")]
    AmbiguousLocalTime {
        local: NaiveDateTime,
        earlier: chrono::DateTime<Tz>,
        later: chrono::DateTime<Tz>,
    },

    /// A computed local instant falls in a DST gap and does not exist.
    #[error("Nonexistent local time (DST gap): {0}")]
    NonexistentLocalTime(NaiveDateTime),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
