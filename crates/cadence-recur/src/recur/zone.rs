//! Localization of computed naive instants into the schedule's zone.
//!
//! All calendar arithmetic in this crate happens on naive local date-times;
//! the result is materialized into a zone-aware instant here. DST gaps and
//! folds are surfaced to the caller instead of silently resolved.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{RecurError, RecurResult};

/// ## Summary
/// Resolves an IANA zone identifier to a `chrono_tz::Tz`.
///
/// ## Errors
/// Returns [`RecurError::UnknownTimezone`] if the identifier is not a known
/// IANA zone.
pub fn parse_zone(identifier: &str) -> RecurResult<Tz> {
    Tz::from_str(identifier).map_err(|_e| RecurError::UnknownTimezone(identifier.to_string()))
}

/// ## Summary
/// Converts a naive local date-time into a zone-aware instant.
///
/// ## Errors
/// Returns [`RecurError::NonexistentLocalTime`] if the local time falls in a
/// DST gap, or [`RecurError::AmbiguousLocalTime`] if it falls in a DST fold.
/// The engine never guesses an offset.
pub fn localize(local: NaiveDateTime, zone: Tz) -> RecurResult<DateTime<Tz>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(earlier, later) => Err(RecurError::AmbiguousLocalTime {
            local,
            earlier,
            later,
        }),
        LocalResult::None => Err(RecurError::NonexistentLocalTime(local)),
    }
}
