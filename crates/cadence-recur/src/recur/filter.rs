//! Exception-date suppression and termination checks.

use chrono::{Datelike, NaiveDateTime};

use crate::recur::cursor::{OccurrenceKind, RecurrenceCursor};
use crate::recur::pattern::{Frequency, SchedulePattern};

/// Classifies a candidate occurrence.
///
/// Order matters: termination is checked first and is final, so a candidate
/// that is both past the end date and on an exception day reports
/// `Terminated` — the caller learns the recurrence has ended instead of
/// retrying.
pub(crate) fn classify(
    pattern: &SchedulePattern,
    candidate: NaiveDateTime,
    cursor: &RecurrenceCursor,
) -> OccurrenceKind {
    if pattern.end_date.is_some_and(|end| candidate.date() > end) {
        return OccurrenceKind::Terminated;
    }
    if pattern
        .max_occurrences
        .is_some_and(|max| cursor.occurrence_count >= max)
    {
        return OccurrenceKind::Terminated;
    }
    if pattern.exception_days.contains(&candidate.day()) {
        return OccurrenceKind::SkippedException;
    }
    // The weekly advancer never parks outside the active set; this gate stays
    // for callers that hand-construct candidates, e.g. replaying history.
    if pattern.frequency == Frequency::Weekly
        && !pattern.active_weekdays.contains(&candidate.weekday())
    {
        return OccurrenceKind::SkippedPatternMismatch;
    }
    OccurrenceKind::Kept
}
