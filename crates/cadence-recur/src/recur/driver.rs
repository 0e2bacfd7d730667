//! Recurrence driver: "given a cursor, produce the next kept occurrence or
//! the terminal signal".
//!
//! [`next_occurrence`] is the default mode: suppressed candidates are
//! consumed internally so every call yields the next actionable instant.
//! [`next_step`] exposes the raw per-transition trace for tests and audit.

use cadence_core::error::CoreError;
use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{RecurError, RecurResult};
use crate::recur::cursor::{Occurrence, OccurrenceKind, RecurrenceCursor};
use crate::recur::pattern::{Frequency, SchedulePattern};
use crate::recur::{filter, intraday, periodic, zone};

/// Upper bound on internally consumed suppressed candidates per call. A
/// pattern whose exception days blanket every candidate would otherwise loop
/// forever.
const MAX_SUPPRESSED_STEPS: u32 = 10_000;

/// ## Summary
/// Produces the next kept occurrence, or the terminal signal once the
/// recurrence has ended.
///
/// Suppressed candidates (`SkippedException`, `SkippedPatternMismatch`) are
/// consumed in a bounded loop and never returned from here. Termination is
/// stable: after a `Terminated` occurrence, every call with the returned
/// cursor yields `Terminated` again.
///
/// ## Errors
/// Returns [`RecurError::InvalidPattern`] for definitions the frequency
/// cannot evaluate, a DST error if a computed local instant cannot be
/// materialized in the schedule's zone, and an invariant violation if the
/// suppressed-candidate budget is exhausted.
pub fn next_occurrence(
    pattern: &SchedulePattern,
    cursor: RecurrenceCursor,
) -> RecurResult<(Occurrence, RecurrenceCursor)> {
    let mut cursor = cursor;
    for _ in 0..MAX_SUPPRESSED_STEPS {
        let (occurrence, next) = next_step(pattern, cursor)?;
        cursor = next;
        match occurrence.kind {
            OccurrenceKind::Kept | OccurrenceKind::Terminated => {
                return Ok((occurrence, cursor));
            }
            OccurrenceKind::SkippedException => {
                tracing::debug!(
                    instant = %occurrence.instant,
                    "occurrence suppressed by exception date"
                );
            }
            OccurrenceKind::SkippedPatternMismatch => {
                tracing::debug!(
                    instant = %occurrence.instant,
                    "occurrence suppressed by pattern mismatch"
                );
            }
        }
    }
    Err(RecurError::CoreError(CoreError::InvariantViolation(
        "recurrence evaluation exhausted its suppressed-candidate budget",
    )))
}

/// ## Summary
/// Performs a single cursor transition and returns the raw classification,
/// including suppressed candidates that [`next_occurrence`] would consume.
///
/// Transition order per call: the initial anchor, then intraday expansion
/// while the day's window lasts, then one periodic advance. The anchor only
/// moves on periodic advances; intraday candidates are derived from the day's
/// anchor, not from each other.
///
/// ## Errors
/// Same failure modes as [`next_occurrence`], minus the budget guard.
pub fn next_step(
    pattern: &SchedulePattern,
    cursor: RecurrenceCursor,
) -> RecurResult<(Occurrence, RecurrenceCursor)> {
    let mut cursor = cursor;

    if cursor.terminated {
        return terminal(pattern, cursor);
    }

    let candidate = if cursor.primed {
        match intraday_candidate(pattern, &mut cursor) {
            Some(candidate) => candidate,
            None => {
                // A one-time schedule whose single instant was handed out has
                // nothing left; this is an expected outcome, not an error.
                if pattern.frequency == Frequency::OneTime {
                    cursor.terminated = true;
                    tracing::debug!("one_time schedule exhausted");
                    return terminal(pattern, cursor);
                }
                let next = periodic::advance(pattern, cursor.last_anchor)?;
                cursor.last_anchor = next;
                cursor.intraday_exhausted = false;
                cursor.intraday_step = 0;
                next
            }
        }
    } else {
        cursor.primed = true;
        cursor.last_anchor
    };

    let kind = filter::classify(pattern, candidate, &cursor);
    match kind {
        OccurrenceKind::Kept => cursor.occurrence_count += 1,
        OccurrenceKind::Terminated => {
            cursor.terminated = true;
            tracing::debug!(anchor = %cursor.last_anchor, "recurrence terminated");
        }
        OccurrenceKind::SkippedException | OccurrenceKind::SkippedPatternMismatch => {}
    }

    let instant = zone::localize(candidate, pattern.time_zone)?;
    Ok((Occurrence { instant, kind }, cursor))
}

/// Attempts an intraday expansion against the current anchor. Returns `None`
/// when no repeat is configured or the day's window is spent, flagging the
/// cursor so the caller advances the anchor instead.
fn intraday_candidate(
    pattern: &SchedulePattern,
    cursor: &mut RecurrenceCursor,
) -> Option<chrono::NaiveDateTime> {
    let repeat = pattern.intraday_repeat.as_ref()?;
    if cursor.intraday_exhausted {
        return None;
    }
    let elapsed =
        TimeDelta::minutes(i64::from(repeat.every_minutes) * i64::from(cursor.intraday_step));
    let (candidate, exhausted) = intraday::next(repeat, cursor.last_anchor + elapsed);
    if exhausted {
        cursor.intraday_exhausted = true;
        tracing::trace!(anchor = %cursor.last_anchor, "intraday window exhausted");
        return None;
    }
    cursor.intraday_step += 1;
    Some(candidate)
}

fn terminal(
    pattern: &SchedulePattern,
    cursor: RecurrenceCursor,
) -> RecurResult<(Occurrence, RecurrenceCursor)> {
    let instant = zone::localize(cursor.last_anchor, pattern.time_zone)?;
    Ok((
        Occurrence {
            instant,
            kind: OccurrenceKind::Terminated,
        },
        cursor,
    ))
}

/// ## Summary
/// Validates that the minimum spacing of an automatic schedule has elapsed
/// between `last_run` and `reference`. The actual trigger for automatic
/// schedules is event-driven and outside this engine's authority.
///
/// ## Errors
/// Returns [`RecurError::InvalidPattern`] if the pattern carries no minimum
/// interval.
pub fn automatic_spacing_elapsed(
    pattern: &SchedulePattern,
    last_run: DateTime<Utc>,
    reference: DateTime<Utc>,
) -> RecurResult<bool> {
    let minutes = pattern.min_interval_minutes.ok_or_else(|| {
        RecurError::InvalidPattern("automatic schedule requires min_interval_minutes".to_string())
    })?;
    Ok(reference - last_run >= TimeDelta::minutes(i64::from(minutes)))
}

/// Iterator over kept occurrences, ending after the terminal signal.
///
/// Each item is a `Result`: evaluation can fail on DST boundaries, and the
/// iterator fuses itself after the first error.
pub struct Occurrences<'a> {
    pattern: &'a SchedulePattern,
    cursor: RecurrenceCursor,
}

impl<'a> Occurrences<'a> {
    /// ## Summary
    /// Starts iteration from a fresh cursor at the pattern's first anchor.
    ///
    /// ## Errors
    /// Returns [`RecurError::InvalidPattern`] if the pattern fails validation.
    pub fn new(pattern: &'a SchedulePattern) -> RecurResult<Self> {
        Ok(Self {
            pattern,
            cursor: RecurrenceCursor::start(pattern)?,
        })
    }

    /// The underlying cursor, e.g. for persisting resume state.
    #[must_use]
    pub const fn cursor(&self) -> &RecurrenceCursor {
        &self.cursor
    }

    /// ## Summary
    /// Consumes kept occurrences strictly before `reference`, leaving the
    /// iterator parked on the first occurrence at or after it. Mirrors
    /// replaying a schedule that has been running for a while: historical
    /// occurrences count against `max_occurrences` but are not yielded.
    ///
    /// ## Errors
    /// Propagates evaluation errors, and reports an invariant violation if
    /// `max_steps` is exhausted before `reference` is reached.
    pub fn fast_forward_to(
        mut self,
        reference: DateTime<Utc>,
        max_steps: u32,
    ) -> RecurResult<Self> {
        for _ in 0..max_steps {
            if self.cursor.is_terminated() {
                return Ok(self);
            }
            let (occurrence, cursor) = next_occurrence(self.pattern, self.cursor)?;
            if occurrence.kind.is_terminal()
                || occurrence.instant.with_timezone(&Utc) >= reference
            {
                // Leave the cursor behind this occurrence; evaluation is
                // deterministic, so the next call reproduces it.
                return Ok(self);
            }
            self.cursor = cursor;
        }
        Err(RecurError::CoreError(CoreError::InvariantViolation(
            "fast-forward exhausted its catch-up step budget",
        )))
    }
}

impl Iterator for Occurrences<'_> {
    type Item = RecurResult<Occurrence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_terminated() {
            return None;
        }
        match next_occurrence(self.pattern, self.cursor) {
            Ok((occurrence, cursor)) => {
                self.cursor = cursor;
                if occurrence.kind.is_terminal() {
                    None
                } else {
                    Some(Ok(occurrence))
                }
            }
            Err(error) => {
                self.cursor.terminated = true;
                Some(Err(error))
            }
        }
    }
}
