//! Per-period anchor advancement.
//!
//! Moves the scheduled anchor forward by one period for every frequency, and
//! snaps a configured start to the first date a pattern can actually fire.
//! Calendar math stays in naive local time; localization happens at the
//! driver boundary.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{RecurError, RecurResult};
use crate::recur::ordinal;
use crate::recur::pattern::{Frequency, OrdinalSelector, SchedulePattern, WeekdaySelector};
use crate::recur::weekly;

/// ## Summary
/// Advances `last_anchor` by one period of the pattern, preserving the
/// anchor's time of day for calendar frequencies.
///
/// ## Errors
/// Returns [`RecurError::InvalidPattern`] when a field the frequency needs is
/// missing, and for `OneTime` patterns, which have no next anchor.
pub(crate) fn advance(
    pattern: &SchedulePattern,
    last_anchor: NaiveDateTime,
) -> RecurResult<NaiveDateTime> {
    let time = last_anchor.time();
    match pattern.frequency {
        Frequency::OneTime => Err(RecurError::InvalidPattern(
            "one_time schedules have no next anchor".to_string(),
        )),
        Frequency::Daily => Ok(last_anchor + Days::new(1)),
        Frequency::Weekly => {
            let date = weekly::advance(
                last_anchor.date(),
                &pattern.active_weekdays,
                pattern.repeat_every_n_weeks,
                false,
            );
            Ok(date.and_time(time))
        }
        Frequency::Monthly => {
            let day = pattern.require_day_of_month()?;
            Ok(shift_months(last_anchor.date(), pattern.repeat_every_n_months, day).and_time(time))
        }
        Frequency::Yearly => {
            let day = pattern.require_day_of_month()?;
            let month = pattern.require_month()?;
            let date = clamped(last_anchor.year() + 1, month, day).unwrap_or(last_anchor.date());
            Ok(date.and_time(time))
        }
        Frequency::MonthlyRelative => {
            let (ordinal, selector) = pattern.require_relative_selectors()?;
            let month_start = shift_months(last_anchor.date(), pattern.repeat_every_n_months, 1);
            Ok(ordinal::resolve(month_start, ordinal, selector).and_time(time))
        }
        Frequency::YearlyRelative => {
            let (ordinal, selector) = pattern.require_relative_selectors()?;
            let month = pattern.require_month()?;
            let date = resolve_in_named_month(last_anchor.year() + 1, month, ordinal, selector)
                .unwrap_or(last_anchor.date());
            Ok(date.and_time(time))
        }
        Frequency::Continuous => {
            let minutes = pattern.interval_minutes.ok_or_else(|| {
                RecurError::InvalidPattern("continuous schedule requires interval_minutes".to_string())
            })?;
            Ok(last_anchor + TimeDelta::minutes(i64::from(minutes)))
        }
        Frequency::Automatic => {
            // Earliest permissible instant; the actual trigger is event-driven.
            let minutes = pattern.min_interval_minutes.ok_or_else(|| {
                RecurError::InvalidPattern(
                    "automatic schedule requires min_interval_minutes".to_string(),
                )
            })?;
            Ok(last_anchor + TimeDelta::minutes(i64::from(minutes)))
        }
    }
}

/// ## Summary
/// Snaps the configured start date/time to the first instant the pattern can
/// fire: weekly starts move to the first active weekday, monthly/yearly
/// starts move to the configured day, relative starts resolve their ordinal.
///
/// The snapped anchor may precede the configured start time of day within the
/// same period; callers replaying history fast-forward with a reference
/// instant instead.
///
/// ## Errors
/// Returns [`RecurError::InvalidPattern`] when a field the frequency needs is
/// missing.
pub(crate) fn first_anchor(pattern: &SchedulePattern) -> RecurResult<NaiveDateTime> {
    let start_date = pattern.start_date;
    let time = pattern.start_time;
    match pattern.frequency {
        Frequency::OneTime | Frequency::Daily | Frequency::Continuous | Frequency::Automatic => {
            Ok(start_date.and_time(time))
        }
        Frequency::Weekly => {
            let date = weekly::advance(
                start_date,
                &pattern.active_weekdays,
                pattern.repeat_every_n_weeks,
                true,
            );
            Ok(date.and_time(time))
        }
        Frequency::Monthly => {
            let day = pattern.require_day_of_month()?;
            let date = clamped(start_date.year(), start_date.month(), day).unwrap_or(start_date);
            Ok(date.and_time(time))
        }
        Frequency::Yearly => {
            let day = pattern.require_day_of_month()?;
            let month = pattern.require_month()?;
            let date = clamped(start_date.year(), month, day).unwrap_or(start_date);
            Ok(date.and_time(time))
        }
        Frequency::MonthlyRelative => {
            let (ordinal, selector) = pattern.require_relative_selectors()?;
            let month_start = start_date.with_day(1).unwrap_or(start_date);
            Ok(ordinal::resolve(month_start, ordinal, selector).and_time(time))
        }
        Frequency::YearlyRelative => {
            let (ordinal, selector) = pattern.require_relative_selectors()?;
            let month = pattern.require_month()?;
            let date = resolve_in_named_month(start_date.year(), month, ordinal, selector)
                .unwrap_or(start_date);
            Ok(date.and_time(time))
        }
    }
}

/// Moves forward `months` months from `date`, forcing the day of month and
/// clamping it to the target month's length.
fn shift_months(date: NaiveDate, months: u32, day_of_month: u32) -> NaiveDate {
    let total_months = date.month0() + months;
    let year = date.year() + i32::try_from(total_months / 12).unwrap_or(0);
    let month = total_months % 12 + 1;
    clamped(year, month, day_of_month).unwrap_or(date)
}

fn clamped(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(ordinal::days_in_month(year, month)))
}

/// Resolves an ordinal inside the named month of `year`. Preserved from the
/// source system: if the resolved day's month overflowed the named month,
/// the result shifts back seven days to stay inside it. With `Last` resolved
/// by a backward walk the overflow should not occur; the guard stays for
/// fidelity and is pinned by a test rather than generalized.
fn resolve_in_named_month(
    year: i32,
    month: u32,
    ordinal: OrdinalSelector,
    selector: WeekdaySelector,
) -> Option<NaiveDate> {
    let month_start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let resolved = ordinal::resolve(month_start, ordinal, selector);
    if resolved.month() == month {
        Some(resolved)
    } else {
        Some(resolved - Days::new(7))
    }
}
