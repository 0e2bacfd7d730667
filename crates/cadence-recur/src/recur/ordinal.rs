//! Ordinal day resolution: "the Nth weekday / weekend day of a month".
//!
//! Three distinct sequences are resolved here and deliberately kept on
//! separate code paths, because what counts as an occurrence differs:
//! - a named weekday (every Friday, say) strides in units of seven days,
//! - `AnyWeekday` counts Monday–Friday positions and applies the
//!   business-day correction,
//! - `WeekendDay` counts only Saturdays and Sundays in calendar order.
//!
//! The resolver never crosses the month boundary itself; callers re-validate
//! the month of the result where that matters.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::recur::pattern::{OrdinalSelector, WeekdaySelector};

/// Resolves the ordinal day in the month containing `month_anchor`.
pub(crate) fn resolve(
    month_anchor: NaiveDate,
    ordinal: OrdinalSelector,
    selector: WeekdaySelector,
) -> NaiveDate {
    match selector {
        WeekdaySelector::Day(weekday) => nth_weekday(month_anchor, ordinal, weekday),
        WeekdaySelector::AnyWeekday => nth_any_weekday(month_anchor, ordinal),
        WeekdaySelector::WeekendDay => nth_weekend_day(month_anchor, ordinal),
    }
}

/// Nth occurrence of a named weekday. The fourth occurrence lands on day 28
/// at the latest, so the counted variants never leave the month.
fn nth_weekday(month_anchor: NaiveDate, ordinal: OrdinalSelector, weekday: Weekday) -> NaiveDate {
    match ordinal.position() {
        Some(n) => {
            let first = month_start(month_anchor);
            let offset = days_between(first.weekday(), weekday);
            first + Days::new(u64::from(offset) + 7 * u64::from(n - 1))
        }
        None => {
            let last = month_end(month_anchor);
            let back = days_between(weekday, last.weekday());
            last - Days::new(u64::from(back))
        }
    }
}

/// Nth Monday–Friday position of the month.
///
/// The counted variants use the offset arithmetic of the source system: the
/// literal computation can overshoot onto a weekend for some month-start
/// layouts, and the business-day correction then pulls the result back to the
/// preceding weekday. `Last` anchors to month end and corrects the same way.
fn nth_any_weekday(month_anchor: NaiveDate, ordinal: OrdinalSelector) -> NaiveDate {
    match ordinal.position() {
        Some(n) => {
            let first = month_start(month_anchor);
            // Sun=1 ..= Sat=7
            let start_weekday = first.weekday().num_days_from_sunday() + 1;
            let mut day_diff = n + (n / 5) * 2;
            if start_weekday == 7 {
                day_diff += 2;
            } else if start_weekday == 1 {
                day_diff += 1;
            } else if start_weekday + n % 5 > 6 {
                day_diff += 2;
            }
            business_day_correction(first + Days::new(u64::from(day_diff - 1)))
        }
        None => business_day_correction(month_end(month_anchor)),
    }
}

/// Nth Saturday-or-Sunday of the month, in calendar order. Every month has at
/// least eight weekend days, so the counted variants always resolve.
fn nth_weekend_day(month_anchor: NaiveDate, ordinal: OrdinalSelector) -> NaiveDate {
    match ordinal.position() {
        Some(n) => {
            let mut day = month_start(month_anchor);
            let mut remaining = n;
            loop {
                if is_weekend(day) {
                    remaining -= 1;
                    if remaining == 0 {
                        return day;
                    }
                }
                day = day + Days::new(1);
            }
        }
        None => {
            let mut day = month_end(month_anchor);
            while !is_weekend(day) {
                day = day - Days::new(1);
            }
            day
        }
    }
}

/// Shifts a weekend result back to the nearest preceding weekday: Saturday
/// moves back one day, Sunday two.
fn business_day_correction(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Days::new(1),
        Weekday::Sun => date - Days::new(2),
        _ => date,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Days from `from` forward to the next `to`, zero if equal.
fn days_between(from: Weekday, to: Weekday) -> u32 {
    (7 + to.num_days_from_sunday() - from.num_days_from_sunday()) % 7
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).unwrap_or(date)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month_start = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month_start
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recur::pattern::{OrdinalSelector, WeekdaySelector};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn third_wednesday_of_january_2024() {
        let resolved = resolve(
            date(2024, 1, 1),
            OrdinalSelector::Third,
            WeekdaySelector::Day(Weekday::Wed),
        );
        assert_eq!(resolved, date(2024, 1, 17));
    }

    #[test]
    fn last_friday_of_january_2024() {
        // January 2024 has 31 days and ends on a Wednesday.
        let resolved = resolve(
            date(2024, 1, 15),
            OrdinalSelector::Last,
            WeekdaySelector::Day(Weekday::Fri),
        );
        assert_eq!(resolved, date(2024, 1, 26));
    }

    #[test]
    fn first_monday_of_september_2024() {
        let resolved = resolve(
            date(2024, 9, 1),
            OrdinalSelector::First,
            WeekdaySelector::Day(Weekday::Mon),
        );
        assert_eq!(resolved, date(2024, 9, 2));
    }

    #[test]
    fn fourth_weekday_never_leaves_the_month() {
        for month in 1..=12 {
            let resolved = nth_weekday(date(2024, month, 1), OrdinalSelector::Fourth, Weekday::Sat);
            assert_eq!(resolved.month(), month);
        }
    }

    #[test]
    fn first_any_weekday_of_june_2024() {
        // June 2024 starts on a Saturday; the first business day is Monday the 3rd.
        let resolved = resolve(date(2024, 6, 1), OrdinalSelector::First, WeekdaySelector::AnyWeekday);
        assert_eq!(resolved, date(2024, 6, 3));
    }

    #[test]
    fn second_any_weekday_of_a_thursday_start_month() {
        // February 2024 starts on a Thursday: the literal offset arithmetic
        // overshoots onto the weekend and the correction pulls it back to
        // Friday the 2nd.
        let resolved = resolve(date(2024, 2, 1), OrdinalSelector::Second, WeekdaySelector::AnyWeekday);
        assert_eq!(resolved, date(2024, 2, 2));
        assert_eq!(resolved.weekday(), Weekday::Fri);
    }

    #[test]
    fn last_any_weekday_corrects_weekend_month_end() {
        // March 2024 ends on a Sunday; the last business day is Friday the 29th.
        let resolved = resolve(date(2024, 3, 1), OrdinalSelector::Last, WeekdaySelector::AnyWeekday);
        assert_eq!(resolved, date(2024, 3, 29));
    }

    #[test]
    fn any_weekday_never_resolves_to_a_weekend() {
        let ordinals = [
            OrdinalSelector::First,
            OrdinalSelector::Second,
            OrdinalSelector::Third,
            OrdinalSelector::Fourth,
            OrdinalSelector::Last,
        ];
        for month in 1..=12 {
            for ordinal in ordinals {
                let resolved = resolve(date(2024, month, 1), ordinal, WeekdaySelector::AnyWeekday);
                assert!(!is_weekend(resolved), "{ordinal:?} of month {month} hit {resolved}");
            }
        }
    }

    #[test]
    fn first_weekend_day_of_june_2024() {
        // June 2024 starts on a Saturday.
        let resolved = resolve(date(2024, 6, 1), OrdinalSelector::First, WeekdaySelector::WeekendDay);
        assert_eq!(resolved, date(2024, 6, 1));
    }

    #[test]
    fn weekend_sequence_counts_saturdays_and_sundays_in_calendar_order() {
        // September 2024 starts on a Sunday: Sun 1, Sat 7, Sun 8, Sat 14.
        let first = resolve(date(2024, 9, 1), OrdinalSelector::First, WeekdaySelector::WeekendDay);
        let second = resolve(date(2024, 9, 1), OrdinalSelector::Second, WeekdaySelector::WeekendDay);
        let third = resolve(date(2024, 9, 1), OrdinalSelector::Third, WeekdaySelector::WeekendDay);
        let fourth = resolve(date(2024, 9, 1), OrdinalSelector::Fourth, WeekdaySelector::WeekendDay);
        assert_eq!(first, date(2024, 9, 1));
        assert_eq!(second, date(2024, 9, 7));
        assert_eq!(third, date(2024, 9, 8));
        assert_eq!(fourth, date(2024, 9, 14));
    }

    #[test]
    fn last_weekend_day_of_a_saturday_start_february() {
        // February 2025 is 28 days and starts on a Saturday; the last weekend
        // day is Sunday the 23rd.
        let resolved = resolve(date(2025, 2, 1), OrdinalSelector::Last, WeekdaySelector::WeekendDay);
        assert_eq!(resolved, date(2025, 2, 23));
        assert!(is_weekend(resolved));
        assert!(resolved <= date(2025, 2, 28));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }
}
