//! Weekly active-weekday cursor advancement.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Advances a weekly pattern's cursor by one active weekday.
///
/// `active_weekdays` is treated in week order (Sun → Sat) regardless of input
/// order. Rules, in priority:
/// - parked outside the set (first run, or a hand-constructed date): snap to
///   the first active weekday on or after `current`;
/// - first run on an active weekday: stay put;
/// - not the last entry of the set: move to the next active weekday within
///   the same week;
/// - last entry: wrap to the first active weekday, `repeat_every_n_weeks`
///   weeks later.
///
/// Time of day is owned by the caller and reattached after the date moves.
pub(crate) fn advance(
    current: NaiveDate,
    active_weekdays: &[Weekday],
    repeat_every_n_weeks: u32,
    first_run: bool,
) -> NaiveDate {
    let ordered = week_ordered(active_weekdays);
    let Some(first_active) = ordered.first().copied() else {
        // Validation rejects an empty set; hold position rather than panic.
        return current;
    };
    let current_weekday = current.weekday();

    let Some(index) = ordered.iter().position(|w| *w == current_weekday) else {
        return current + Days::new(u64::from(days_until(current_weekday, first_active)));
    };

    if first_run {
        return current;
    }

    if let Some(next) = ordered.get(index + 1) {
        // Still within the same week; the set is ordered so this is a strict
        // forward move.
        let delta = next.num_days_from_sunday() - current_weekday.num_days_from_sunday();
        return current + Days::new(u64::from(delta));
    }

    let wrap = days_strictly_until(current_weekday, first_active);
    let skipped_weeks = repeat_every_n_weeks.saturating_sub(1);
    current + Days::new(u64::from(wrap) + 7 * u64::from(skipped_weeks))
}

fn week_ordered(weekdays: &[Weekday]) -> Vec<Weekday> {
    let mut ordered = weekdays.to_vec();
    ordered.sort_by_key(|w| w.num_days_from_sunday());
    ordered.dedup();
    ordered
}

/// Days forward from `from` to the next `to`, zero if they are equal.
fn days_until(from: Weekday, to: Weekday) -> u32 {
    (7 + to.num_days_from_sunday() - from.num_days_from_sunday()) % 7
}

/// Days forward from `from` to the next `to`, a full week if they are equal.
fn days_strictly_until(from: Weekday, to: Weekday) -> u32 {
    match days_until(from, to) {
        0 => 7,
        days => days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_run_on_active_weekday_stays_put() {
        // 2024-01-02 is a Tuesday.
        let advanced = advance(date(2024, 1, 2), &[Weekday::Tue, Weekday::Thu], 1, true);
        assert_eq!(advanced, date(2024, 1, 2));
    }

    #[test]
    fn first_run_outside_set_snaps_forward() {
        // 2024-01-03 is a Wednesday; the next active weekday is Thursday.
        let advanced = advance(date(2024, 1, 3), &[Weekday::Tue, Weekday::Thu], 1, true);
        assert_eq!(advanced, date(2024, 1, 4));
    }

    #[test]
    fn first_run_past_last_entry_snaps_into_next_week() {
        // 2024-01-05 is a Friday; Tuesday and Thursday are both behind it.
        let advanced = advance(date(2024, 1, 5), &[Weekday::Tue, Weekday::Thu], 1, true);
        assert_eq!(advanced, date(2024, 1, 9));
    }

    #[test]
    fn advances_within_the_same_week() {
        let advanced = advance(date(2024, 1, 2), &[Weekday::Tue, Weekday::Thu], 1, false);
        assert_eq!(advanced, date(2024, 1, 4));
    }

    #[test]
    fn wraps_to_first_weekday_of_next_week() {
        let advanced = advance(date(2024, 1, 4), &[Weekday::Tue, Weekday::Thu], 1, false);
        assert_eq!(advanced, date(2024, 1, 9));
    }

    #[test]
    fn wrap_skips_inactive_weeks() {
        // Single-entry set with a two-week interval: Monday to Monday a
        // fortnight later.
        let advanced = advance(date(2024, 1, 1), &[Weekday::Mon], 2, false);
        assert_eq!(advanced, date(2024, 1, 15));
    }

    #[test]
    fn input_order_does_not_matter() {
        let advanced = advance(date(2024, 1, 2), &[Weekday::Thu, Weekday::Tue], 1, false);
        assert_eq!(advanced, date(2024, 1, 4));
    }
}
