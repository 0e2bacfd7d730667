//! Intraday repeat expansion: sub-occurrences within a single day.

use chrono::NaiveDateTime;

use crate::recur::pattern::IntradayRepeat;

/// Produces the next intraday candidate after `last_instant`, and whether the
/// day's repeat window is exhausted.
///
/// A candidate is exhausted when its time of day exceeds the cutoff, or when
/// the interval walks past midnight; exhausted candidates are discarded and
/// the caller falls through to the next calendar day's anchor.
pub(crate) fn next(repeat: &IntradayRepeat, last_instant: NaiveDateTime) -> (NaiveDateTime, bool) {
    let candidate = last_instant + repeat.every();
    let exhausted = candidate.date() != last_instant.date() || candidate.time() > repeat.until_time;
    (candidate, exhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn repeat(every_minutes: u32, until: (u32, u32)) -> IntradayRepeat {
        IntradayRepeat {
            every_minutes,
            until_time: NaiveTime::from_hms_opt(until.0, until.1, 0).unwrap(),
        }
    }

    #[test]
    fn steps_by_the_configured_interval() {
        let (candidate, exhausted) = next(&repeat(240, (18, 0)), at(6, 0));
        assert_eq!(candidate, at(10, 0));
        assert!(!exhausted);
    }

    #[test]
    fn candidate_on_the_cutoff_is_kept() {
        let (candidate, exhausted) = next(&repeat(240, (18, 0)), at(14, 0));
        assert_eq!(candidate, at(18, 0));
        assert!(!exhausted);
    }

    #[test]
    fn candidate_past_the_cutoff_is_exhausted() {
        let (_, exhausted) = next(&repeat(240, (18, 0)), at(18, 0));
        assert!(exhausted);
    }

    #[test]
    fn crossing_midnight_is_exhausted_even_below_the_cutoff() {
        // 23:30 + 90m = 01:00 next day, which is below an 18:00 cutoff only
        // if the date is ignored.
        let (_, exhausted) = next(&repeat(90, (18, 0)), at(23, 30));
        assert!(exhausted);
    }
}
