//! End-to-end evaluation tests: concrete schedules driven through the public
//! API, plus sequence-level properties.


use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::recur::{Frequency, SchedulePattern};

pub(crate) fn pattern(frequency: Frequency, y: i32, m: u32, d: u32, h: u32) -> SchedulePattern {
    SchedulePattern::new(
        frequency,
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
        Tz::UTC,
    )
}

pub(crate) fn kept(pattern: &SchedulePattern, limit: usize) -> Vec<DateTime<Tz>> {
    pattern
        .occurrences()
        .unwrap()
        .take(limit)
        .map(|occurrence| occurrence.unwrap().instant)
        .collect()
}

pub(crate) fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
        .and_local_timezone(Tz::UTC)
        .unwrap()
}
