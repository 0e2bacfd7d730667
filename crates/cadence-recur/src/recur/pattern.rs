//! Schedule pattern model.
//!
//! A [`SchedulePattern`] is constructed once from configuration and never
//! mutated. Weekday and month names resolve to numeric offsets through the
//! `chrono` enums at deserialization time; no symbolic lookup happens during
//! evaluation.

use chrono::{Month, NaiveDate, NaiveTime, TimeDelta, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{RecurError, RecurResult};
use crate::recur::driver::Occurrences;

/// How often a schedule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OneTime,
    Daily,
    Weekly,
    Monthly,
    MonthlyRelative,
    Yearly,
    YearlyRelative,
    Continuous,
    Automatic,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::MonthlyRelative => "monthly_relative",
            Self::Yearly => "yearly",
            Self::YearlyRelative => "yearly_relative",
            Self::Continuous => "continuous",
            Self::Automatic => "automatic",
        }
    }

    /// True for frequencies whose anchors move along the calendar rather than
    /// by a fixed minute interval.
    #[must_use]
    pub const fn is_calendar_based(self) -> bool {
        !matches!(self, Self::Continuous | Self::Automatic)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which numbered occurrence of a weekday/weekend day within a month is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalSelector {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl OrdinalSelector {
    /// 1-based position for the counted variants. `Last` has no fixed
    /// position and is resolved by walking back from month end.
    #[must_use]
    pub const fn position(self) -> Option<u32> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }
}

/// Day selector for relative (ordinal) patterns.
///
/// `AnyWeekday` counts only Monday–Friday positions; `WeekendDay` counts only
/// Saturdays and Sundays. The two sequences use different arithmetic and are
/// resolved by separate code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdaySelector {
    Day(Weekday),
    AnyWeekday,
    WeekendDay,
}

/// Sub-occurrences within a single day at fixed spacing, bounded by a daily
/// cutoff time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntradayRepeat {
    /// Spacing between sub-occurrences, in minutes.
    pub every_minutes: u32,

    /// A candidate whose time of day exceeds this cutoff is discarded.
    pub until_time: NaiveTime,
}

impl IntradayRepeat {
    #[must_use]
    pub fn every(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.every_minutes))
    }
}

/// Immutable recurring-schedule definition.
///
/// Construct with [`SchedulePattern::new`] plus the `with_*` builders, then
/// call [`SchedulePattern::validated`] so malformed definitions surface as
/// [`RecurError::InvalidPattern`] up front instead of deep inside advance
/// logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePattern {
    pub frequency: Frequency,

    /// Anchor date in the schedule's own zone.
    pub start_date: NaiveDate,

    /// Anchor time of day in the schedule's own zone.
    pub start_time: NaiveTime,

    /// IANA zone the schedule is defined in.
    pub time_zone: Tz,

    /// Last date on which occurrences may be generated.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Hard cap on the number of kept occurrences.
    #[serde(default)]
    pub max_occurrences: Option<u32>,

    /// Weekly: weekdays the schedule is active on, kept in week order
    /// (Sun → Sat).
    #[serde(default)]
    pub active_weekdays: Vec<Weekday>,

    /// Weekly: interval between active weeks.
    #[serde(default = "default_interval")]
    pub repeat_every_n_weeks: u32,

    /// Monthly/Yearly: calendar day the schedule fires on, clamped to the
    /// target month's length during evaluation.
    #[serde(default)]
    pub day_of_month: Option<u32>,

    /// Monthly and monthly-relative: interval between active months.
    #[serde(default = "default_interval")]
    pub repeat_every_n_months: u32,

    /// Yearly and yearly-relative: the month the schedule fires in.
    #[serde(default)]
    pub month: Option<Month>,

    /// Relative patterns: which occurrence within the month.
    #[serde(default)]
    pub ordinal: Option<OrdinalSelector>,

    /// Relative patterns: which kind of day the ordinal counts.
    #[serde(default)]
    pub weekday_selector: Option<WeekdaySelector>,

    /// Day-of-month values that are always skipped.
    #[serde(default)]
    pub exception_days: Vec<u32>,

    #[serde(default)]
    pub intraday_repeat: Option<IntradayRepeat>,

    /// Continuous: fixed spacing between occurrences, no calendar structure.
    #[serde(default)]
    pub interval_minutes: Option<u32>,

    /// Automatic: minimum spacing between occurrences. The actual trigger is
    /// event-driven and outside this engine's authority.
    #[serde(default)]
    pub min_interval_minutes: Option<u32>,
}

const fn default_interval() -> u32 {
    1
}

impl SchedulePattern {
    #[must_use]
    pub fn new(
        frequency: Frequency,
        start_date: NaiveDate,
        start_time: NaiveTime,
        time_zone: Tz,
    ) -> Self {
        Self {
            frequency,
            start_date,
            start_time,
            time_zone,
            end_date: None,
            max_occurrences: None,
            active_weekdays: Vec::new(),
            repeat_every_n_weeks: 1,
            day_of_month: None,
            repeat_every_n_months: 1,
            month: None,
            ordinal: None,
            weekday_selector: None,
            exception_days: Vec::new(),
            intraday_repeat: None,
            interval_minutes: None,
            min_interval_minutes: None,
        }
    }

    #[must_use]
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn with_max_occurrences(mut self, max: u32) -> Self {
        self.max_occurrences = Some(max);
        self
    }

    #[must_use]
    pub fn with_active_weekdays(mut self, weekdays: Vec<Weekday>, every_n_weeks: u32) -> Self {
        self.active_weekdays = weekdays;
        self.repeat_every_n_weeks = every_n_weeks;
        self
    }

    #[must_use]
    pub fn with_day_of_month(mut self, day: u32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    #[must_use]
    pub fn with_repeat_every_n_months(mut self, months: u32) -> Self {
        self.repeat_every_n_months = months;
        self
    }

    #[must_use]
    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn with_relative(mut self, ordinal: OrdinalSelector, selector: WeekdaySelector) -> Self {
        self.ordinal = Some(ordinal);
        self.weekday_selector = Some(selector);
        self
    }

    #[must_use]
    pub fn with_exception_days(mut self, days: Vec<u32>) -> Self {
        self.exception_days = days;
        self
    }

    #[must_use]
    pub fn with_intraday_repeat(mut self, every_minutes: u32, until_time: NaiveTime) -> Self {
        self.intraday_repeat = Some(IntradayRepeat {
            every_minutes,
            until_time,
        });
        self
    }

    #[must_use]
    pub fn with_interval_minutes(mut self, minutes: u32) -> Self {
        self.interval_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_min_interval_minutes(mut self, minutes: u32) -> Self {
        self.min_interval_minutes = Some(minutes);
        self
    }

    /// ## Summary
    /// Normalizes and validates the pattern, consuming it.
    ///
    /// Active weekdays are sorted into week order (Sun → Sat) and deduplicated;
    /// the advance logic relies on that ordering.
    ///
    /// ## Errors
    /// Returns [`RecurError::InvalidPattern`] for malformed or
    /// self-contradictory definitions.
    pub fn validated(mut self) -> RecurResult<Self> {
        self.active_weekdays
            .sort_by_key(|w| w.num_days_from_sunday());
        self.active_weekdays.dedup();
        self.validate()?;
        Ok(self)
    }

    /// ## Summary
    /// Checks the pattern for contradictions without consuming it.
    ///
    /// ## Errors
    /// Returns [`RecurError::InvalidPattern`] describing the first problem
    /// found.
    pub fn validate(&self) -> RecurResult<()> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(invalid("end_date is before start_date"));
            }
        }
        if self.max_occurrences == Some(0) {
            return Err(invalid("max_occurrences must be at least 1"));
        }
        if self.exception_days.iter().any(|d| !(1..=31).contains(d)) {
            return Err(invalid("exception_days entries must be in 1..=31"));
        }
        if let Some(repeat) = &self.intraday_repeat {
            if repeat.every_minutes == 0 {
                return Err(invalid("intraday_repeat.every_minutes must be at least 1"));
            }
            if !self.frequency.is_calendar_based() {
                return Err(invalid(
                    "intraday_repeat does not apply to continuous/automatic schedules",
                ));
            }
        }

        match self.frequency {
            Frequency::OneTime | Frequency::Daily => Ok(()),
            Frequency::Weekly => {
                if self.active_weekdays.is_empty() {
                    return Err(invalid("weekly schedule requires active_weekdays"));
                }
                if self.repeat_every_n_weeks == 0 {
                    return Err(invalid("repeat_every_n_weeks must be at least 1"));
                }
                Ok(())
            }
            Frequency::Monthly => {
                self.require_day_of_month()?;
                if self.repeat_every_n_months == 0 {
                    return Err(invalid("repeat_every_n_months must be at least 1"));
                }
                Ok(())
            }
            Frequency::Yearly => {
                self.require_day_of_month()?;
                if self.month.is_none() {
                    return Err(invalid("yearly schedule requires month"));
                }
                Ok(())
            }
            Frequency::MonthlyRelative => {
                self.require_relative_selectors()?;
                if self.repeat_every_n_months == 0 {
                    return Err(invalid("repeat_every_n_months must be at least 1"));
                }
                Ok(())
            }
            Frequency::YearlyRelative => {
                self.require_relative_selectors()?;
                if self.month.is_none() {
                    return Err(invalid("yearly_relative schedule requires month"));
                }
                Ok(())
            }
            Frequency::Continuous => match self.interval_minutes {
                Some(m) if m >= 1 => Ok(()),
                _ => Err(invalid("continuous schedule requires interval_minutes >= 1")),
            },
            Frequency::Automatic => match self.min_interval_minutes {
                Some(m) if m >= 1 => Ok(()),
                _ => Err(invalid(
                    "automatic schedule requires min_interval_minutes >= 1",
                )),
            },
        }
    }

    /// ## Summary
    /// Returns an iterator over kept occurrences, starting from a fresh cursor
    /// at the schedule's first anchor.
    ///
    /// ## Errors
    /// Returns [`RecurError::InvalidPattern`] if the pattern fails validation.
    pub fn occurrences(&self) -> RecurResult<Occurrences<'_>> {
        Occurrences::new(self)
    }

    pub(crate) fn require_day_of_month(&self) -> RecurResult<u32> {
        match self.day_of_month {
            Some(day) if (1..=31).contains(&day) => Ok(day),
            Some(day) => Err(invalid(&format!("day_of_month {day} is out of 1..=31"))),
            None => Err(invalid(&format!(
                "{} schedule requires day_of_month",
                self.frequency
            ))),
        }
    }

    pub(crate) fn require_relative_selectors(
        &self,
    ) -> RecurResult<(OrdinalSelector, WeekdaySelector)> {
        match (self.ordinal, self.weekday_selector) {
            (Some(ordinal), Some(selector)) => Ok((ordinal, selector)),
            _ => Err(invalid(&format!(
                "{} schedule requires ordinal and weekday_selector",
                self.frequency
            ))),
        }
    }

    pub(crate) fn require_month(&self) -> RecurResult<u32> {
        self.month.map(|m| m.number_from_month()).ok_or_else(|| {
            invalid(&format!("{} schedule requires month", self.frequency))
        })
    }
}

fn invalid(message: &str) -> RecurError {
    RecurError::InvalidPattern(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use chrono_tz::Tz;

    fn base(frequency: Frequency) -> SchedulePattern {
        SchedulePattern::new(
            frequency,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            Tz::UTC,
        )
    }

    #[test]
    fn weekly_without_weekdays_is_rejected() {
        let err = base(Frequency::Weekly).validated().unwrap_err();
        assert!(matches!(err, RecurError::InvalidPattern(_)));
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let err = base(Frequency::Daily)
            .with_end_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
            .validated()
            .unwrap_err();
        assert!(matches!(err, RecurError::InvalidPattern(_)));
    }

    #[test]
    fn out_of_range_exception_day_is_rejected() {
        let err = base(Frequency::Daily)
            .with_exception_days(vec![0])
            .validated()
            .unwrap_err();
        assert!(matches!(err, RecurError::InvalidPattern(_)));
    }

    #[test]
    fn monthly_requires_day_of_month() {
        let err = base(Frequency::Monthly).validated().unwrap_err();
        assert!(matches!(err, RecurError::InvalidPattern(_)));

        assert!(
            base(Frequency::Monthly)
                .with_day_of_month(15)
                .validated()
                .is_ok()
        );
    }

    #[test]
    fn continuous_requires_interval() {
        assert!(base(Frequency::Continuous).validated().is_err());
        assert!(
            base(Frequency::Continuous)
                .with_interval_minutes(30)
                .validated()
                .is_ok()
        );
    }

    #[test]
    fn intraday_repeat_is_rejected_for_continuous() {
        let err = base(Frequency::Continuous)
            .with_interval_minutes(30)
            .with_intraday_repeat(60, NaiveTime::from_hms_opt(18, 0, 0).unwrap())
            .validated()
            .unwrap_err();
        assert!(matches!(err, RecurError::InvalidPattern(_)));
    }

    #[test]
    fn validated_sorts_weekdays_into_week_order() {
        let pattern = base(Frequency::Weekly)
            .with_active_weekdays(vec![Weekday::Thu, Weekday::Sun, Weekday::Tue], 1)
            .validated()
            .unwrap();
        assert_eq!(
            pattern.active_weekdays,
            vec![Weekday::Sun, Weekday::Tue, Weekday::Thu]
        );
    }

    #[test]
    fn pattern_round_trips_through_serde() {
        let pattern = base(Frequency::Weekly)
            .with_active_weekdays(vec![Weekday::Tue, Weekday::Thu], 1)
            .with_max_occurrences(5)
            .validated()
            .unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        let back: SchedulePattern = serde_json::from_str(&json).unwrap();
        assert_eq!(pattern, back);
    }
}
