//! Date interval and range normalization.
//!
//! Intervals are resolved against UTC calendar days: a day starts at
//! `00:00:00` and ends at `23:59:59`, both inclusive.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Named, relative date range shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateInterval {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    Last90Days,
    Last180Days,
    Last365Days,
    ThisYear,
    All,
}

impl DateInterval {
    /// Every interval in the order a selector lists them.
    pub const ALL: [DateInterval; 9] = [
        DateInterval::All,
        DateInterval::Today,
        DateInterval::Yesterday,
        DateInterval::Last7Days,
        DateInterval::Last30Days,
        DateInterval::Last90Days,
        DateInterval::Last180Days,
        DateInterval::Last365Days,
        DateInterval::ThisYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateInterval::Today => "today",
            DateInterval::Yesterday => "yesterday",
            DateInterval::Last7Days => "last7Days",
            DateInterval::Last30Days => "last30Days",
            DateInterval::Last90Days => "last90Days",
            DateInterval::Last180Days => "last180Days",
            DateInterval::Last365Days => "last365Days",
            DateInterval::ThisYear => "thisYear",
            DateInterval::All => "all",
        }
    }

    /// Human readable label; `None` for `All`, which callers replace with
    /// their own default text.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            DateInterval::Today => Some("Today"),
            DateInterval::Yesterday => Some("Yesterday"),
            DateInterval::Last7Days => Some("Last 7 days"),
            DateInterval::Last30Days => Some("Last 30 days"),
            DateInterval::Last90Days => Some("Last 90 days"),
            DateInterval::Last180Days => Some("Last 180 days"),
            DateInterval::Last365Days => Some("Last 365 days"),
            DateInterval::ThisYear => Some("This year"),
            DateInterval::All => None,
        }
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateInterval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| format!("unknown date interval `{s}`"))
    }
}

/// Explicit date bounds; an absent bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start_date: Option<DateTime<Utc>>, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        date_range_is_empty(self)
    }
}

/// Either a named interval or an explicit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeOrInterval {
    Interval(DateInterval),
    Range(DateRange),
}

impl From<DateInterval> for DateRangeOrInterval {
    fn from(interval: DateInterval) -> Self {
        DateRangeOrInterval::Interval(interval)
    }
}

impl From<DateRange> for DateRangeOrInterval {
    fn from(range: DateRange) -> Self {
        DateRangeOrInterval::Range(range)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + TimeDelta::days(1) - TimeDelta::seconds(1)
}

fn days_ago(now: DateTime<Utc>, days: i64) -> NaiveDate {
    now.date_naive() - TimeDelta::days(days)
}

/// Resolves `interval` against the current moment.
pub fn interval_to_date_range(interval: DateInterval) -> DateRange {
    interval_to_date_range_at(interval, Utc::now())
}

/// Resolves `interval` against `now`.
///
/// Every interval except `Yesterday` and `All` ends at the end of the day
/// containing `now`.
pub fn interval_to_date_range_at(interval: DateInterval, now: DateTime<Utc>) -> DateRange {
    let today = now.date_naive();
    let ending_today = |start: NaiveDate| DateRange {
        start_date: Some(start_of_day(start)),
        end_date: Some(end_of_day(today)),
    };

    match interval {
        DateInterval::All => DateRange::default(),
        DateInterval::Today => ending_today(today),
        DateInterval::Yesterday => {
            let yesterday = days_ago(now, 1);
            DateRange {
                start_date: Some(start_of_day(yesterday)),
                end_date: Some(end_of_day(yesterday)),
            }
        }
        DateInterval::Last7Days => ending_today(days_ago(now, 7)),
        DateInterval::Last30Days => ending_today(days_ago(now, 30)),
        DateInterval::Last90Days => ending_today(days_ago(now, 90)),
        DateInterval::Last180Days => ending_today(days_ago(now, 180)),
        DateInterval::Last365Days => ending_today(days_ago(now, 365)),
        DateInterval::ThisYear => ending_today(today.with_ordinal(1).unwrap_or(today)),
    }
}

pub fn date_range_is_empty(range: &DateRange) -> bool {
    range.start_date.is_none() && range.end_date.is_none()
}

pub fn range_is_interval(value: &DateRangeOrInterval) -> bool {
    matches!(value, DateRangeOrInterval::Interval(_))
}

/// Label for a selector button; `None` means "use the default text".
pub fn range_or_interval_to_string(value: Option<&DateRangeOrInterval>) -> Option<String> {
    match value? {
        DateRangeOrInterval::Interval(interval) => interval.label().map(ToOwned::to_owned),
        DateRangeOrInterval::Range(range) => range_to_string(range),
    }
}

fn range_to_string(range: &DateRange) -> Option<String> {
    let format = |date: DateTime<Utc>| date.format(DATE_FORMAT).to_string();
    match (range.start_date, range.end_date) {
        (None, None) => None,
        (Some(start), None) => Some(format!("Since {}", format(start))),
        (None, Some(end)) => Some(format!("Until {}", format(end))),
        (Some(start), Some(end)) => Some(format!("{} - {}", format(start), format(end))),
    }
}

/// Inclusive bounds check; a missing bound never excludes a date.
pub fn is_between(
    date: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.map_or(true, |start| date >= start) && end.map_or(true, |end| date <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn today_spans_the_whole_utc_day() {
        let range = interval_to_date_range_at(DateInterval::Today, at(2024, 3, 15, 10, 0, 0));
        assert_eq!(range.start_date, Some(at(2024, 3, 15, 0, 0, 0)));
        assert_eq!(range.end_date, Some(at(2024, 3, 15, 23, 59, 59)));
    }

    #[test]
    fn yesterday_ends_before_today() {
        let range =
            interval_to_date_range_at(DateInterval::Yesterday, at(2024, 3, 1, 0, 30, 0));
        assert_eq!(range.start_date, Some(at(2024, 2, 29, 0, 0, 0)));
        assert_eq!(range.end_date, Some(at(2024, 2, 29, 23, 59, 59)));
    }

    #[test]
    fn last_n_days_start_n_days_back_and_end_today() {
        let now = at(2024, 3, 15, 10, 0, 0);
        let range = interval_to_date_range_at(DateInterval::Last7Days, now);
        assert_eq!(range.start_date, Some(at(2024, 3, 8, 0, 0, 0)));
        assert_eq!(range.end_date, Some(at(2024, 3, 15, 23, 59, 59)));

        let range = interval_to_date_range_at(DateInterval::Last30Days, now);
        assert_eq!(range.start_date, Some(at(2024, 2, 14, 0, 0, 0)));
    }

    #[test]
    fn this_year_starts_on_january_first() {
        let range = interval_to_date_range_at(DateInterval::ThisYear, at(2024, 3, 15, 10, 0, 0));
        assert_eq!(range.start_date, Some(at(2024, 1, 1, 0, 0, 0)));
        assert_eq!(range.end_date, Some(at(2024, 3, 15, 23, 59, 59)));
    }

    #[test]
    fn all_is_the_empty_range() {
        let range = interval_to_date_range_at(DateInterval::All, at(2024, 3, 15, 10, 0, 0));
        assert!(date_range_is_empty(&range));
    }

    #[test]
    fn intervals_parse_from_their_names() {
        for interval in DateInterval::ALL {
            assert_eq!(interval.as_str().parse::<DateInterval>(), Ok(interval));
        }
        assert!("lastWeek".parse::<DateInterval>().is_err());
    }

    #[test]
    fn discriminates_intervals_from_ranges() {
        assert!(range_is_interval(&DateInterval::Last7Days.into()));
        let range = DateRange::new(Some(at(2024, 1, 1, 0, 0, 0)), None);
        assert!(!range_is_interval(&range.into()));
    }

    #[test]
    fn renders_labels() {
        let start = at(2024, 1, 2, 5, 0, 0);
        let end = at(2024, 2, 3, 5, 0, 0);
        let label = |value: DateRangeOrInterval| range_or_interval_to_string(Some(&value));

        assert_eq!(range_or_interval_to_string(None), None);
        assert_eq!(label(DateInterval::All.into()), None);
        assert_eq!(label(DateInterval::Last30Days.into()).as_deref(), Some("Last 30 days"));
        assert_eq!(label(DateRange::default().into()), None);
        assert_eq!(
            label(DateRange::new(Some(start), None).into()).as_deref(),
            Some("Since 2024-01-02")
        );
        assert_eq!(
            label(DateRange::new(None, Some(end)).into()).as_deref(),
            Some("Until 2024-02-03")
        );
        assert_eq!(
            label(DateRange::new(Some(start), Some(end)).into()).as_deref(),
            Some("2024-01-02 - 2024-02-03")
        );
    }

    #[test]
    fn is_between_is_inclusive_and_open_ended() {
        let d1 = at(2024, 1, 1, 0, 0, 0);
        let d2 = at(2024, 1, 31, 0, 0, 0);
        assert!(is_between(d1, Some(d1), Some(d2)));
        assert!(is_between(d2, Some(d1), Some(d2)));
        assert!(!is_between(d2 + TimeDelta::seconds(1), Some(d1), Some(d2)));
        assert!(!is_between(d1 - TimeDelta::seconds(1), Some(d1), None));
        assert!(is_between(d1 - TimeDelta::days(400), None, Some(d2)));
        assert!(is_between(d1, None, None));
    }
}
