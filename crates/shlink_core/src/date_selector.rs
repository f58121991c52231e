use chrono::{DateTime, Utc};

use crate::dates::{
    interval_to_date_range_at, range_or_interval_to_string, DateInterval, DateRange,
    DateRangeOrInterval,
};

/// Selection held by a date range picker.
///
/// At most one of the active interval and the active custom range drives the
/// label; every change returns the range the caller should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRangeSelection {
    active_interval: Option<DateInterval>,
    active_range: Option<DateRange>,
}

impl DateRangeSelection {
    pub fn new(initial: Option<DateRangeOrInterval>) -> Self {
        match initial {
            Some(DateRangeOrInterval::Interval(interval)) => Self {
                active_interval: Some(interval),
                active_range: None,
            },
            Some(DateRangeOrInterval::Range(range)) => Self {
                active_interval: None,
                active_range: Some(range),
            },
            None => Self::default(),
        }
    }

    pub fn active_interval(&self) -> Option<DateInterval> {
        self.active_interval
    }

    pub fn active_range(&self) -> Option<DateRange> {
        self.active_range
    }

    pub fn set_start_date(&mut self, start_date: Option<DateTime<Utc>>) -> DateRange {
        let current = self.active_range.unwrap_or_default();
        self.apply_range(DateRange {
            start_date,
            ..current
        })
    }

    pub fn set_end_date(&mut self, end_date: Option<DateTime<Utc>>) -> DateRange {
        let current = self.active_range.unwrap_or_default();
        self.apply_range(DateRange {
            end_date,
            ..current
        })
    }

    pub fn select_interval(&mut self, interval: DateInterval) -> DateRange {
        self.select_interval_at(interval, Utc::now())
    }

    pub fn select_interval_at(&mut self, interval: DateInterval, now: DateTime<Utc>) -> DateRange {
        self.active_interval = Some(interval);
        self.active_range = None;
        interval_to_date_range_at(interval, now)
    }

    pub fn label(&self, default_text: &str) -> String {
        let active = self
            .active_interval
            .map(DateRangeOrInterval::Interval)
            .or(self.active_range.map(DateRangeOrInterval::Range));
        range_or_interval_to_string(active.as_ref()).unwrap_or_else(|| default_text.to_string())
    }

    fn apply_range(&mut self, range: DateRange) -> DateRange {
        // Clearing both bounds is the same as picking "all".
        self.active_interval = range.is_empty().then_some(DateInterval::All);
        self.active_range = Some(range);
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn initial_interval_drives_the_label() {
        let selection = DateRangeSelection::new(Some(DateInterval::Last7Days.into()));
        assert_eq!(selection.active_interval(), Some(DateInterval::Last7Days));
        assert_eq!(selection.active_range(), None);
        assert_eq!(selection.label("All visits"), "Last 7 days");
    }

    #[test]
    fn custom_bounds_merge_into_the_active_range() {
        let mut selection = DateRangeSelection::new(Some(DateInterval::Today.into()));

        let range = selection.set_start_date(Some(date(1)));
        assert_eq!(range, DateRange::new(Some(date(1)), None));
        assert_eq!(selection.active_interval(), None);

        let range = selection.set_end_date(Some(date(9)));
        assert_eq!(range, DateRange::new(Some(date(1)), Some(date(9))));
        assert_eq!(selection.label("All visits"), "2024-05-01 - 2024-05-09");
    }

    #[test]
    fn clearing_both_bounds_selects_all() {
        let mut selection = DateRangeSelection::new(Some(DateRange::new(Some(date(1)), None).into()));
        let range = selection.set_start_date(None);

        assert!(range.is_empty());
        assert_eq!(selection.active_interval(), Some(DateInterval::All));
        assert_eq!(selection.label("All visits"), "All visits");
    }

    #[test]
    fn selecting_an_interval_clears_the_range() {
        let mut selection = DateRangeSelection::new(Some(DateRange::new(Some(date(1)), None).into()));
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let range = selection.select_interval_at(DateInterval::Yesterday, now);

        assert_eq!(range.start_date, Some(date(9)));
        assert_eq!(selection.active_range(), None);
        assert_eq!(selection.label("All visits"), "Yesterday");
    }
}
