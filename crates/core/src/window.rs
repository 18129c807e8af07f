use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone,
};
use serde::{Deserialize, Serialize};

use crate::TimeWindow;

/// Half-open millisecond range `[start, end)`. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl WindowBounds {
    pub const UNBOUNDED: WindowBounds = WindowBounds {
        start: None,
        end: None,
    };

    pub fn between(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Calendar bounds of `window` around `now`, in the time zone of `now`.
    ///
    /// Weeks start on Monday (ISO 8601). Months and years start on their
    /// first day at local midnight.
    pub fn resolve<Tz: TimeZone>(window: TimeWindow, now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let (first, next) = match window {
            TimeWindow::Total => return Self::UNBOUNDED,
            TimeWindow::Daily => (today, add_days(today, 1)),
            TimeWindow::Weekly => {
                let monday =
                    today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (monday, add_days(monday, 7))
            }
            TimeWindow::Monthly => {
                let first = today - Duration::days(today.day0() as i64);
                let next = first
                    .checked_add_months(Months::new(1))
                    .unwrap_or(NaiveDate::MAX);
                (first, next)
            }
            TimeWindow::Yearly => {
                let first = today - Duration::days(today.ordinal0() as i64);
                let next = first
                    .checked_add_months(Months::new(12))
                    .unwrap_or(NaiveDate::MAX);
                (first, next)
            }
        };
        Self::between(
            start_of_day(&tz, first).timestamp_millis(),
            start_of_day(&tz, next).timestamp_millis(),
        )
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start.is_none_or(|start| timestamp >= start)
            && self.end.is_none_or(|end| timestamp < end)
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(value) => value,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight falls into a DST gap; the day starts at the first valid instant.
        LocalResult::None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn utc_ms(value: &str) -> i64 {
        DateTime::parse_from_rfc3339(value)
            .expect("timestamp")
            .timestamp_millis()
    }

    #[test]
    fn daily_covers_calendar_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let bounds = WindowBounds::resolve(TimeWindow::Daily, &now);
        assert_eq!(bounds.start, Some(utc_ms("2025-06-15T00:00:00Z")));
        assert_eq!(bounds.end, Some(utc_ms("2025-06-16T00:00:00Z")));
        assert!(bounds.contains(now.timestamp_millis() - 60_000));
        assert!(!bounds.contains(now.timestamp_millis() - 25 * 3_600_000));
    }

    #[test]
    fn weekly_starts_on_monday() {
        // 2025-06-15 is a Sunday.
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 23, 30, 0).unwrap();
        let bounds = WindowBounds::resolve(TimeWindow::Weekly, &now);
        assert_eq!(bounds.start, Some(utc_ms("2025-06-09T00:00:00Z")));
        assert_eq!(bounds.end, Some(utc_ms("2025-06-16T00:00:00Z")));

        let monday = Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap();
        let bounds = WindowBounds::resolve(TimeWindow::Weekly, &monday);
        assert_eq!(bounds.start, Some(utc_ms("2025-06-16T00:00:00Z")));
    }

    #[test]
    fn monthly_and_yearly_follow_calendar() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 8, 0, 0).unwrap();
        let month = WindowBounds::resolve(TimeWindow::Monthly, &now);
        assert_eq!(month.start, Some(utc_ms("2024-12-01T00:00:00Z")));
        assert_eq!(month.end, Some(utc_ms("2025-01-01T00:00:00Z")));

        let year = WindowBounds::resolve(TimeWindow::Yearly, &now);
        assert_eq!(year.start, Some(utc_ms("2024-01-01T00:00:00Z")));
        assert_eq!(year.end, Some(utc_ms("2025-01-01T00:00:00Z")));
    }

    #[test]
    fn bounds_use_time_zone_of_now() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let bounds = WindowBounds::resolve(TimeWindow::Daily, &now);
        assert_eq!(bounds.start, Some(utc_ms("2025-03-09T22:00:00Z")));
        assert_eq!(bounds.end, Some(utc_ms("2025-03-10T22:00:00Z")));
    }

    #[test]
    fn total_is_unbounded() {
        let now = Utc::now();
        let bounds = WindowBounds::resolve(TimeWindow::Total, &now);
        assert_eq!(bounds, WindowBounds::UNBOUNDED);
        assert!(bounds.contains(i64::MIN));
        assert!(bounds.contains(i64::MAX));
    }

    #[test]
    fn end_is_exclusive() {
        let bounds = WindowBounds::between(10, 20);
        assert!(bounds.contains(10));
        assert!(bounds.contains(19));
        assert!(!bounds.contains(20));
        assert!(!bounds.contains(9));
    }
}
