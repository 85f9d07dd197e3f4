//! Calendar helpers
//!
//! Report ranges are half-open `[start, end)` intervals of calendar dates.
//! Request bounds may arrive as plain dates or as RFC 3339 timestamps; a
//! report dated `d` is in range iff midnight UTC of `d` lies in the
//! requested instant interval, which is what rounding each bound up to the
//! next midnight computes.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::constants::INVALID_MONTH_MESSAGE;
use crate::errors::{Result, TimebookError};

/// Half-open range of calendar dates: `start <= d < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range from inclusive `start` to exclusive `end`.
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Midnight UTC of the first included date.
    pub fn start_instant(&self) -> DateTime<Utc> {
        midnight_utc(self.start)
    }

    /// Midnight UTC of the first excluded date.
    pub fn end_instant(&self) -> DateTime<Utc> {
        midnight_utc(self.end)
    }
}

/// Range covering one calendar month.
///
/// `month_range(2, 2024)` is `[2024-02-01, 2024-03-01)`.
pub fn month_range(month: u32, year: i32) -> Result<DateRange> {
    if !(1..=12).contains(&month) {
        return Err(TimebookError::validation(INVALID_MONTH_MESSAGE));
    }

    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TimebookError::field("year", "is out of range"))?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| TimebookError::field("year", "is out of range"))?;

    Ok(DateRange::new(start, end))
}

/// Parse one bound of a report range.
///
/// Plain dates are taken as-is. Timestamps are rounded up to the next
/// midnight UTC unless they already are one.
pub fn parse_range_bound(field: &str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimebookError::validation(format!("Missing {field}")));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    parse_instant(raw)
        .and_then(ceil_to_date)
        .ok_or_else(|| TimebookError::field(field, "must be an ISO-8601 date"))
}

/// First date on which a non-admin may still create or change reports.
///
/// Normally the 1st of the current month. Until `last_report_day` has
/// passed, the previous month stays open as well.
pub fn edit_cutoff(today: NaiveDate, last_report_day: u32) -> NaiveDate {
    let first_of_month = today.with_day(1).unwrap_or(today);
    if today.day() <= last_report_day {
        first_of_month.checked_sub_months(Months::new(1)).unwrap_or(first_of_month)
    } else {
        first_of_month
    }
}

/// Deserialize a report date sent either as `YYYY-MM-DD` or as a timestamp.
///
/// A timestamp names the UTC calendar date it falls on.
pub fn deserialize_calendar_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_instant(raw).map(|instant| instant.date_naive()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

fn ceil_to_date(instant: DateTime<Utc>) -> Option<NaiveDate> {
    let date = instant.date_naive();
    if instant.time() == NaiveTime::MIN {
        Some(date)
    } else {
        date.succ_opt()
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn february_leap_year() {
        let range = month_range(2, 2024).unwrap();
        assert_eq!(range, DateRange::new(d(2024, 2, 1), d(2024, 3, 1)));
        assert_eq!(range.start_instant().to_rfc3339(), "2024-02-01T00:00:00+00:00");
        assert_eq!(range.end_instant().to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(range.contains(d(2024, 2, 29)));
        assert!(!range.contains(d(2024, 3, 1)));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let range = month_range(12, 2023).unwrap();
        assert_eq!(range.end, d(2024, 1, 1));
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        for month in [0, 13] {
            let err = month_range(month, 2024).unwrap_err();
            assert_eq!(err.to_string(), "Month must be between 1 and 12!");
            assert!(err.is_user_error());
        }
    }

    #[test]
    fn bounds_accept_dates_and_timestamps() {
        assert_eq!(parse_range_bound("startDate", "2024-02-01").unwrap(), d(2024, 2, 1));
        assert_eq!(
            parse_range_bound("startDate", "2024-02-01T00:00:00.000Z").unwrap(),
            d(2024, 2, 1)
        );
        // A report on the 1st starts before 10:00 that day, so it is excluded.
        assert_eq!(parse_range_bound("startDate", "2024-02-01T10:00:00Z").unwrap(), d(2024, 2, 2));
        // Offsets are normalised to UTC first.
        assert_eq!(
            parse_range_bound("endDate", "2024-03-01T01:00:00+01:00").unwrap(),
            d(2024, 3, 1)
        );
        assert_eq!(parse_range_bound("endDate", "2024-03-01T00:00:00").unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn bad_bounds_are_user_errors() {
        let missing = parse_range_bound("startDate", "  ").unwrap_err();
        assert_eq!(missing.to_string(), "Missing startDate");

        let garbage = parse_range_bound("endDate", "yesterday").unwrap_err();
        assert_eq!(garbage.fields().unwrap()["endDate"], "must be an ISO-8601 date");
    }

    #[test]
    fn cutoff_is_first_of_month_after_grace_period() {
        assert_eq!(edit_cutoff(d(2024, 3, 10), 5), d(2024, 3, 1));
        assert_eq!(edit_cutoff(d(2024, 3, 1), 0), d(2024, 3, 1));
    }

    #[test]
    fn cutoff_keeps_previous_month_open_during_grace_period() {
        assert_eq!(edit_cutoff(d(2024, 3, 5), 5), d(2024, 2, 1));
        assert_eq!(edit_cutoff(d(2024, 1, 3), 5), d(2023, 12, 1));
        assert_eq!(edit_cutoff(d(2024, 3, 31), 31), d(2024, 2, 1));
    }
}
