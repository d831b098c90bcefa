// Test fixtures - reusable test data
// Provides consistent start dates and expansion helpers across all test files

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use rrule_calc::services::recurrence::{parse_rule, RecurrenceCalculator};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Returns a UTC start at the given date and hour
    pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Tz> {
        chrono_tz::UTC
            .with_ymd_and_hms(year, month, day, hour, 0, 0)
            .unwrap()
    }

    /// Returns Sep 2, 1997 at 09:00 UTC (the RFC 2445 example start, a Tuesday)
    pub fn rfc_start() -> DateTime<Tz> {
        utc(1997, 9, 2, 9)
    }

    /// Returns Sep 2, 1997 at 09:00 in New York, as the RFC examples are written
    pub fn rfc_start_new_york() -> DateTime<Tz> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(1997, 9, 2, 9, 0, 0)
            .unwrap()
    }

    /// Returns the last second of the given day in UTC
    pub fn end_of(year: i32, month: u32, day: u32) -> DateTime<Tz> {
        chrono_tz::UTC
            .with_ymd_and_hms(year, month, day, 23, 59, 59)
            .unwrap()
    }

    pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

/// Expands `rule` and returns the formatted occurrences
pub fn expand(rule: &str, start: DateTime<Tz>, end: Option<DateTime<Tz>>) -> Vec<String> {
    RecurrenceCalculator::new(parse_rule(rule), start, end).compute()
}

/// Formats `YYYY-MM-DD` dates as occurrences at 09:00:00
pub fn at_nine(days: &[&str]) -> Vec<String> {
    days.iter().map(|day| format!("{} 09:00:00", day)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    #[test]
    fn test_fixture_dates_are_valid() {
        assert_eq!(dates::rfc_start().weekday(), Weekday::Tue);
        assert_eq!(dates::rfc_start_new_york().weekday(), Weekday::Tue);
        assert_eq!(dates::end_of(1997, 12, 31).day(), 31);
    }

    #[test]
    fn test_at_nine_formats() {
        assert_eq!(at_nine(&["1997-09-02"]), vec!["1997-09-02 09:00:00"]);
    }
}
