// Date utility functions
// Parsing of the loose date strings calendar feeds carry, and the fixed output format

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Output pattern for computed occurrences.
pub const OCCURRENCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_FORMATS: &[&str] = &["%Y%m%d", "%Y-%m-%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y%m%dT%H%M%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("Invalid date value: {0}")]
    InvalidDate(String),
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// A date or date-time as found in iCalendar values and ISO-like strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// Date without a time, e.g. `19971224` or `1997-12-24`.
    Date(NaiveDate),
    /// Wall-clock time in whatever zone the context supplies.
    Floating(NaiveDateTime),
    /// Absolute UTC time (`Z` suffix).
    Utc(NaiveDateTime),
}

impl DateValue {
    pub fn date(&self) -> NaiveDate {
        match self {
            DateValue::Date(date) => *date,
            DateValue::Floating(dt) | DateValue::Utc(dt) => dt.date(),
        }
    }

    /// Wall-clock value in `tz`. A bare date resolves to its first second.
    pub fn start_in(&self, tz: Tz) -> NaiveDateTime {
        match self {
            DateValue::Date(date) => date.and_time(NaiveTime::MIN),
            DateValue::Floating(dt) => *dt,
            DateValue::Utc(dt) => utc_to_local(*dt, tz),
        }
    }

    /// Wall-clock value in `tz`. A bare date resolves to its last second, so
    /// an end date of `1997-12-31` still admits `1997-12-31 09:00:00`.
    pub fn end_in(&self, tz: Tz) -> NaiveDateTime {
        match self {
            DateValue::Date(date) => end_of_day(*date),
            DateValue::Floating(dt) => *dt,
            DateValue::Utc(dt) => utc_to_local(*dt, tz),
        }
    }

    pub fn to_ical(&self) -> String {
        match self {
            DateValue::Date(date) => date.format("%Y%m%d").to_string(),
            DateValue::Floating(dt) => dt.format("%Y%m%dT%H%M%S").to_string(),
            DateValue::Utc(dt) => dt.format("%Y%m%dT%H%M%SZ").to_string(),
        }
    }
}

pub fn parse_date_value(s: &str) -> Result<DateValue, DateParseError> {
    let trimmed = s.trim();
    let is_utc = trimmed.ends_with('Z') || trimmed.ends_with('z');
    let normalized = trimmed.trim_end_matches(&['Z', 'z'][..]);

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(normalized, format) {
            return Ok(if is_utc {
                DateValue::Utc(dt)
            } else {
                DateValue::Floating(dt)
            });
        }
    }

    if !is_utc {
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(normalized, format) {
                return Ok(DateValue::Date(date));
            }
        }
    }

    Err(DateParseError::InvalidDate(s.to_string()))
}

/// Day-precision parse used for exception and addition lists.
pub fn parse_day(s: &str) -> Result<NaiveDate, DateParseError> {
    parse_date_value(s).map(|value| value.date())
}

pub fn parse_timezone(name: &str) -> Result<Tz, DateParseError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DateParseError::UnknownTimezone(name.to_string()))
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

fn utc_to_local(dt: NaiveDateTime, tz: Tz) -> NaiveDateTime {
    Utc.from_utc_datetime(&dt).with_timezone(&tz).naive_local()
}

/// Attach `tz` to a wall-clock value.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap are moved forward by the gap.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}
