// Recurrence module
// Typed RRULE model (RFC 2445 section 4.3.10)

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;

use crate::utils::date::DateValue;

/// Recurrence frequency (`FREQ`).
///
/// Sub-daily frequencies are not part of this model; the parser drops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// `FREQ=NONE`: the rule is switched off and expands to nothing.
    Disabled,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NONE" => Some(Frequency::Disabled),
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Frequency::Disabled => "NONE",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Whether ordinal `BYDAY` prefixes like `-1SU` mean anything at this frequency.
    pub fn supports_ordinals(self) -> bool {
        matches!(self, Frequency::Monthly | Frequency::Yearly)
    }
}

/// Map an iCal two-letter day code to a weekday.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "SU" => Some(Weekday::Sun),
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "SU",
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
    }
}

/// One `BYDAY` entry: a weekday with an optional signed ordinal.
///
/// `2TH` is the second Thursday of the period, `-1SU` the last Sunday,
/// and a bare `MO` every Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayRule {
    pub ordinal: Option<i32>,
    pub weekday: Weekday,
}

impl WeekdayRule {
    pub fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    pub fn nth(ordinal: i32, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }

    pub fn is_relative(&self) -> bool {
        self.ordinal.is_some()
    }
}

impl fmt::Display for WeekdayRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ordinal) = self.ordinal {
            write!(f, "{}", ordinal)?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

impl FromStr for WeekdayRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
            return Err(format!("Invalid BYDAY value: {}", s));
        }

        let (prefix, code) = s.split_at(s.len() - 2);
        let weekday =
            weekday_from_code(code).ok_or_else(|| format!("Unknown weekday code: {}", code))?;

        if prefix.is_empty() {
            return Ok(Self::every(weekday));
        }

        let ordinal = prefix
            .trim_start_matches('+')
            .parse::<i32>()
            .map_err(|_| format!("Invalid BYDAY ordinal: {}", prefix))?;
        if ordinal == 0 || ordinal.abs() > 53 {
            return Err(format!("BYDAY ordinal out of range: {}", ordinal));
        }

        Ok(Self::nth(ordinal, weekday))
    }
}

/// Structured recurrence rule.
///
/// Parts the engine does not support (`BYSETPOS`, `BYYEARDAY`, ...) are
/// dropped by the parser and never appear here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Option<Frequency>,
    pub interval: Option<u32>,
    pub count: Option<usize>,
    pub until: Option<DateValue>,
    pub by_day: Vec<WeekdayRule>,
    pub by_month_day: Vec<i32>,
    pub by_month: Vec<u32>,
    pub week_start: Option<Weekday>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency: Some(frequency),
            ..Self::default()
        }
    }

    /// True when the rule explicitly expands to nothing (`FREQ=NONE` or `INTERVAL=0`).
    pub fn is_disabled(&self) -> bool {
        self.frequency == Some(Frequency::Disabled) || self.interval == Some(0)
    }

    /// Interval with the RFC default of 1 applied.
    pub fn interval_or_default(&self) -> u32 {
        self.interval.filter(|&i| i > 0).unwrap_or(1)
    }

    pub fn week_start_or_default(&self) -> Weekday {
        self.week_start.unwrap_or(Weekday::Mon)
    }
}

impl FromStr for RecurrenceRule {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(crate::services::recurrence::parse_rule(s))
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(frequency) = self.frequency {
            parts.push(format!("FREQ={}", frequency.code()));
        }
        if let Some(interval) = self.interval {
            parts.push(format!("INTERVAL={}", interval));
        }
        if let Some(count) = self.count {
            parts.push(format!("COUNT={}", count));
        }
        if let Some(ref until) = self.until {
            parts.push(format!("UNTIL={}", until.to_ical()));
        }
        if !self.by_day.is_empty() {
            parts.push(format!("BYDAY={}", join(&self.by_day)));
        }
        if !self.by_month_day.is_empty() {
            parts.push(format!("BYMONTHDAY={}", join(&self.by_month_day)));
        }
        if !self.by_month.is_empty() {
            parts.push(format!("BYMONTH={}", join(&self.by_month)));
        }
        if let Some(week_start) = self.week_start {
            parts.push(format!("WKST={}", weekday_code(week_start)));
        }

        f.write_str(&parts.join(";"))
    }
}
