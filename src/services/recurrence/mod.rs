//! RFC 2445 recurrence rule expansion.
//!
//! [`RecurrenceCalculator`] does the work on typed inputs; [`expand`] is the
//! forgiving string-level entry point used for calendar feed data, where any
//! unusable input simply produces no occurrences.

mod byday;
mod calculator;
mod daily;
mod monthday;
mod normalize;
mod parser;
mod utils;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::settings::CalculatorSettings;
use crate::utils::date::{localize, parse_date_value, parse_day, parse_timezone, DateParseError};

pub use calculator::{RecurrenceCalculator, Strategy, DEFAULT_CYCLE_LIMIT};
pub use normalize::complete_rrule;
pub use parser::parse_rule;

/// String-level recurrence request, as read from a feed or the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceRequest {
    /// RRULE value, with or without the `RRULE:` prefix.
    pub rule: String,
    pub start: Option<String>,
    /// A date-only end covers the whole of that day.
    pub end: Option<String>,
    /// IANA zone for `start` and `end`; falls back to the settings default.
    pub timezone: Option<String>,
    pub exceptions: Vec<String>,
    pub additions: Vec<String>,
}

impl RecurrenceRequest {
    pub fn new(rule: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            start: Some(start.into()),
            ..Self::default()
        }
    }

    /// Build a calculator for this request.
    ///
    /// Unreadable exception and addition entries are skipped; an unreadable
    /// start, end or timezone is an error.
    pub fn calculator(
        &self,
        start: &str,
        settings: &CalculatorSettings,
    ) -> Result<RecurrenceCalculator, DateParseError> {
        let zone_name = self
            .timezone
            .as_deref()
            .unwrap_or(settings.default_timezone.as_str());
        let timezone = parse_timezone(zone_name)?;

        let start = resolve(parse_date_value(start)?.start_in(timezone), timezone)?;
        let end = match self.end.as_deref() {
            Some(end) => Some(resolve(parse_date_value(end)?.end_in(timezone), timezone)?),
            None => None,
        };

        Ok(RecurrenceCalculator::new(parse_rule(&self.rule), start, end)
            .with_exceptions(parse_days(&self.exceptions, "exception"))
            .with_additions(parse_days(&self.additions, "addition"))
            .with_cycle_limit(settings.cycle_limit))
    }
}

fn resolve(naive: NaiveDateTime, timezone: Tz) -> Result<DateTime<Tz>, DateParseError> {
    localize(naive, timezone).ok_or_else(|| DateParseError::InvalidDate(naive.to_string()))
}

fn parse_days(values: &[String], kind: &str) -> Vec<NaiveDate> {
    values
        .iter()
        .filter_map(|value| match parse_day(value) {
            Ok(date) => Some(date),
            Err(err) => {
                log::warn!("Skipping {} date: {}", kind, err);
                None
            }
        })
        .collect()
}

/// Expand a request into formatted occurrences.
///
/// Returns an empty list when the request has no start date or any of its
/// core values cannot be read.
pub fn expand(request: &RecurrenceRequest, settings: &CalculatorSettings) -> Vec<String> {
    let Some(start) = request.start.as_deref() else {
        log::debug!("Recurrence request without a start date");
        return Vec::new();
    };

    match request.calculator(start, settings) {
        Ok(mut calculator) => calculator.compute_formatted(&settings.output_format),
        Err(err) => {
            log::warn!("Cannot expand recurrence '{}': {}", request.rule, err);
            Vec::new()
        }
    }
}

/// One occurrence of an event together with its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OccurrenceSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Expand occurrences and give each the event's duration.
pub fn expand_spans(calculator: &mut RecurrenceCalculator, duration: Duration) -> Vec<OccurrenceSpan> {
    calculator
        .compute_naive()
        .into_iter()
        .map(|start| OccurrenceSpan {
            start,
            end: start + duration,
        })
        .collect()
}
