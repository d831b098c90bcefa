use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::models::recurrence::RecurrenceRule;
use crate::utils::date::{localize, OCCURRENCE_FORMAT};

use super::normalize::complete_rrule;
use super::{byday, daily, monthday};

/// Ceiling on termination checks per computation.
pub const DEFAULT_CYCLE_LIMIT: usize = 100_000;

/// Which iteration drives a normalized rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MonthDay,
    ByDay,
    Fallback,
}

impl Strategy {
    pub fn for_rule(rule: &RecurrenceRule) -> Self {
        if !rule.by_month_day.is_empty() {
            Strategy::MonthDay
        } else if !rule.by_day.is_empty() {
            Strategy::ByDay
        } else {
            Strategy::Fallback
        }
    }
}

/// Expands one recurrence rule into concrete occurrences.
///
/// Every occurrence carries the start date's time-of-day and is expressed as
/// wall-clock time in the start date's timezone.
///
/// # Examples
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::UTC;
/// use rrule_calc::services::recurrence::{parse_rule, RecurrenceCalculator};
///
/// let start = UTC.with_ymd_and_hms(1997, 9, 2, 9, 0, 0).unwrap();
/// let mut calculator = RecurrenceCalculator::new(parse_rule("FREQ=DAILY;COUNT=3"), start, None);
///
/// assert_eq!(
///     calculator.compute(),
///     vec!["1997-09-02 09:00:00", "1997-09-03 09:00:00", "1997-09-04 09:00:00"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RecurrenceCalculator {
    rule: RecurrenceRule,
    start: NaiveDateTime,
    timezone: Tz,
    end: Option<NaiveDateTime>,
    exceptions: Vec<NaiveDate>,
    additions: Vec<NaiveDate>,
    cycle_limit: usize,
    effective_end: Option<NaiveDateTime>,
    days: BTreeSet<NaiveDateTime>,
    cycles: usize,
}

impl RecurrenceCalculator {
    pub fn new(rule: RecurrenceRule, start: DateTime<Tz>, end: Option<DateTime<Tz>>) -> Self {
        let timezone = start.timezone();
        Self {
            rule,
            start: start.naive_local(),
            timezone,
            end: end.map(|end| end.with_timezone(&timezone).naive_local()),
            exceptions: Vec::new(),
            additions: Vec::new(),
            cycle_limit: DEFAULT_CYCLE_LIMIT,
            effective_end: None,
            days: BTreeSet::new(),
            cycles: 0,
        }
    }

    /// Dates to leave out of the series, compared by day.
    pub fn with_exceptions(mut self, exceptions: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.exceptions = exceptions.into_iter().collect();
        self
    }

    /// Extra dates to add to the series at the start date's time-of-day.
    pub fn with_additions(mut self, additions: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.additions = additions.into_iter().collect();
        self
    }

    pub fn with_cycle_limit(mut self, cycle_limit: usize) -> Self {
        self.cycle_limit = cycle_limit;
        self
    }

    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The earlier of the end date and the rule's `UNTIL`, if either is set.
    pub fn effective_end(&self) -> Option<NaiveDateTime> {
        let until = self.rule.until.map(|until| until.end_in(self.timezone));
        match (self.end, until) {
            (Some(end), Some(until)) => Some(end.min(until)),
            (end, until) => end.or(until),
        }
    }

    /// Occurrences formatted as `YYYY-MM-DD HH:MM:SS`, ascending.
    pub fn compute(&mut self) -> Vec<String> {
        self.compute_formatted(OCCURRENCE_FORMAT)
    }

    pub fn compute_formatted(&mut self, format: &str) -> Vec<String> {
        self.compute_naive()
            .iter()
            .map(|dt| dt.format(format).to_string())
            .collect()
    }

    /// Occurrences attached to the start date's timezone.
    pub fn compute_localized(&mut self) -> Vec<DateTime<Tz>> {
        let timezone = self.timezone;
        self.compute_naive()
            .into_iter()
            .filter_map(|dt| localize(dt, timezone))
            .collect()
    }

    /// Occurrences as wall-clock values, ascending and duplicate-free.
    pub fn compute_naive(&mut self) -> Vec<NaiveDateTime> {
        self.days.clear();
        self.cycles = 0;
        self.effective_end = self.effective_end();

        if self.rule.is_disabled() {
            log::debug!("Rule '{}' is disabled, nothing to expand", self.rule);
            return Vec::new();
        }

        if self.effective_end.is_none() && self.rule.count.is_none() {
            log::debug!(
                "Rule '{}' has neither an end date nor COUNT, refusing to expand",
                self.rule
            );
            return Vec::new();
        }

        let rule = complete_rrule(&self.rule, self.start.date());

        // RFC 2445 examples always list the start date, whether or not it
        // matches the rule.
        self.days.insert(self.start);

        let strategy = Strategy::for_rule(&rule);
        log::debug!("Expanding '{}' with {:?} strategy", rule, strategy);

        match strategy {
            Strategy::MonthDay => monthday::generate(self, &rule),
            Strategy::ByDay => byday::generate(self, &rule),
            Strategy::Fallback => daily::generate(self, &rule),
        }

        let time = self.start.time();
        for addition in &self.additions {
            self.days.insert(addition.and_time(time));
        }

        self.days.iter().copied().collect()
    }

    /// Admission filter: record `date` if it passes every rule constraint.
    ///
    /// Returns `true` when the date was newly added.
    pub(super) fn add_current_day(&mut self, rule: &RecurrenceRule, date: NaiveDate) -> bool {
        if self.count_reached(rule) {
            return false;
        }

        let candidate = date.and_time(self.start.time());

        if self.effective_end.is_some_and(|end| candidate > end) {
            return false;
        }

        if candidate < self.start {
            return false;
        }

        if self.exceptions.contains(&date) {
            return false;
        }

        if !rule.by_day.is_empty() && !rule.by_day.iter().any(|d| d.weekday == date.weekday()) {
            return false;
        }

        if !rule.by_month.is_empty() && !rule.by_month.contains(&date.month()) {
            return false;
        }

        // Negative month days were targeted exactly by the month-day walk.
        if !rule.by_month_day.is_empty()
            && rule.by_month_day.iter().all(|&day| day > 0)
            && !rule.by_month_day.contains(&(date.day() as i32))
        {
            return false;
        }

        self.days.insert(candidate)
    }

    /// Termination test, counted against the cycle ceiling.
    pub(super) fn is_finished(&mut self, rule: &RecurrenceRule, current_date: NaiveDate) -> bool {
        self.cycles += 1;

        if self.count_reached(rule) {
            return true;
        }

        if self
            .effective_end
            .is_some_and(|end| current_date.and_time(self.start.time()) > end)
        {
            return true;
        }

        if self.cycles > self.cycle_limit {
            log::warn!(
                "Rule '{}' stopped after {} cycles with {} occurrences",
                rule,
                self.cycle_limit,
                self.days.len()
            );
            return true;
        }

        false
    }

    fn count_reached(&self, rule: &RecurrenceRule) -> bool {
        rule.count.is_some_and(|count| self.days.len() >= count)
    }
}
