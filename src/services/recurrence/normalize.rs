use chrono::{Datelike, NaiveDate};

use crate::models::recurrence::{Frequency, RecurrenceRule, WeekdayRule};

/// Fill in the defaults and imputed parts of a rule before it is expanded.
///
/// Follows RFC 2445 section 4.3.10: a rule without BYDAY or BYMONTHDAY takes
/// them from the start date, so every rule ends up driven by exactly one of
/// BYMONTHDAY, BYDAY, or plain daily repetition.
pub fn complete_rrule(rule: &RecurrenceRule, start: NaiveDate) -> RecurrenceRule {
    let mut rule = rule.clone();

    let mut frequency = rule.frequency.unwrap_or(Frequency::Daily);
    rule.interval = Some(rule.interval_or_default());

    if !rule.by_month_day.is_empty() && matches!(frequency, Frequency::Daily | Frequency::Weekly) {
        frequency = Frequency::Monthly;
    } else if !rule.by_day.is_empty() && frequency == Frequency::Daily {
        frequency = Frequency::Weekly;
    }

    if rule.by_day.is_empty() && rule.by_month_day.is_empty() {
        match frequency {
            Frequency::Weekly => {
                rule.by_day = vec![WeekdayRule::every(start.weekday())];
            }
            Frequency::Monthly => {
                rule.by_month_day = vec![start.day() as i32];
            }
            Frequency::Yearly => {
                rule.by_month_day = vec![start.day() as i32];
                if rule.by_month.is_empty() {
                    rule.by_month = vec![start.month()];
                }
            }
            Frequency::Daily | Frequency::Disabled => {}
        }
    }

    if !frequency.supports_ordinals() {
        let mut stripped: Vec<WeekdayRule> = Vec::with_capacity(rule.by_day.len());
        for day in rule.by_day.iter().map(|d| WeekdayRule::every(d.weekday)) {
            if !stripped.contains(&day) {
                stripped.push(day);
            }
        }
        rule.by_day = stripped;
    }

    rule.frequency = Some(frequency);
    rule
}
