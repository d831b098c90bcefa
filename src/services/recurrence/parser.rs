use crate::models::recurrence::{weekday_from_code, Frequency, RecurrenceRule, WeekdayRule};
use crate::utils::date::parse_date_value;

/// Parts that are recognised but have no effect on the expansion.
const IGNORED_PARTS: &[&str] = &[
    "BYSETPOS",
    "BYYEARDAY",
    "BYWEEKNO",
    "BYHOUR",
    "BYMINUTE",
    "BYSECOND",
];

/// Parse an RRULE value such as `FREQ=MONTHLY;BYDAY=1FR;COUNT=10`.
///
/// Parsing never fails. A part without `=value`, or whose value cannot be
/// read, is skipped and the rest of the rule is kept; list values drop only
/// their invalid items.
pub fn parse_rule(rrule: &str) -> RecurrenceRule {
    let mut rule = RecurrenceRule::default();
    let body = strip_prefix(rrule.trim());

    for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            log::debug!("Skipping malformed RRULE part '{}'", part);
            continue;
        };
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();

        if value.is_empty() {
            log::debug!("Skipping RRULE part '{}' with empty value", key);
            continue;
        }

        match key.as_str() {
            "FREQ" => {
                let code = value.to_ascii_uppercase();
                match Frequency::from_code(&code) {
                    Some(frequency) => rule.frequency = Some(frequency),
                    None => log::debug!("Ignoring unsupported frequency '{}'", code),
                }
            }
            "INTERVAL" => rule.interval = parse_number(&key, value),
            "COUNT" => rule.count = parse_number(&key, value).filter(|count: &usize| *count > 0),
            "UNTIL" => match parse_date_value(value) {
                Ok(until) => rule.until = Some(until),
                Err(err) => log::debug!("Skipping UNTIL: {}", err),
            },
            "BYDAY" => {
                rule.by_day = parse_list(value, |item| {
                    item.to_ascii_uppercase().parse::<WeekdayRule>().ok()
                })
            }
            "BYMONTHDAY" => {
                rule.by_month_day = parse_list(value, |item| {
                    item.trim_start_matches('+')
                        .parse::<i32>()
                        .ok()
                        .filter(|day| *day != 0 && day.abs() <= 31)
                })
            }
            "BYMONTH" => {
                rule.by_month = parse_list(value, |item| {
                    item.parse::<u32>().ok().filter(|month| (1..=12).contains(month))
                })
            }
            "WKST" => match weekday_from_code(&value.to_ascii_uppercase()) {
                Some(day) => rule.week_start = Some(day),
                None => log::debug!("Skipping unknown WKST '{}'", value),
            },
            other if IGNORED_PARTS.contains(&other) => {
                log::debug!("Ignoring unsupported RRULE part {}", other);
            }
            other => log::debug!("Ignoring unknown RRULE part {}", other),
        }
    }

    rule
}

fn strip_prefix(rrule: &str) -> &str {
    match rrule.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("RRULE:") => &rrule[6..],
        _ => rrule,
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.parse::<T>().ok();
    if parsed.is_none() {
        log::debug!("Skipping {} with non-numeric value '{}'", key, value);
    }
    parsed
}

fn parse_list<T: PartialEq>(value: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    let mut items = Vec::new();
    for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match parse(raw) {
            Some(item) if !items.contains(&item) => items.push(item),
            Some(_) => {}
            None => log::debug!("Dropping invalid list item '{}'", raw),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::DateValue;
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn test_parse_full_rule() {
        let rule = parse_rule("FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH;COUNT=4;WKST=SU");

        assert_eq!(rule.frequency, Some(Frequency::Weekly));
        assert_eq!(rule.interval, Some(2));
        assert_eq!(rule.count, Some(4));
        assert_eq!(
            rule.by_day,
            vec![WeekdayRule::every(Weekday::Tue), WeekdayRule::every(Weekday::Thu)]
        );
        assert_eq!(rule.week_start, Some(Weekday::Sun));
    }

    #[test]
    fn test_parse_accepts_prefix_and_lowercase() {
        let rule = parse_rule("RRULE:freq=monthly;byday=-1su");
        assert_eq!(rule.frequency, Some(Frequency::Monthly));
        assert_eq!(rule.by_day, vec![WeekdayRule::nth(-1, Weekday::Sun)]);
    }

    #[test]
    fn test_parse_skips_malformed_parts() {
        let rule = parse_rule("FREQ=DAILY;COUNT;INTERVAL=abc;BYMONTH=1,13,x,2;UNTIL=garbage");

        assert_eq!(rule.frequency, Some(Frequency::Daily));
        assert_eq!(rule.count, None);
        assert_eq!(rule.interval, None);
        assert_eq!(rule.by_month, vec![1, 2]);
        assert_eq!(rule.until, None);
    }

    #[test]
    fn test_parse_ignores_unsupported_parts() {
        let rule = parse_rule("FREQ=HOURLY;BYSETPOS=-1;BYYEARDAY=100;COUNT=3");

        assert_eq!(rule.frequency, None);
        assert_eq!(rule.count, Some(3));
        assert_eq!(
            rule,
            RecurrenceRule {
                count: Some(3),
                ..RecurrenceRule::default()
            }
        );
    }

    #[test]
    fn test_parse_until_forms() {
        let date = parse_rule("FREQ=DAILY;UNTIL=19971224");
        assert_eq!(
            date.until,
            Some(DateValue::Date(NaiveDate::from_ymd_opt(1997, 12, 24).unwrap()))
        );

        let utc = parse_rule("FREQ=DAILY;UNTIL=19971224T000000Z");
        assert!(matches!(utc.until, Some(DateValue::Utc(_))));
    }

    #[test]
    fn test_parse_bymonthday_signs_and_range() {
        let rule = parse_rule("FREQ=MONTHLY;BYMONTHDAY=1,-1,+15,0,32");
        assert_eq!(rule.by_month_day, vec![1, -1, 15]);
    }

    #[test]
    fn test_parse_rejects_zero_count() {
        assert_eq!(parse_rule("FREQ=DAILY;COUNT=0").count, None);
    }

    #[test]
    fn test_parse_none_frequency() {
        assert!(parse_rule("FREQ=NONE").is_disabled());
    }

    #[test]
    fn test_display_then_parse_keeps_rule() {
        let rule = parse_rule("FREQ=YEARLY;BYMONTH=6;BYDAY=-1SU;UNTIL=20001231");
        assert_eq!(parse_rule(&rule.to_string()), rule);
    }
}
