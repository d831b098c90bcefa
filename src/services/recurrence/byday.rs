use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::recurrence::{Frequency, RecurrenceRule, WeekdayRule};

use super::calculator::RecurrenceCalculator;
use super::utils::{
    first_of_month, first_of_year, jump, next_weekday, nth_weekday_of_month, nth_weekday_of_year,
    week_start, weekdays_in_week_order,
};

/// BYDAY expansion.
///
/// Ordinal entries (`-1SU`, `2TH`) are resolved once per month or year.
/// Bare weekdays are found by walking the calendar a week at a time.
pub(super) fn generate(calculator: &mut RecurrenceCalculator, rule: &RecurrenceRule) {
    let frequency = rule.frequency.unwrap_or(Frequency::Weekly);

    let relative: Vec<WeekdayRule> = rule
        .by_day
        .iter()
        .filter(|day| day.is_relative())
        .copied()
        .collect();
    let absolute: Vec<Weekday> = rule
        .by_day
        .iter()
        .filter(|day| !day.is_relative())
        .map(|day| day.weekday)
        .collect();

    if !relative.is_empty() && frequency.supports_ordinals() {
        generate_relative(calculator, rule, frequency, &relative);
    }

    if !absolute.is_empty()
        && matches!(
            frequency,
            Frequency::Weekly | Frequency::Monthly | Frequency::Yearly
        )
    {
        generate_absolute(calculator, rule, frequency, &absolute);
    }
}

fn period_start(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Yearly => first_of_year(date),
        _ => first_of_month(date),
    }
}

fn same_period(date: NaiveDate, period: NaiveDate, frequency: Frequency) -> bool {
    match frequency {
        Frequency::Yearly => date.year() == period.year(),
        Frequency::Monthly => date.year() == period.year() && date.month() == period.month(),
        _ => true,
    }
}

/// Dates the ordinal entries point at within one period.
fn relative_candidates(
    period: NaiveDate,
    frequency: Frequency,
    by_month: &[u32],
    days: &[WeekdayRule],
) -> Vec<NaiveDate> {
    let mut candidates = Vec::new();

    for day in days {
        let Some(position) = day.ordinal else {
            continue;
        };

        match frequency {
            // With BYMONTH the ordinal counts within each listed month.
            Frequency::Yearly if !by_month.is_empty() => {
                for &month in by_month {
                    candidates.extend(nth_weekday_of_month(
                        period.year(),
                        month,
                        position,
                        day.weekday,
                    ));
                }
            }
            Frequency::Yearly => {
                candidates.extend(nth_weekday_of_year(period.year(), position, day.weekday));
            }
            _ => {
                candidates.extend(nth_weekday_of_month(
                    period.year(),
                    period.month(),
                    position,
                    day.weekday,
                ));
            }
        }
    }

    candidates.sort();
    candidates.dedup();
    candidates
}

fn generate_relative(
    calculator: &mut RecurrenceCalculator,
    rule: &RecurrenceRule,
    frequency: Frequency,
    days: &[WeekdayRule],
) {
    let interval = rule.interval_or_default();
    let mut period = period_start(calculator.start().date(), frequency);

    loop {
        for date in relative_candidates(period, frequency, &rule.by_month, days) {
            calculator.add_current_day(rule, date);
        }

        // `period` is always the first day of its month or year, so a jump
        // never skips a short month.
        let Some(next) = jump(period, frequency, interval) else {
            break;
        };
        period = next;

        if calculator.is_finished(rule, period) {
            break;
        }
    }
}

fn generate_absolute(
    calculator: &mut RecurrenceCalculator,
    rule: &RecurrenceRule,
    frequency: Frequency,
    days: &[Weekday],
) {
    let week_start_day = rule.week_start_or_default();
    let ordered = weekdays_in_week_order(days, week_start_day);
    let interval = rule.interval_or_default();

    let start = calculator.start().date();
    let mut period = period_start(start, frequency);
    let mut current_day = week_start(start, week_start_day);

    loop {
        let week_begin = current_day;

        for &weekday in &ordered {
            current_day = next_weekday(current_day, weekday);
            if same_period(current_day, period, frequency) {
                calculator.add_current_day(rule, current_day);
            }
        }

        let step = if frequency == Frequency::Weekly {
            Duration::weeks(i64::from(interval))
        } else {
            Duration::weeks(1)
        };
        let Some(next_week) = week_begin.checked_add_signed(step) else {
            break;
        };
        current_day = next_week;

        // Period walked: reset to its start and jump. The week straddling the
        // boundary is walked again for the new period.
        if !same_period(current_day, period, frequency) {
            let Some(next_period) = jump(period, frequency, interval) else {
                break;
            };
            period = next_period;
            current_day = week_start(period, week_start_day);
        }

        if calculator.is_finished(rule, current_day) {
            break;
        }
    }
}
