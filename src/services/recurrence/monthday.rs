use chrono::{Datelike, NaiveDate};

use crate::models::recurrence::{Frequency, RecurrenceRule};

use super::calculator::RecurrenceCalculator;
use super::utils::{advance_month, advance_year, first_of_month, first_of_year, select_month_day};

/// A BYMONTHDAY value split into counting direction and distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MonthDay {
    from_end: bool,
    magnitude: u32,
}

fn decompose(days: &[i32]) -> Vec<MonthDay> {
    days.iter()
        .map(|&day| MonthDay {
            from_end: day < 0,
            magnitude: day.unsigned_abs(),
        })
        .collect()
}

fn candidates_in_month(month_start: NaiveDate, targets: &[MonthDay]) -> Vec<NaiveDate> {
    let mut candidates: Vec<NaiveDate> = targets
        .iter()
        .filter_map(|target| {
            select_month_day(
                month_start.year(),
                month_start.month(),
                target.from_end,
                target.magnitude,
            )
        })
        .collect();
    candidates.sort();
    candidates.dedup();
    candidates
}

/// BYMONTHDAY expansion, one month at a time.
///
/// MONTHLY rules jump INTERVAL months after each month. YEARLY rules visit
/// every remaining month of the year before jumping INTERVAL years; BYMONTH
/// is enforced by the admission filter.
pub(super) fn generate(calculator: &mut RecurrenceCalculator, rule: &RecurrenceRule) {
    let targets = decompose(&rule.by_month_day);
    let interval = rule.interval_or_default();
    let yearly = rule.frequency == Some(Frequency::Yearly);
    let mut month_start = first_of_month(calculator.start().date());

    loop {
        for date in candidates_in_month(month_start, &targets) {
            calculator.add_current_day(rule, date);
        }

        let next = if !yearly {
            advance_month(month_start, interval)
        } else if month_start.month() == 12 {
            advance_year(first_of_year(month_start), interval)
        } else {
            advance_month(month_start, 1)
        };

        let Some(next) = next else {
            break;
        };
        month_start = next;

        if calculator.is_finished(rule, month_start) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_decompose_signs() {
        assert_eq!(
            decompose(&[11, -1]),
            vec![
                MonthDay {
                    from_end: false,
                    magnitude: 11
                },
                MonthDay {
                    from_end: true,
                    magnitude: 1
                },
            ]
        );
    }

    #[test]
    fn test_candidates_sorted_and_bounded_by_month() {
        let targets = decompose(&[-1, 1, 30, 28]);
        assert_eq!(
            candidates_in_month(ymd(1997, 2, 1), &targets),
            vec![ymd(1997, 2, 1), ymd(1997, 2, 28)]
        );
        assert_eq!(
            candidates_in_month(ymd(1997, 4, 1), &targets),
            vec![ymd(1997, 4, 1), ymd(1997, 4, 28), ymd(1997, 4, 30)]
        );
    }
}
