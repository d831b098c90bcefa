use crate::models::recurrence::{Frequency, RecurrenceRule};

use super::calculator::RecurrenceCalculator;
use super::utils::jump;

/// Plain repetition of the start date every INTERVAL frequency units.
///
/// After normalization only DAILY rules reach this strategy.
pub(super) fn generate(calculator: &mut RecurrenceCalculator, rule: &RecurrenceRule) {
    let frequency = rule.frequency.unwrap_or(Frequency::Daily);
    let interval = rule.interval_or_default();
    let mut current_date = calculator.start().date();

    loop {
        calculator.add_current_day(rule, current_date);

        if calculator.is_finished(rule, current_date) {
            break;
        }

        match jump(current_date, frequency, interval) {
            Some(next) => current_date = next,
            None => break,
        }
    }
}
