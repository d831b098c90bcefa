use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::recurrence::Frequency;

pub(super) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

pub(super) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub(super) fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

/// Move forward by whole months, clamping the day to the target month's length.
pub(super) fn advance_month(current_date: NaiveDate, interval: u32) -> Option<NaiveDate> {
    let month0 = current_date.month0() as i64 + i64::from(interval);
    let year = i32::try_from(i64::from(current_date.year()) + month0 / 12).ok()?;
    let month = (month0 % 12) as u32 + 1;
    let day = current_date.day().min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Move forward by whole years; 29 February lands on 28 February in common years.
pub(super) fn advance_year(current_date: NaiveDate, interval: u32) -> Option<NaiveDate> {
    let year = current_date.year().checked_add(i32::try_from(interval).ok()?)?;
    let day = current_date
        .day()
        .min(days_in_month(year, current_date.month()));

    NaiveDate::from_ymd_opt(year, current_date.month(), day)
}

/// One jump interval: `interval` days, weeks, months or years depending on `frequency`.
pub(super) fn jump(current_date: NaiveDate, frequency: Frequency, interval: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => current_date.checked_add_signed(Duration::days(i64::from(interval))),
        Frequency::Weekly => current_date.checked_add_signed(Duration::weeks(i64::from(interval))),
        Frequency::Monthly => advance_month(current_date, interval),
        Frequency::Yearly => advance_year(current_date, interval),
        Frequency::Disabled => None,
    }
}

/// The Nth day counted from the start (positive) or end (negative) of a month.
///
/// Returns `None` when the month is too short, e.g. day 31 of April or day -30 of February.
pub(super) fn select_month_day(year: i32, month: u32, from_end: bool, magnitude: u32) -> Option<NaiveDate> {
    let length = days_in_month(year, month);
    if magnitude == 0 || magnitude > length {
        return None;
    }

    let day = if from_end {
        length - magnitude + 1
    } else {
        magnitude
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_until(from: Weekday, to: Weekday) -> i64 {
    i64::from((7 + to.num_days_from_monday() - from.num_days_from_monday()) % 7)
}

/// Nth (`position > 0`) or Nth-from-last (`position < 0`) `weekday` in `[first, last]`.
fn select_positional_weekday(
    first: NaiveDate,
    last: NaiveDate,
    position: i32,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let candidate = if position > 0 {
        let first_hit = first + Duration::days(days_until(first.weekday(), weekday));
        first_hit + Duration::weeks(i64::from(position - 1))
    } else if position < 0 {
        let last_hit = last - Duration::days(days_until(weekday, last.weekday()));
        last_hit - Duration::weeks(i64::from(-position - 1))
    } else {
        return None;
    };

    (candidate >= first && candidate <= last).then_some(candidate)
}

pub(super) fn nth_weekday_of_month(
    year: i32,
    month: u32,
    position: i32,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
    select_positional_weekday(first, last, position, weekday)
}

pub(super) fn nth_weekday_of_year(year: i32, position: i32, weekday: Weekday) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
    select_positional_weekday(first, last, position, weekday)
}

/// Back up to the most recent `week_start` on or before `date`.
pub(super) fn week_start(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    date - Duration::days(days_until(week_start, date.weekday()))
}

/// The first `weekday` on or after `date`.
pub(super) fn next_weekday(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    date + Duration::days(days_until(date.weekday(), weekday))
}

/// Deduplicated weekdays sorted into week order starting at `week_start`.
pub(super) fn weekdays_in_week_order(days: &[Weekday], week_start: Weekday) -> Vec<Weekday> {
    let mut ordered: Vec<Weekday> = Vec::with_capacity(days.len());
    for &day in days {
        if !ordered.contains(&day) {
            ordered.push(day);
        }
    }
    ordered.sort_by_key(|&day| days_until(week_start, day));
    ordered
}
