//! Date arithmetic for schedule expansion.

use chrono::{Datelike, Duration, NaiveDate};

use model::entities::recurring_transaction::RecurrenceUnit;

/// Returns the number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month_year = year + (month / 12) as i32;
    let next_month = (month % 12) + 1;
    let first_day_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1).unwrap();
    first_day_next_month.pred_opt().unwrap().day()
}

/// Adds whole months, clamping the day to the target month's length.
///
/// The day of month stays anchored to `date`, so repeated offsets from
/// one origin never drift: Jan 31 plus two months is Mar 31 even though
/// Jan 31 plus one month lands on Feb 28.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// The k-th occurrence of a schedule anchored at `start`, stepping
/// `interval` units at a time. k = 0 is `start` itself.
pub fn occurrence_date(
    start: NaiveDate,
    unit: RecurrenceUnit,
    interval: i32,
    k: i32,
) -> NaiveDate {
    let offset = interval * k;
    match unit {
        RecurrenceUnit::Day => start + Duration::days(i64::from(offset)),
        RecurrenceUnit::Week => start + Duration::days(i64::from(offset) * 7),
        RecurrenceUnit::Month => add_months(start, offset),
        RecurrenceUnit::Year => add_months(start, offset * 12),
    }
}
