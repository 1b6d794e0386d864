//! Trading-day calendar.
//!
//! Weekdays only; exchange holidays are not modeled.

use chrono::{Datelike, Days, NaiveDate};

/// Whether `date` falls on a weekday.
#[must_use]
pub fn is_trading_day(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 5
}

/// All weekdays in `[start, end]`, in order.
///
/// Returns an empty range when `start > end`.
#[must_use]
pub fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        if is_trading_day(current) {
            days.push(current);
        }
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}
