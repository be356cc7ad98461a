//! Date-range helpers for monthly expense queries.

use std::ops::Range;

use time::{Date, Month, OffsetDateTime};

use crate::ValidationError;

/// Get the half-open UTC range covering the calendar month `month` of `year`,
/// from midnight on the first of the month up to, but not including, midnight
/// on the first of the next month.
///
/// # Errors
/// Returns a [ValidationError::InvalidMonth] if `month` is not in 1..=12, or
/// a [ValidationError::InvalidYear] if `year` is outside the supported range.
pub fn month_range(year: i32, month: u8) -> Result<Range<OffsetDateTime>, ValidationError> {
    let month = Month::try_from(month).map_err(|_| ValidationError::InvalidMonth(month))?;
    let start = Date::from_calendar_date(year, month, 1)
        .map_err(|_| ValidationError::InvalidYear(year))?;

    let (end_year, end_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };
    let end = Date::from_calendar_date(end_year, end_month, 1)
        .map_err(|_| ValidationError::InvalidYear(year))?;

    Ok(start.midnight().assume_utc()..end.midnight().assume_utc())
}
