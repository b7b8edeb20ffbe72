use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::error::LifecycleError;

/// Parses a `YYYY-MM-DD` calendar date. Full store timestamps, either RFC 3339
/// (`2024-03-01T00:00:00Z`) or naive (`2024-03-01T00:00:00`), are accepted
/// and reduced to their date.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, LifecycleError> {
    let trimmed = value.trim();
    let date_err = match Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        Ok(date) => return Ok(date),
        Err(err) => err,
    };
    if let Ok(timestamp) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(timestamp.date());
    }
    if let Ok(timestamp) = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Ok(timestamp.date());
    }
    Err(LifecycleError::invalid_input(
        field,
        format!("{value:?} is not a calendar date ({date_err})"),
    ))
}

pub fn format_date(date: Date) -> Result<String, LifecycleError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| LifecycleError::invalid_input("date", format!("cannot format {date}: {err}")))
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: Date, to: Date) -> i64 {
    (to - from).whole_days()
}
