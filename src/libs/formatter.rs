//! Date parsing and formatting helpers shared by the CLI and the views.
//!
//! Input dates accept a few human-friendly forms:
//!
//! - `today`, `tomorrow`, `yesterday`
//! - `YYYY-MM-DD` (midnight when a time is needed)
//! - `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS` or the `T`-separated ISO form
//!
//! Output uses `YYYY-MM-DD` for dates and `YYYY-MM-DD HH:MM` for date-times.

use crate::libs::error::TaskError;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const DATETIME_INPUT_FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses a calendar date, resolving relative keywords against the local clock.
pub fn parse_date(input: &str) -> Result<NaiveDate, TaskError> {
    let today = Local::now().date_naive();
    match input.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, DATE_FORMAT).map_err(|_| TaskError::InvalidDate(input.to_string())),
    }
}

/// Parses a date with an optional time of day.
///
/// A bare date resolves to midnight.
pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, TaskError> {
    let trimmed = input.trim();
    for format in DATETIME_INPUT_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime);
        }
    }
    parse_date(trimmed).map(start_of_day)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of the day, used for inclusive range ends.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::nanoseconds(1)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}
