//! Date resolution for raw records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use equity_core::{Error, RawDate, Result};

/// Date-time layouts tried after the plain date formats. Only the calendar
/// date is kept.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse date text against `formats`, then common date-time layouts and RFC 3339.
pub fn parse_date_text<S: AsRef<str>>(text: &str, formats: &[S]) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt.as_ref()).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Resolve the date of the record at `index`.
pub fn resolve_date<S: AsRef<str>>(
    index: usize,
    raw: &RawDate,
    formats: &[S],
) -> Result<NaiveDate> {
    match raw {
        RawDate::Parsed(date) => Ok(*date),
        RawDate::Text(text) if text.trim().is_empty() => {
            Err(Error::invalid_date(index, text.clone(), "empty date"))
        }
        RawDate::Text(text) => parse_date_text(text, formats)
            .ok_or_else(|| Error::invalid_date(index, text.clone(), "no matching date format")),
    }
}
