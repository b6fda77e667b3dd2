//! Lenient timestamp parsing for source rows.
//!
//! Dumps mix RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS` values and bare
//! dates. Naive values are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp string, returning `None` when no format matches.
///
/// # Examples
/// ```
/// use hitchspot_core::parse_timestamp;
///
/// assert!(parse_timestamp("2023-06-01T12:00:00Z").is_some());
/// assert!(parse_timestamp("2023-06-01 12:00:00").is_some());
/// assert!(parse_timestamp("2023-06-01").is_some());
/// assert!(parse_timestamp("last summer").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .map(|naive| naive.and_utc())
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
