//! Lenient parsing of client-supplied dates.
//!
//! Accepted forms, tried in order:
//! - RFC 3339 (`2024-01-01T10:00:00Z`, `2024-01-01T10:00:00+02:00`)
//! - naive date-time, read as UTC (`2024-01-01T10:00`, `2024-01-01 10:00:00.250`)
//! - plain date, read as midnight UTC (`2024-01-01`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an instant. Returns `None` when no accepted form matches.
pub fn parse_date_time(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date. Date-times are reduced to their UTC date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    parse_date_time(trimmed).map(|dt| dt.date_naive())
}
