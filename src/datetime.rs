//! Date/time utilities for gator.
//!
//! Timestamps are stored as fixed-width RFC 3339 text in UTC with
//! microsecond precision, so string order in SQL matches time order.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Format a timestamp for storage.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time, formatted for storage.
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and the plain SQLite `YYYY-MM-DD HH:MM:SS` format.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

/// Format a timestamp for display in command output.
pub fn format_display(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
