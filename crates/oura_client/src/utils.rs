//! Calendar date parsing and formatting for query parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a calendar date.
///
/// Accepts:
/// - YYYY-MM-DD
/// - RFC3339 datetime (the UTC calendar date is taken)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date());
    }
    None
}

/// Format a date the way the API expects it in `start_date`/`end_date`.
pub fn format_query_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
