//! Timestamp helpers: RFC 3339 storage format and human-friendly output.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Storage format: RFC 3339 UTC with fixed microsecond precision, so
/// lexicographic order in SQLite matches chronological order.
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_ts(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// "3h 12m" style rendering for how long a state has been held.
pub fn format_duration(d: Duration) -> String {
    let mins = d.num_minutes().max(0);
    if mins < 60 {
        format!("{}m", mins)
    } else {
        format!("{}h {:02}m", mins / 60, mins % 60)
    }
}
