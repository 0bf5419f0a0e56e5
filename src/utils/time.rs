//! Time utilities: ISO-8601 stamps and timestamp-derived ids.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as `2025-01-31T09:15:00.123Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds since the epoch, bumped past `last` so ids never repeat
/// even when two calls land in the same millisecond.
///
/// `None` once `last` is already `i64::MAX`.
pub fn next_timestamp_id(last: Option<i64>) -> Option<i64> {
    let now = Utc::now().timestamp_millis();
    match last {
        Some(last) if last >= now => last.checked_add(1),
        _ => Some(now),
    }
}
