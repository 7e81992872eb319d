//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC timestamp as stored in the `created_at` / `updated_at` columns
///
/// RFC 3339 with microsecond precision so successive writes order correctly
/// as plain strings.
pub fn now_rfc3339() -> String {
    to_rfc3339(now())
}

/// Format a timestamp the way the store persists it
pub fn to_rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
