//! Timestamp parsing and formatting.
//!
//! All timestamps are UTC-naive internally. Inputs accept the canonical
//! `Z`-suffixed second-precision form, full RFC 3339 with an offset, or an
//! offset-naive ISO-8601 string (with optional fractional seconds).

use chrono::{DateTime, NaiveDateTime};

/// Canonical output format: `2024-05-01T12:30:00Z`.
pub const ISO_Z: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an ISO-8601 timestamp, `Z`-suffixed or offset-naive.
pub fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, ISO_Z) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Format a timestamp in the canonical `Z`-suffixed form.
pub fn format_instant(ts: NaiveDateTime) -> String {
    ts.format(ISO_Z).to_string()
}
