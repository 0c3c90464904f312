//! Serde helpers for the console's loosely typed JSON.
//!
//! Responsibilities:
//! - Accept either JSON numbers or strings for ids and counts.
//! - Parse audit event timestamps from every shape the console emits and
//!   render them back in the display format (`YYYY-MM-DD HH:mm:ss`).
//!
//! Explicitly does NOT handle:
//! - Choosing the display timezone. Callers pass the offset in; the serde
//!   `event_time` module assumes UTC because deserializers carry no state.
//!
//! Invariants / assumptions:
//! - Timestamps carrying an explicit offset are converted to the display
//!   offset; timestamps without one are already display wall-clock time.
//! - Bare integers are epoch milliseconds.
//! - These helpers must not log or print secrets; errors are generic parse errors.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::Error as _;

/// Wire format for audit timestamps and time-range filters.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum U64OrString {
    U64(u64),
    I64(i64),
    String(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    U64(u64),
    I64(i64),
    F64(f64),
}

pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = U64OrString::deserialize(deserializer)?;
    match value {
        U64OrString::U64(v) => Ok(v),
        U64OrString::I64(v) => u64::try_from(v).map_err(D::Error::custom),
        U64OrString::String(s) => s.trim().parse::<u64>().map_err(D::Error::custom),
    }
}

/// Ids arrive as strings from newer consoles and as numbers from older ones.
pub fn string_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = StringOrNumber::deserialize(deserializer)?;
    Ok(match value {
        StringOrNumber::String(s) => s,
        StringOrNumber::U64(v) => v.to_string(),
        StringOrNumber::I64(v) => v.to_string(),
        StringOrNumber::F64(v) => v.to_string(),
    })
}

/// Parse an audit timestamp string into display wall-clock time.
///
/// Accepted shapes:
/// - `2024-03-01 08:15:00` (display format, taken as-is)
/// - `2024-03-01T08:15:00` with optional fraction (taken as-is)
/// - RFC 3339 with `Z` or an offset (converted to `display_offset`)
/// - all-digit epoch milliseconds (converted to `display_offset`)
pub fn parse_event_time(raw: &str, display_offset: FixedOffset) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, EVENT_TIME_FORMAT) {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&display_offset).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(|ms| event_time_from_millis(ms, display_offset));
    }

    None
}

/// Convert epoch milliseconds into display wall-clock time.
pub fn event_time_from_millis(ms: i64, display_offset: FixedOffset) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.with_timezone(&display_offset).naive_local())
}

/// Render a timestamp in the wire/display format.
pub fn format_event_time(dt: &NaiveDateTime) -> String {
    dt.format(EVENT_TIME_FORMAT).to_string()
}

/// Rewrite a raw `eventTime` JSON value into the display format.
///
/// Values that cannot be parsed are left untouched so the row fails to decode
/// and is reported by the caller.
pub fn normalize_event_time_value(value: &mut serde_json::Value, display_offset: FixedOffset) {
    let parsed = match value {
        serde_json::Value::String(s) => parse_event_time(s, display_offset),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|ms| event_time_from_millis(ms, display_offset)),
        _ => None,
    };

    if let Some(dt) = parsed {
        *value = serde_json::Value::String(format_event_time(&dt));
    }
}

/// Serde adapter for `eventTime` fields (UTC display offset).
pub mod event_time {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Text(String),
        Millis(i64),
    }

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format_event_time(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let utc = FixedOffset::east_opt(0).ok_or_else(|| D::Error::custom("invalid offset"))?;
        match RawTime::deserialize(deserializer)? {
            RawTime::Text(s) => parse_event_time(&s, utc)
                .ok_or_else(|| D::Error::custom(format!("unrecognized event time '{s}'"))),
            RawTime::Millis(ms) => event_time_from_millis(ms, utc)
                .ok_or_else(|| D::Error::custom("event time out of range")),
        }
    }
}
