//! Timestamp resolution for webhook fields.
//!
//! Webhook timestamps are ISO-8601 strings, usually with a trailing `Z`.
//! A missing, null or empty value resolves to the classification instant. A
//! value that is present but unparseable, or not a string at all, also resolves
//! to the classification instant with a warning, so one bad field never drops
//! an otherwise valid event.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Error returned when a present timestamp string is not valid ISO-8601.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed timestamp {value:?}")]
pub struct TimestampError {
    /// The raw value as received.
    pub value: String,
}

/// Parses an ISO-8601 timestamp into a UTC instant.
///
/// A trailing `Z` is rewritten to an explicit `+00:00` offset first. Values
/// without any offset are read as UTC, and a bare date means midnight UTC.
///
/// # Errors
///
/// Returns [`TimestampError`] if no accepted layout matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(base) => format!("{base}+00:00"),
        None => trimmed.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized)
        .or_else(|_| DateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f"))
                .map(|naive| naive.and_utc())
        })
        .or_else(|_| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
        .map_err(|_| TimestampError {
            value: raw.to_string(),
        })
}

/// Resolves a payload field to an instant, defaulting to `now`.
///
/// Absent, `null` and empty values give `now`. Malformed strings and values
/// of any other JSON type also give `now`, and log a warning naming the field.
pub fn resolve_timestamp(field: &str, raw: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    match read_timestamp(raw) {
        Ok(Some(ts)) => ts,
        Ok(None) => now,
        Err(e) => {
            tracing::warn!(field, error = %e, "unusable webhook timestamp, using current time");
            now
        }
    }
}

/// Reads a timestamp field: `Ok(None)` when it carries no value, an error
/// when it carries one that is not a valid timestamp string.
pub(crate) fn read_timestamp(raw: Option<&Value>) -> Result<Option<DateTime<Utc>>, TimestampError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => parse_timestamp(text).map(Some),
        Some(other) => Err(TimestampError {
            value: other.to_string(),
        }),
    }
}
