//! Wrapped-date wire encoding for event timestamps.
//!
//! Timestamps leave the server as `{"$date": "2024-01-01T12:00:00Z"}` rather
//! than a bare string, so a consumer can tell a raw instant apart from other
//! string fields. The value is truncated to millisecond precision (the store
//! precision) and carries fractional seconds only when they are non-zero.
//!
//! Use with `#[serde(with = "gitpulse_types::wire_date")]`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct WrappedDate {
    #[serde(rename = "$date")]
    date: String,
}

/// Truncates an instant to millisecond precision.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

/// Formats an instant the way it appears inside the `$date` wrapper.
pub fn format(ts: &DateTime<Utc>) -> String {
    truncate_to_millis(*ts).to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    WrappedDate { date: format(ts) }.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let wrapped = WrappedDate::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&wrapped.date)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| de::Error::custom(format!("invalid $date value {:?}: {e}", wrapped.date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn whole_seconds_have_no_fraction() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(format(&ts), "2024-01-01T12:00:00Z");
    }

    #[test]
    fn sub_millisecond_digits_are_dropped() {
        let ts = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        assert_eq!(format(&ts), "2024-01-01T12:00:00.123Z");
    }
}
