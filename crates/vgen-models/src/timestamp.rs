//! Provider timestamp handling.
//!
//! The provider reports `createdAt` / `lastUpdatedAt` as unix seconds, but
//! some responses carry fractional seconds, numeric strings or date strings.
//! [`Timestamp`] keeps whatever was sent so it serializes back unchanged, and
//! interprets it lazily for display and ordering.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A provider timestamp, stored exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Value);

impl Timestamp {
    pub fn from_secs(secs: i64) -> Self {
        Self(Value::from(secs))
    }

    /// The value as sent by the provider.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Unix seconds, when the value can be read as a time at all.
    /// Fractional seconds are truncated.
    pub fn unix_secs(&self) -> Option<i64> {
        match &self.0 {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => parse_timestamp(s),
            _ => None,
        }
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self::from_secs(secs)
    }
}

/// Parse a textual timestamp (unix seconds, RFC 3339, or a naive
/// `YYYY-MM-DD HH:MM:SS` read as UTC) to unix seconds.
///
/// # Examples
/// ```
/// use vgen_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("1700000000"), Some(1_700_000_000));
/// assert_eq!(parse_timestamp("2023-11-14T22:13:20Z"), Some(1_700_000_000));
/// assert_eq!(parse_timestamp("2023-11-14 22:13:20"), Some(1_700_000_000));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
pub fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return Some(secs);
    }
    if let Ok(secs) = s.parse::<f64>() {
        return secs.is_finite().then(|| secs.trunc() as i64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).timestamp());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Format unix seconds as `YYYY-MM-DD HH:MM UTC` for display.
pub fn format_timestamp(secs: i64) -> String {
    match Utc.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => secs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unix_secs_from_each_shape() {
        let read = |v: Value| serde_json::from_value::<Timestamp>(v).unwrap().unix_secs();

        assert_eq!(read(json!(1700000000)), Some(1_700_000_000));
        assert_eq!(read(json!(1700000000.9)), Some(1_700_000_000));
        assert_eq!(read(json!("1700000000")), Some(1_700_000_000));
        assert_eq!(read(json!("2023-11-14T22:13:20Z")), Some(1_700_000_000));
        assert_eq!(read(json!("2024-01-01 10:00:00")), Some(1_704_103_200));
        assert_eq!(read(json!("soon")), None);
        assert_eq!(read(json!({"nested": true})), None);
    }

    #[test]
    fn test_serializes_as_received() {
        for raw in [json!("2024-01-01T10:00:00Z"), json!(1700000000.9), json!("soon")] {
            let ts: Timestamp = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(serde_json::to_value(&ts).unwrap(), raw);
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13 UTC");
    }
}
