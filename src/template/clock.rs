//! ISO-8601 timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_iso8601() -> String {
    format_iso8601(Utc::now())
}

/// Format a UTC timestamp with millisecond precision.
pub fn format_iso8601(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_millis(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_format_known_instants() {
        assert_eq!(format_iso8601(at_millis(0)), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_iso8601(at_millis(1_700_000_000_123)), "2023-11-14T22:13:20.123Z");
        assert_eq!(format_iso8601(at_millis(951_782_400_000)), "2000-02-29T00:00:00.000Z");
        assert_eq!(format_iso8601(at_millis(4_102_444_799_999)), "2099-12-31T23:59:59.999Z");
    }

    #[test]
    fn test_now_shape() {
        let now = now_iso8601();
        assert_eq!(now.len(), 24);
        assert!(now.ends_with('Z'));
        assert_eq!(&now[10..11], "T");
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
