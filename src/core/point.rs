use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Zone-less date-time layouts, read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A single GPS fix on a recorded route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// ISO-8601 timestamp, kept as recorded
    pub timestamp: String,
}

impl RoutePoint {
    /// Create a new route point
    pub fn new(latitude: f64, longitude: f64, timestamp: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: timestamp.into(),
        }
    }

    /// Parse the timestamp, returning None if it is malformed
    ///
    /// Accepts RFC 3339 (`2024-01-01T00:00:00Z`, `...+05:30`), minute
    /// precision (`2024-01-01T08:00Z`, `2024-01-01T08:00+05:30`), zone-less
    /// date-times and bare dates. Missing zones are read as UTC, a bare date
    /// as midnight UTC.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.with_timezone(&Utc));
        }
        if let Ok(t) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
            return Some(t.with_timezone(&Utc));
        }

        let naive = raw.strip_suffix('Z').unwrap_or(raw);
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc())
    }

    /// Timestamp as Unix milliseconds
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.time().map(|t| t.timestamp_millis())
    }

    /// Coordinates formatted for display, six decimal places
    pub fn coordinates_label(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }

    /// Copy of this point moved by a coordinate offset and a time offset
    ///
    /// A timestamp that cannot be parsed is carried over unchanged.
    pub fn shifted(&self, lat_offset: f64, lon_offset: f64, time_offset_ms: i64) -> Self {
        let timestamp = match self.time() {
            Some(t) => (t + chrono::Duration::milliseconds(time_offset_ms))
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.timestamp.clone(),
        };

        Self {
            latitude: self.latitude + lat_offset,
            longitude: self.longitude + lon_offset,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let p = RoutePoint::new(17.0, 78.0, "2024-01-01T00:00:10Z");
        assert_eq!(p.timestamp_millis(), Some(1_704_067_210_000));
    }

    #[test]
    fn test_parse_with_offset() {
        let a = RoutePoint::new(0.0, 0.0, "2024-01-01T05:30:00+05:30");
        let b = RoutePoint::new(0.0, 0.0, "2024-01-01T00:00:00Z");
        assert_eq!(a.time(), b.time());
    }

    #[test]
    fn test_parse_without_zone() {
        let a = RoutePoint::new(0.0, 0.0, "2024-01-01T00:00:00.500");
        assert_eq!(a.timestamp_millis(), Some(1_704_067_200_500));
    }

    #[test]
    fn test_parse_minute_precision_utc() {
        let p = RoutePoint::new(0.0, 0.0, "2024-01-01T08:00Z");
        let q = RoutePoint::new(0.0, 0.0, "2024-01-01T08:00:00Z");
        assert!(p.time().is_some());
        assert_eq!(p.time(), q.time());
    }

    #[test]
    fn test_parse_minute_precision_with_offset() {
        let p = RoutePoint::new(0.0, 0.0, "2024-01-01T08:00+05:30");
        let q = RoutePoint::new(0.0, 0.0, "2024-01-01T02:30:00Z");
        assert!(p.time().is_some());
        assert_eq!(p.time(), q.time());
    }

    #[test]
    fn test_parse_minute_precision_without_zone() {
        let p = RoutePoint::new(0.0, 0.0, "2024-01-01T08:00");
        assert_eq!(p.timestamp_millis(), Some(1_704_096_000_000));
    }

    #[test]
    fn test_parse_date_only() {
        let p = RoutePoint::new(0.0, 0.0, "2024-01-01");
        assert_eq!(p.timestamp_millis(), Some(1_704_067_200_000));
    }

    #[test]
    fn test_malformed_timestamp() {
        let p = RoutePoint::new(17.0, 78.0, "yesterday-ish");
        assert!(p.time().is_none());
    }

    #[test]
    fn test_shifted() {
        let p = RoutePoint::new(17.0, 78.0, "2024-01-01T00:00:00Z");
        let q = p.shifted(0.01, -0.02, 5000);
        assert!((q.latitude - 17.01).abs() < 1e-9);
        assert!((q.longitude - 77.98).abs() < 1e-9);
        assert_eq!(q.timestamp, "2024-01-01T00:00:05.000Z");

        let bad = RoutePoint::new(1.0, 1.0, "garbage");
        assert_eq!(bad.shifted(0.0, 0.0, 1000).timestamp, "garbage");
    }

    #[test]
    fn test_serde_field_names() {
        let json = r#"{"latitude":17.5,"longitude":78.25,"timestamp":"2024-01-01T00:00:00Z"}"#;
        let p: RoutePoint = serde_json::from_str(json).unwrap();
        assert_eq!(p, RoutePoint::new(17.5, 78.25, "2024-01-01T00:00:00Z"));
    }
}
