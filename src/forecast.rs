//! Forecast data model and timestamp parsing.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the Electricity Map API,
/// e.g. `2018-11-26T17:00:00.000Z` (UTC, millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// One forecast hour as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(rename = "carbonIntensity", default)]
    pub carbon_intensity: i64,

    #[serde(default)]
    pub datetime: String,

    /// Derived from `datetime`; recomputed on load, never persisted.
    #[serde(skip)]
    pub parsed_datetime: Option<DateTime<Utc>>,
}

/// A fetched-and-cached forecast for one zone. The current truth source
/// between refreshes; replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    #[serde(default)]
    pub zone: String,

    #[serde(default)]
    pub forecast: Vec<ForecastEntry>,

    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,

    /// Derived from `updated_at`; recomputed on load, never persisted.
    #[serde(skip)]
    pub parsed_updated_at: Option<DateTime<Utc>>,
}

impl ForecastSnapshot {
    /// Populate the parsed timestamp fields from their raw strings.
    ///
    /// Idempotent. A string that does not match [`TIMESTAMP_FORMAT`]
    /// leaves its parsed field `None`; the remaining fields are still
    /// parsed.
    pub fn parse_timestamps(mut self) -> Self {
        for entry in &mut self.forecast {
            entry.parsed_datetime = parse_timestamp(&entry.datetime);
        }
        self.parsed_updated_at = parse_timestamp(&self.updated_at);
        self
    }

    /// Whether the snapshot is due for a refresh: `updatedAt` is more
    /// than 24 hours before `now`, or never parsed at all.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.parsed_updated_at {
            Some(updated) => now > updated + chrono::Duration::days(1),
            None => true,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "zone": "DK-DK2",
        "forecast": [
          {
            "carbonIntensity": 326,
            "datetime": "2018-11-26T17:00:00.000Z"
          },
          {
            "carbonIntensity": 297,
            "datetime": "2018-11-26T18:00:00.000Z"
          },
          {
            "carbonIntensity": 194,
            "datetime": "2018-11-28T17:00:00.000Z"
          }
        ],
        "updatedAt": "2018-11-26T17:25:24.685Z"
      }"#;

    #[test]
    fn parses_forecast_timestamps() {
        let snapshot: ForecastSnapshot = serde_json::from_str(SAMPLE).unwrap();
        let snapshot = snapshot.parse_timestamps();

        assert_eq!(snapshot.zone, "DK-DK2");
        assert_eq!(snapshot.updated_at, "2018-11-26T17:25:24.685Z");

        let expected = Utc.with_ymd_and_hms(2018, 11, 26, 17, 25, 24).unwrap()
            + chrono::Duration::milliseconds(685);
        assert_eq!(snapshot.parsed_updated_at, Some(expected));

        assert_eq!(snapshot.forecast[0].carbon_intensity, 326);
        assert_eq!(snapshot.forecast[2].datetime, "2018-11-28T17:00:00.000Z");

        let expected = Utc.with_ymd_and_hms(2018, 11, 28, 17, 0, 0).unwrap();
        assert_eq!(snapshot.forecast[2].parsed_datetime, Some(expected));
    }

    #[test]
    fn parsing_is_idempotent() {
        let snapshot: ForecastSnapshot = serde_json::from_str(SAMPLE).unwrap();
        let once = snapshot.parse_timestamps();
        let twice = once.clone().parse_timestamps();
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_timestamps_parse_to_none() {
        let snapshot = ForecastSnapshot {
            zone: "DK-DK2".to_string(),
            forecast: vec![
                ForecastEntry {
                    carbon_intensity: 100,
                    datetime: "not-a-date".to_string(),
                    parsed_datetime: None,
                },
                ForecastEntry {
                    carbon_intensity: 200,
                    datetime: "2018-11-26T18:00:00.000Z".to_string(),
                    parsed_datetime: None,
                },
            ],
            updated_at: "2018-11-26 17:25".to_string(),
            parsed_updated_at: None,
        };

        let snapshot = snapshot.parse_timestamps();
        assert_eq!(snapshot.forecast[0].parsed_datetime, None);
        assert!(snapshot.forecast[1].parsed_datetime.is_some());
        assert_eq!(snapshot.parsed_updated_at, None);
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let snapshot: ForecastSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, ForecastSnapshot::default());

        let snapshot: ForecastSnapshot =
            serde_json::from_str(r#"{"zone": "SE"}"#).unwrap();
        assert_eq!(snapshot.zone, "SE");
        assert!(snapshot.forecast.is_empty());
        assert_eq!(snapshot.updated_at, "");
    }

    #[test]
    fn staleness_window_is_24_hours() {
        let now = Utc.with_ymd_and_hms(2018, 11, 27, 18, 0, 0).unwrap();

        let mut snapshot = ForecastSnapshot::default();
        assert!(snapshot.is_stale(now), "unparsed updatedAt counts as stale");

        snapshot.parsed_updated_at = Some(now - chrono::Duration::hours(25));
        assert!(snapshot.is_stale(now));

        snapshot.parsed_updated_at = Some(now - chrono::Duration::hours(23));
        assert!(!snapshot.is_stale(now));

        snapshot.parsed_updated_at = Some(now - chrono::Duration::hours(24));
        assert!(!snapshot.is_stale(now), "exactly 24 hours is still fresh");
    }

    #[test]
    fn parse_round_trips_to_hour_key() {
        for raw in ["2018-11-26T17:00:00.000Z", "2024-02-29T05:30:15.123Z"] {
            let parsed = parse_timestamp(raw).unwrap();
            assert_eq!(parsed.format("%Y-%m-%dT%H").to_string(), raw[..13]);
        }
    }
}
