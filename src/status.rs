//! Current-hour status evaluation.

use crate::forecast::ForecastSnapshot;
use chrono::{DateTime, Utc};

/// Hour-granularity key, e.g. `2018-11-26T17`.
const HOUR_KEY_FORMAT: &str = "%Y-%m-%dT%H";

/// Display state derived from the cached forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A forecast entry matched the current hour.
    Current { intensity: i64, below_threshold: bool },
    /// No entry matched; the cache is stale or has a gap. This is the
    /// signal that a refresh is needed.
    Unknown,
}

impl Status {
    /// Menu bar title for this status.
    pub fn title(&self) -> String {
        match self {
            Status::Current { intensity, .. } => format!("CI: {}", intensity),
            Status::Unknown => "?".to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Status::Unknown)
    }

    pub fn is_below_threshold(&self) -> bool {
        matches!(
            self,
            Status::Current {
                below_threshold: true,
                ..
            }
        )
    }
}

/// Select the forecast entry for the current hour.
///
/// Matching is textual: the first 13 characters of the entry's raw
/// `datetime` (year through hour) must equal the UTC hour key, first
/// match wins. Entries not aligned to the top of the hour therefore
/// never match and the snapshot evaluates to [`Status::Unknown`].
pub fn evaluate(snapshot: &ForecastSnapshot, threshold: i64, now: DateTime<Utc>) -> Status {
    let key = now.format(HOUR_KEY_FORMAT).to_string();
    for entry in &snapshot.forecast {
        if entry.datetime.get(..13) == Some(key.as_str()) {
            return Status::Current {
                intensity: entry.carbon_intensity,
                below_threshold: entry.carbon_intensity < threshold,
            };
        }
    }
    Status::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastEntry;
    use chrono::TimeZone;

    fn snapshot_with(entries: &[(i64, &str)]) -> ForecastSnapshot {
        ForecastSnapshot {
            zone: "DK-DK2".to_string(),
            forecast: entries
                .iter()
                .map(|(intensity, datetime)| ForecastEntry {
                    carbon_intensity: *intensity,
                    datetime: datetime.to_string(),
                    parsed_datetime: None,
                })
                .collect(),
            updated_at: "2018-11-26T17:25:24.685Z".to_string(),
            parsed_updated_at: None,
        }
    }

    #[test]
    fn matching_hour_returns_entry_title() {
        let snapshot = snapshot_with(&[
            (326, "2018-11-26T17:00:00.000Z"),
            (297, "2018-11-26T18:00:00.000Z"),
        ]);
        let now = Utc.with_ymd_and_hms(2018, 11, 26, 17, 45, 12).unwrap();

        let status = evaluate(&snapshot, 200, now);
        assert_eq!(status.title(), "CI: 326");
        assert!(!status.is_unknown());
    }

    #[test]
    fn no_matching_hour_returns_unknown() {
        let snapshot = snapshot_with(&[
            (326, "2018-11-26T17:00:00.000Z"),
            (194, "2018-11-28T17:00:00.000Z"),
        ]);
        let now = Utc.with_ymd_and_hms(2018, 11, 27, 17, 0, 0).unwrap();

        let status = evaluate(&snapshot, 200, now);
        assert_eq!(status, Status::Unknown);
        assert_eq!(status.title(), "?");
    }

    #[test]
    fn threshold_comparison_is_strictly_below() {
        let snapshot = snapshot_with(&[(200, "2018-11-26T17:00:00.000Z")]);
        let now = Utc.with_ymd_and_hms(2018, 11, 26, 17, 0, 0).unwrap();

        assert!(evaluate(&snapshot, 201, now).is_below_threshold());
        assert!(!evaluate(&snapshot, 200, now).is_below_threshold());
        assert!(!evaluate(&snapshot, 150, now).is_below_threshold());
    }

    #[test]
    fn first_match_wins() {
        let snapshot = snapshot_with(&[
            (326, "2018-11-26T17:00:00.000Z"),
            (100, "2018-11-26T17:30:00.000Z"),
        ]);
        let now = Utc.with_ymd_and_hms(2018, 11, 26, 17, 10, 0).unwrap();

        assert_eq!(evaluate(&snapshot, 999, now).title(), "CI: 326");
    }

    #[test]
    fn short_datetime_never_matches() {
        let snapshot = snapshot_with(&[(326, "2018-11-26")]);
        let now = Utc.with_ymd_and_hms(2018, 11, 26, 17, 0, 0).unwrap();

        assert_eq!(evaluate(&snapshot, 200, now), Status::Unknown);
    }
}
