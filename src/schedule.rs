//! Hour-boundary arithmetic for the refresh timer.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::time::Duration;

/// The next wall-clock `:00:00` mark strictly after `now`.
pub fn next_hour_boundary(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now) + TimeDelta::hours(1)
}

/// How long to sleep from `now` until the next hour boundary.
pub fn until_next_hour(now: DateTime<Utc>) -> Duration {
    (next_hour_boundary(now) - now).to_std().unwrap_or_default()
}
