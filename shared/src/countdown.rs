/// Countdown to the public launch, shown while the site is in coming-soon mode.
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whole days/hours/minutes/seconds left until launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Time left from `now` until `launch`. All zero once launch has passed.
pub fn countdown_until(launch: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let left = launch.signed_duration_since(now);
    if left.num_milliseconds() <= 0 {
        return Countdown::default();
    }

    let total = left.num_seconds();
    Countdown {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
        seconds: total % 60,
    }
}
