//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// The inbound wire contract carries epoch-millisecond timestamps.
    /// Out-of-range values clamp to the epoch.
    pub fn from_unix_millis(millis: i64) -> Self {
        Self(
            Utc.timestamp_millis_opt(millis)
                .single()
                .unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap()),
        )
    }

    /// Returns the timestamp as Unix milliseconds.
    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Returns whole elapsed seconds from `other` to this timestamp,
    /// saturating at zero.
    pub fn seconds_since(&self, other: &Timestamp) -> u64 {
        self.duration_since(other).num_seconds().max(0) as u64
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0 + Duration::seconds(secs as i64))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn from_unix_millis_roundtrips() {
        let millis = 1_770_005_528_731_i64;
        let ts = Timestamp::from_unix_millis(millis);
        assert_eq!(ts.as_unix_millis(), millis);
    }

    #[test]
    fn seconds_since_saturates_at_zero() {
        let earlier = Timestamp::from_unix_millis(1_000);
        let later = Timestamp::from_unix_millis(61_000);

        assert_eq!(later.seconds_since(&earlier), 60);
        assert_eq!(earlier.seconds_since(&later), 0);
    }

    #[test]
    fn plus_secs_adds_correctly() {
        let ts = Timestamp::from_unix_millis(1_000);
        assert_eq!(ts.plus_secs(60).as_unix_millis(), 61_000);
    }

    #[test]
    fn ordering_works() {
        let ts1 = Timestamp::from_unix_millis(1);
        let ts2 = Timestamp::from_unix_millis(2);
        assert!(ts1 < ts2);
        assert!(ts1.is_before(&ts2));
        assert!(ts2.is_after(&ts1));
    }
}
