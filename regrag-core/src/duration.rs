//! Stable duration type for wire serialization.
//!
//! [`DurationMs`] serializes as a plain integer (milliseconds) rather than
//! serde's internal `{"secs": N, "nanos": N}` layout, so tool-call timings
//! and metadata stay portable and human-readable on the wire.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration in milliseconds with a stable JSON serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMs(u64);

impl DurationMs {
    /// Zero duration.
    pub const ZERO: Self = Self(0);

    /// Create from milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Create from seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Get the value in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Convert to `std::time::Duration`.
    pub fn to_std(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Duration> for DurationMs {
    fn from(d: Duration) -> Self {
        Self(d.as_millis() as u64)
    }
}

impl From<DurationMs> for Duration {
    fn from(d: DurationMs) -> Self {
        Duration::from_millis(d.0)
    }
}

impl Default for DurationMs {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for DurationMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_integer() {
        let d = DurationMs::from_millis(1500);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "1500");
    }

    #[test]
    fn from_secs_saturates_instead_of_overflowing() {
        let d = DurationMs::from_secs(u64::MAX);
        assert_eq!(d.as_millis(), u64::MAX);
    }

    #[test]
    fn roundtrips_through_std_duration() {
        let std_dur = Duration::from_millis(42);
        let d: DurationMs = std_dur.into();
        let back: Duration = d.into();
        assert_eq!(std_dur, back);
    }
}
