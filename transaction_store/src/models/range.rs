//! Inclusive instant ranges used for store queries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` pair of UTC instants.
///
/// Stores return every transaction whose creation timestamp satisfies
/// `start <= created_at <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive start (UTC).
    pub start: DateTime<Utc>,
    /// Inclusive end (UTC).
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `end - start`. Negative when the bounds are reversed.
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}
