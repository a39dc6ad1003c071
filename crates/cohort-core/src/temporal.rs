//! # Temporal Types
//!
//! UTC-only timestamp used for proof generation times and census snapshots.
//! Serialized form is ISO 8601 with a `Z` suffix.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A UTC timestamp.
///
/// Serializes to ISO 8601 (e.g., `2026-01-15T12:00:00Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The timestamp shifted back by `d`.
    pub fn minus(&self, d: Duration) -> Self {
        Self(self.0 - d)
    }

    /// Return the timestamp as an ISO 8601 string with Z suffix,
    /// truncated to seconds.
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
