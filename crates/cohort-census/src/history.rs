//! # Census History
//!
//! An ordered record of snapshots, with the time-window queries the
//! dashboard needs: snapshots since a cutoff, and member growth over the
//! last day, week and month.
//!
//! Growth over a window is `current - baseline`, where `current` is the
//! latest snapshot at or before `now` and `baseline` is the latest snapshot
//! at or before the window start. A missing snapshot counts as zero
//! members, so a group younger than the window reports its full size.

use chrono::Duration;
use cohort_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::snapshot::CensusSnapshot;

/// Member-count deltas over trailing windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Growth {
    /// Change over the last 24 hours.
    pub last_24h: i64,
    /// Change over the last 7 days.
    pub last_7d: i64,
    /// Change over the last 30 days.
    pub last_30d: i64,
}

/// Snapshots ordered by timestamp.
///
/// Serialized as a plain array. Deserialization re-sorts, so a history read
/// from an out-of-order array answers queries the same as one built with
/// [`CensusHistory::record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CensusSnapshot>", into = "Vec<CensusSnapshot>")]
pub struct CensusHistory {
    snapshots: Vec<CensusSnapshot>,
}

impl From<Vec<CensusSnapshot>> for CensusHistory {
    fn from(mut snapshots: Vec<CensusSnapshot>) -> Self {
        // Stable, so equal timestamps keep their array order.
        snapshots.sort_by_key(|s| s.timestamp);
        Self { snapshots }
    }
}

impl From<CensusHistory> for Vec<CensusSnapshot> {
    fn from(history: CensusHistory) -> Self {
        history.snapshots
    }
}

impl CensusHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot, keeping timestamp order. Snapshots with equal
    /// timestamps keep insertion order.
    pub fn record(&mut self, snapshot: CensusSnapshot) {
        let at = self
            .snapshots
            .partition_point(|s| s.timestamp <= snapshot.timestamp);
        self.snapshots.insert(at, snapshot);
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot has been recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[CensusSnapshot] {
        &self.snapshots
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> Option<&CensusSnapshot> {
        self.snapshots.last()
    }

    /// Snapshots with `timestamp >= cutoff`, oldest first.
    pub fn since(&self, cutoff: Timestamp) -> &[CensusSnapshot] {
        let start = self.snapshots.partition_point(|s| s.timestamp < cutoff);
        &self.snapshots[start..]
    }

    /// Latest snapshot at or before `at`.
    pub fn at_or_before(&self, at: Timestamp) -> Option<&CensusSnapshot> {
        let end = self.snapshots.partition_point(|s| s.timestamp <= at);
        end.checked_sub(1).map(|i| &self.snapshots[i])
    }

    /// Member growth over the trailing 24h, 7d and 30d windows ending at
    /// `now`.
    pub fn growth(&self, now: Timestamp) -> Growth {
        let count_at = |at: Timestamp| -> i64 {
            self.at_or_before(at)
                .map(|s| s.total_count as i64)
                .unwrap_or(0)
        };
        let current = count_at(now);
        let delta = |window: Duration| current - count_at(now.minus(window));
        Growth {
            last_24h: delta(Duration::hours(24)),
            last_7d: delta(Duration::days(7)),
            last_30d: delta(Duration::days(30)),
        }
    }
}
