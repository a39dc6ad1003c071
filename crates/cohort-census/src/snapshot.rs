//! # Census Snapshot
//!
//! Aggregates a group and its members' self-reported attributes into
//! counts. A snapshot carries the member total, the number of members who
//! joined in the preceding 24 hours, the group root it was taken against,
//! and one histogram per attribute name.
//!
//! ## Security Invariant
//!
//! Nothing per-member survives aggregation. Histograms map attribute
//! values to counts; member records are read once and dropped.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Duration;
use cohort_core::{AttributeSet, AttributeValue, NodeHash, Timestamp};
use cohort_crypto::Group;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Window for `active_count`.
pub const ACTIVE_WINDOW_HOURS: i64 = 24;

/// Attribute name → value → number of members reporting that value.
pub type Histograms = BTreeMap<String, BTreeMap<String, u64>>;

/// Unique identifier for a census snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    /// Generate a new random snapshot identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the census reads about one member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAttributes {
    /// When the member joined, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<Timestamp>,
    /// Attribute name → value.
    #[serde(default)]
    pub attributes: AttributeSet,
}

impl MemberAttributes {
    /// A record with no attributes and no join time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the join time.
    pub fn joined_at(mut self, at: Timestamp) -> Self {
        self.joined_at = Some(at);
        self
    }

    /// Add or replace one attribute.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Anything that can enumerate member attribute records.
pub trait AttributeSource {
    /// Call `visit` once per member.
    fn for_each_member(&self, visit: &mut dyn FnMut(&MemberAttributes));
}

impl AttributeSource for [MemberAttributes] {
    fn for_each_member(&self, visit: &mut dyn FnMut(&MemberAttributes)) {
        self.iter().for_each(visit);
    }
}

impl AttributeSource for Vec<MemberAttributes> {
    fn for_each_member(&self, visit: &mut dyn FnMut(&MemberAttributes)) {
        self.as_slice().for_each_member(visit);
    }
}

/// Aggregate view of the group at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusSnapshot {
    /// Snapshot identifier.
    pub id: SnapshotId,
    /// When the snapshot was taken.
    pub timestamp: Timestamp,
    /// Number of members in the group.
    pub total_count: u64,
    /// Members who joined within [`ACTIVE_WINDOW_HOURS`] of `timestamp`.
    pub active_count: u64,
    /// Group root at `timestamp`.
    pub root: NodeHash,
    /// Attribute histograms.
    pub histograms: Histograms,
}

impl CensusSnapshot {
    /// Count for one attribute value, zero if never reported.
    pub fn count(&self, attribute: &str, value: &str) -> u64 {
        self.histograms
            .get(attribute)
            .and_then(|h| h.get(value))
            .copied()
            .unwrap_or(0)
    }
}

/// Take a snapshot now.
pub fn snapshot<S>(group: &Group, source: &S) -> CensusSnapshot
where
    S: AttributeSource + ?Sized,
{
    snapshot_at(group, source, Timestamp::now())
}

/// Take a snapshot as of `now`.
pub fn snapshot_at<S>(group: &Group, source: &S, now: Timestamp) -> CensusSnapshot
where
    S: AttributeSource + ?Sized,
{
    let active_since = now.minus(Duration::hours(ACTIVE_WINDOW_HOURS));
    let mut histograms = Histograms::new();
    let mut active_count = 0u64;
    let mut records = 0usize;

    source.for_each_member(&mut |member: &MemberAttributes| {
        records += 1;
        if member
            .joined_at
            .is_some_and(|at| at >= active_since && at <= now)
        {
            active_count += 1;
        }
        for (name, value) in &member.attributes {
            let counts = histograms.entry(name.clone()).or_default();
            match value {
                AttributeValue::Single(v) => *counts.entry(v.clone()).or_default() += 1,
                AttributeValue::Multi(vs) => {
                    let distinct: BTreeSet<&String> = vs.iter().collect();
                    for v in distinct {
                        *counts.entry(v.clone()).or_default() += 1;
                    }
                }
            }
        }
    });

    let total_count = group.size() as u64;
    if records as u64 != total_count {
        tracing::warn!(
            group_size = total_count,
            attribute_records = records,
            "attribute source and group disagree on member count"
        );
    }

    CensusSnapshot {
        id: SnapshotId::new(),
        timestamp: now,
        total_count,
        active_count,
        root: group.root(),
        histograms,
    }
}
