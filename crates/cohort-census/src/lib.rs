//! # cohort-census — Anonymous Census Aggregation
//!
//! Aggregate statistics over a membership group:
//!
//! - **Snapshot** (`snapshot`): member total, members who joined in the
//!   last 24 hours, the current group root, and per-attribute histograms.
//! - **History** (`history`): ordered snapshots with cutoff queries and
//!   growth over the last day, week and month.
//!
//! ## Crate Policy
//!
//! - Depends on `cohort-core` and `cohort-crypto` internally.
//! - Output carries counts only. No commitments, identities or per-member
//!   records appear in a snapshot.
//! - Aggregation never fails. Empty input yields an empty snapshot.

pub mod history;
pub mod snapshot;

pub use history::{CensusHistory, Growth};
pub use snapshot::{
    snapshot, snapshot_at, AttributeSource, CensusSnapshot, Histograms,
    MemberAttributes, SnapshotId, ACTIVE_WINDOW_HOURS,
};

pub use cohort_core::{AttributeSet, AttributeValue};
