//! # Shared Group
//!
//! A membership group behind a `parking_lot::RwLock`, for hosts that keep
//! one group in memory across requests and refresh it from a registry.
//!
//! Readers (root lookups, proof generation) share the lock; membership
//! changes take it exclusively. Every mutation is applied in full under a
//! single write guard, so a reader never observes a half-updated tree: the
//! root it reads always matches the leaves it reads alongside it.

use std::sync::Arc;

use cohort_core::{Commitment, NodeHash};
use parking_lot::RwLock;

use crate::error::GroupError;
use crate::group::{Group, MerkleProof, RebuildReport};

/// What [`SharedGroup::sync`] had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The registry only grew; this many new leaves were appended.
    Appended(usize),
    /// The registry diverged from the cached order; the group was rebuilt.
    Rebuilt(RebuildReport),
}

/// Thread-safe, cloneable handle to a membership group.
#[derive(Debug)]
pub struct SharedGroup {
    inner: Arc<RwLock<Group>>,
}

impl Clone for SharedGroup {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedGroup {
    /// Create an empty shared group of the given depth.
    pub fn new(max_depth: usize) -> Result<Self, GroupError> {
        Ok(Self::from_group(Group::new(max_depth)?))
    }

    /// Wrap an existing group.
    pub fn from_group(group: Group) -> Self {
        Self {
            inner: Arc::new(RwLock::new(group)),
        }
    }

    /// Current root.
    pub fn root(&self) -> NodeHash {
        self.inner.read().root()
    }

    /// Current size.
    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    /// Whether `commitment` is a member.
    pub fn contains(&self, commitment: &Commitment) -> bool {
        self.inner.read().contains(commitment)
    }

    /// Append one commitment.
    pub fn insert(&self, commitment: Commitment) -> Result<usize, GroupError> {
        self.inner.write().insert(commitment)
    }

    /// Sibling path for `commitment`, with the root it was computed against.
    pub fn proof_for(&self, commitment: &Commitment) -> Result<MerkleProof, GroupError> {
        let guard = self.inner.read();
        let index = guard.index_of(commitment)?;
        guard.merkle_proof(index)
    }

    /// Replace the membership from registry text.
    pub fn rebuild<I, S>(&self, entries: I) -> RebuildReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.write().rebuild(entries)
    }

    /// Bring the group in line with `latest`, the registry's full ordered
    /// commitment list.
    ///
    /// When the cached members are a prefix of `latest` and every new entry
    /// appends cleanly, only the tail is inserted. Otherwise (a member was
    /// removed or reordered, or an appended entry was rejected) the group is
    /// rebuilt from `latest`.
    pub fn sync(&self, latest: &[Commitment]) -> SyncOutcome {
        let mut guard = self.inner.write();
        let current = guard.size();
        if latest.len() >= current && guard.members() == &latest[..current] {
            let mut staged = guard.clone();
            let appended = latest[current..]
                .iter()
                .try_for_each(|c| staged.insert(*c).map(|_| ()));
            if appended.is_ok() {
                *guard = staged;
                let added = latest.len() - current;
                tracing::debug!(added, root = %guard.root(), "appended new members to shared group");
                return SyncOutcome::Appended(added);
            }
        }
        tracing::info!(
            cached = current,
            latest = latest.len(),
            "registry diverged from cached group; rebuilding"
        );
        SyncOutcome::Rebuilt(guard.rebuild_from_commitments(latest.iter().copied()))
    }

    /// Clone the current group for lock-free use.
    pub fn snapshot(&self) -> Group {
        self.inner.read().clone()
    }

    /// Run `f` against the group under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&Group) -> R) -> R {
        f(&self.inner.read())
    }
}
