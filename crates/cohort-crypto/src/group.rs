//! # Merkle Group
//!
//! An ordered set of identity commitments accumulated into a binary Merkle
//! tree of fixed depth. Leaf `i` is the `i`-th inserted commitment; empty
//! leaves are padded with the zero-subtree hashes from [`crate::hash`].
//!
//! ## Storage
//!
//! Only the occupied prefix of each level is stored: level `l` holds
//! `ceil(size / 2^l)` nodes. Anything to the right of that prefix is a zero
//! subtree and is looked up in the zero table. An insert touches one node
//! per level, so it is O(depth); so is proof generation.
//!
//! ## Invariants
//!
//! - The root is a pure function of the ordered leaf list.
//! - The cached root is recomputed on every mutation, never lazily.
//! - Leaf indices never change once assigned. There is no delete; use
//!   [`Group::rebuild`] to replace the whole membership.
//! - A commitment appears at most once.

use std::collections::HashMap;

use cohort_core::config::{MAX_TREE_DEPTH, MIN_TREE_DEPTH};
use cohort_core::{Commitment, NodeHash, ParseError};
use serde::{Deserialize, Serialize};

use crate::error::{CapacityError, GroupError};
use crate::hash::{leaf_hash, node_hash, zero_hashes};

// ---------------------------------------------------------------------------
// Inclusion proofs
// ---------------------------------------------------------------------------

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left child; the running hash is the right child.
    Left,
    /// Sibling is the right child; the running hash is the left child.
    Right,
}

/// One step of a sibling path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Which side the sibling is on.
    pub side: Side,
    /// The sibling digest.
    pub sibling: NodeHash,
}

/// Inclusion proof for one leaf, ordered leaf to root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The proven commitment.
    pub leaf: Commitment,
    /// Position of the leaf in insertion order.
    pub leaf_index: usize,
    /// Root the path folds to.
    pub root: NodeHash,
    /// Exactly `depth` steps.
    pub path: Vec<PathStep>,
}

impl MerkleProof {
    /// Tree depth implied by the path length.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Fold a sibling path starting from `leaf`.
pub fn compute_root(leaf: &Commitment, path: &[PathStep]) -> NodeHash {
    path.iter().fold(leaf_hash(leaf), |running, step| match step.side {
        Side::Left => node_hash(&step.sibling, &running),
        Side::Right => node_hash(&running, &step.sibling),
    })
}

/// Check an inclusion proof.
///
/// Returns `false` rather than an error for malformed proofs: an empty or
/// over-long path, a leaf index that does not fit in the path, or sides
/// that disagree with the index bits.
pub fn verify_merkle_proof(proof: &MerkleProof) -> bool {
    let depth = proof.path.len();
    if !(MIN_TREE_DEPTH..=MAX_TREE_DEPTH).contains(&depth) {
        return false;
    }
    if (proof.leaf_index as u64) >= (1u64 << depth) {
        return false;
    }
    for (level, step) in proof.path.iter().enumerate() {
        let is_right_child = (proof.leaf_index >> level) & 1 == 1;
        let expected = if is_right_child { Side::Left } else { Side::Right };
        if step.side != expected {
            return false;
        }
    }
    compute_root(&proof.leaf, &proof.path) == proof.root
}

// ---------------------------------------------------------------------------
// Rebuild reporting
// ---------------------------------------------------------------------------

/// Why a rebuild entry was not inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The text was not a valid commitment.
    Unparseable(ParseError),
    /// An earlier entry had the same commitment.
    Duplicate,
    /// The group was already full.
    CapacityExceeded,
}

/// A rebuild entry that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Zero-based position in the input sequence.
    pub position: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of [`Group::rebuild`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Number of leaves in the rebuilt group.
    pub inserted: usize,
    /// Entries that were dropped, in input order.
    pub skipped: Vec<SkippedEntry>,
}

impl RebuildReport {
    /// Whether every entry made it into the group.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A fixed-depth Merkle accumulator over identity commitments.
#[derive(Debug, Clone)]
pub struct Group {
    depth: usize,
    /// `zeros[l]` is the empty-subtree hash at level `l`.
    zeros: Vec<NodeHash>,
    /// `levels[0]` are leaf hashes; `levels[depth]` holds the root once
    /// the group is non-empty.
    levels: Vec<Vec<NodeHash>>,
    members: Vec<Commitment>,
    positions: HashMap<Commitment, usize>,
}

impl Group {
    /// Create an empty group with capacity `2^max_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::DepthOutOfRange`] unless
    /// `1 <= max_depth <= 32`.
    pub fn new(max_depth: usize) -> Result<Self, GroupError> {
        if !(MIN_TREE_DEPTH..=MAX_TREE_DEPTH).contains(&max_depth) {
            return Err(CapacityError::DepthOutOfRange {
                depth: max_depth,
                min: MIN_TREE_DEPTH,
                max: MAX_TREE_DEPTH,
            }
            .into());
        }
        Ok(Self {
            depth: max_depth,
            zeros: zero_hashes(max_depth),
            levels: vec![Vec::new(); max_depth + 1],
            members: Vec::new(),
            positions: HashMap::new(),
        })
    }

    /// Tree depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Maximum number of leaves, `2^depth`.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in leaf order.
    pub fn members(&self) -> &[Commitment] {
        &self.members
    }

    /// The current root. For an empty group this is the empty-tree root of
    /// the configured depth.
    pub fn root(&self) -> NodeHash {
        self.levels[self.depth]
            .first()
            .copied()
            .unwrap_or(self.zeros[self.depth])
    }

    /// Leaf index of `commitment`.
    pub fn index_of(&self, commitment: &Commitment) -> Result<usize, GroupError> {
        self.positions
            .get(commitment)
            .copied()
            .ok_or(GroupError::NotFound(*commitment))
    }

    /// Whether `commitment` is a member.
    pub fn contains(&self, commitment: &Commitment) -> bool {
        self.positions.contains_key(commitment)
    }

    /// Append `commitment` as the next leaf and return its index.
    ///
    /// # Errors
    ///
    /// - [`GroupError::Duplicate`] if the commitment is already a member.
    /// - [`CapacityError::Full`] if all `2^depth` slots are taken.
    pub fn insert(&mut self, commitment: Commitment) -> Result<usize, GroupError> {
        if self.positions.contains_key(&commitment) {
            return Err(GroupError::Duplicate(commitment));
        }
        let index = self.members.len();
        if index as u64 >= self.capacity() {
            return Err(CapacityError::Full {
                capacity: self.capacity(),
            }
            .into());
        }

        let mut node = leaf_hash(&commitment);
        self.levels[0].push(node);
        let mut pos = index;
        for level in 0..self.depth {
            // The new leaf is the rightmost occupied position at every
            // level, so a right sibling is always a zero subtree.
            node = if pos % 2 == 0 {
                node_hash(&node, &self.zeros[level])
            } else {
                node_hash(&self.levels[level][pos - 1], &node)
            };
            pos /= 2;
            let parent = &mut self.levels[level + 1];
            if pos < parent.len() {
                parent[pos] = node;
            } else {
                parent.push(node);
            }
        }

        self.members.push(commitment);
        self.positions.insert(commitment, index);
        Ok(index)
    }

    /// Insert several commitments in order, stopping at the first failure.
    /// Commitments inserted before the failure stay in the group.
    pub fn insert_many<I>(&mut self, commitments: I) -> Result<(), GroupError>
    where
        I: IntoIterator<Item = Commitment>,
    {
        for c in commitments {
            self.insert(c)?;
        }
        Ok(())
    }

    /// Sibling path for the leaf at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::IndexOutOfRange`] if `index >= size()`.
    pub fn merkle_proof(&self, index: usize) -> Result<MerkleProof, GroupError> {
        if index >= self.members.len() {
            return Err(GroupError::IndexOutOfRange {
                index,
                size: self.members.len(),
            });
        }
        let mut path = Vec::with_capacity(self.depth);
        let mut pos = index;
        for level in 0..self.depth {
            let sibling_pos = pos ^ 1;
            let sibling = self.levels[level]
                .get(sibling_pos)
                .copied()
                .unwrap_or(self.zeros[level]);
            let side = if sibling_pos < pos { Side::Left } else { Side::Right };
            path.push(PathStep { side, sibling });
            pos /= 2;
        }
        Ok(MerkleProof {
            leaf: self.members[index],
            leaf_index: index,
            root: self.root(),
            path,
        })
    }

    /// Discard all members and reinsert `entries` in order.
    ///
    /// This is the refresh-from-registry path: the group is not the system
    /// of record, so one bad record must not take the group down. Entries
    /// that fail to parse, repeat an earlier commitment, or overflow the
    /// capacity are logged and skipped.
    pub fn rebuild<I, S>(&mut self, entries: I) -> RebuildReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clear();
        let mut report = RebuildReport::default();
        for (position, entry) in entries.into_iter().enumerate() {
            let raw = entry.as_ref();
            match Commitment::parse(raw) {
                Ok(commitment) => self.rebuild_insert(position, commitment, &mut report),
                Err(e) => {
                    tracing::warn!(position, entry = %raw, error = %e, "skipping unparseable commitment during rebuild");
                    report.skipped.push(SkippedEntry {
                        position,
                        reason: SkipReason::Unparseable(e),
                    });
                }
            }
        }
        report.inserted = self.members.len();
        tracing::info!(
            members = report.inserted,
            skipped = report.skipped.len(),
            root = %self.root(),
            "rebuilt membership group"
        );
        report
    }

    /// Like [`Group::rebuild`] for already-parsed commitments.
    pub fn rebuild_from_commitments<I>(&mut self, commitments: I) -> RebuildReport
    where
        I: IntoIterator<Item = Commitment>,
    {
        self.clear();
        let mut report = RebuildReport::default();
        for (position, commitment) in commitments.into_iter().enumerate() {
            self.rebuild_insert(position, commitment, &mut report);
        }
        report.inserted = self.members.len();
        tracing::info!(
            members = report.inserted,
            skipped = report.skipped.len(),
            root = %self.root(),
            "rebuilt membership group"
        );
        report
    }

    fn rebuild_insert(&mut self, position: usize, commitment: Commitment, report: &mut RebuildReport) {
        match self.insert(commitment) {
            Ok(_) => {}
            Err(GroupError::Duplicate(c)) => {
                tracing::warn!(position, commitment = %c, "skipping duplicate commitment during rebuild");
                report.skipped.push(SkippedEntry {
                    position,
                    reason: SkipReason::Duplicate,
                });
            }
            Err(e) => {
                tracing::warn!(position, commitment = %commitment, error = %e, "skipping commitment during rebuild");
                report.skipped.push(SkippedEntry {
                    position,
                    reason: SkipReason::CapacityExceeded,
                });
            }
        }
    }

    fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
        self.members.clear();
        self.positions.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
