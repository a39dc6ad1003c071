//! # Hash Primitive
//!
//! Domain-separated SHA-256 over 32-byte values:
//! - Leaf: `SHA256(0x00 || commitment_be_bytes)`.
//! - Node: `SHA256(0x01 || left || right)`.
//! - Empty leaf: `SHA256(0x02)`.
//!
//! Empty positions in a fixed-depth tree take the zero-subtree value of
//! their level: `z[0] = empty_leaf()`, `z[i+1] = node(z[i], z[i])`. The
//! empty leaf is in its own domain, so no commitment (including `0`) can
//! stand in for an unoccupied slot.
//!
//! The scheme is fixed for the lifetime of a deployed group. Changing it
//! changes every root and invalidates every outstanding proof.

use cohort_core::{Commitment, NodeHash, Sha256Accumulator};

/// Identifier of the hashing scheme. Bump the suffix on any change.
pub const HASH_SCHEME: &str = "sha256-domain-separated-v1";

const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;
const EMPTY_TAG: u8 = 0x02;

/// Hash a commitment into a leaf node.
pub fn leaf_hash(commitment: &Commitment) -> NodeHash {
    let mut acc = Sha256Accumulator::new();
    acc.update([LEAF_TAG]);
    acc.update(commitment.as_bytes());
    NodeHash::from_bytes(acc.finalize())
}

/// Combine two children into their parent.
pub fn node_hash(left: &NodeHash, right: &NodeHash) -> NodeHash {
    let mut acc = Sha256Accumulator::new();
    acc.update([NODE_TAG]);
    acc.update(left.as_bytes());
    acc.update(right.as_bytes());
    NodeHash::from_bytes(acc.finalize())
}

/// Hash of an unoccupied leaf slot.
pub fn empty_leaf() -> NodeHash {
    let mut acc = Sha256Accumulator::new();
    acc.update([EMPTY_TAG]);
    NodeHash::from_bytes(acc.finalize())
}

/// Zero-subtree hashes for levels `0..=depth`. The last entry is the root of
/// an empty tree of that depth.
pub fn zero_hashes(depth: usize) -> Vec<NodeHash> {
    let mut zeros = Vec::with_capacity(depth + 1);
    let mut current = empty_leaf();
    zeros.push(current);
    for _ in 0..depth {
        current = node_hash(&current, &current);
        zeros.push(current);
    }
    zeros
}
