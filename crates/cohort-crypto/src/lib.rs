//! # cohort-crypto — Membership Accumulator and Identities
//!
//! Provides the cryptographic building blocks of Cohort:
//!
//! - **Hash primitive** (`hash`): domain-separated SHA-256 leaf and node
//!   hashing plus the zero-subtree table for fixed-depth trees.
//! - **Merkle group** (`group`): an ordered, append-only set of identity
//!   commitments with a cached root and sibling-path inclusion proofs.
//! - **Identity** (`identity`): random secrets and their deterministic
//!   commitments.
//! - **Nullifiers** (`nullifier`): the per-(commitment, message) tag.
//! - **Shared group** (`shared`): a read-write-locked group for callers that
//!   cache one across requests.
//!
//! ## Crate Policy
//!
//! - Depends only on `cohort-core` internally.
//! - No mocking of hashing in tests: all tests use real SHA-256.
//! - No I/O. Every operation is pure in-memory computation.

pub mod error;
pub mod group;
pub mod hash;
pub mod identity;
pub mod nullifier;
pub mod shared;

// Re-export primary types.
pub use error::{CapacityError, GroupError, IdentityError};
pub use group::{
    compute_root, verify_merkle_proof, Group, MerkleProof, PathStep, RebuildReport, Side,
    SkipReason, SkippedEntry,
};
pub use hash::{empty_leaf, leaf_hash, node_hash, zero_hashes, HASH_SCHEME};
pub use identity::Identity;
pub use nullifier::derive_nullifier;
pub use shared::{SharedGroup, SyncOutcome};
