//! # cohort-core — Foundational Types for Cohort
//!
//! This crate is the leaf of the Cohort workspace. It defines the value
//! types that every other crate exchanges: identity commitments, Merkle
//! node digests, nullifiers, timestamps, member attributes, and the runtime
//! configuration.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for every 32-byte value.** A [`Commitment`], a
//!    [`NodeHash`], and a [`Nullifier`] are all 32 bytes, but they are
//!    distinct types. A nullifier cannot be passed where a root is expected.
//!
//! 2. **Commitments are field elements.** [`Commitment`] values are always
//!    strictly less than the BN254 scalar field modulus (`ark_bn254::Fr`). The constructor
//!    rejects anything else, so a commitment that exists is a valid leaf.
//!
//! 3. **Stable text forms.** Commitments render as decimal integers, digests
//!    and nullifiers as 64 lowercase hex characters. Serde uses the same
//!    forms so bundles survive a JSON round trip unchanged.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cohort-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod attributes;
pub mod config;
pub mod digest;
pub mod error;
pub mod field;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use attributes::{AttributeSet, AttributeValue};
pub use config::{CohortConfig, NonMemberPolicy};
pub use digest::{NodeHash, Nullifier, Sha256Accumulator};
pub use error::{BoxedSource, CohortError, ConfigError, ParseError};
pub use field::{Commitment, FIELD_MODULUS};
pub use temporal::Timestamp;
