//! # Mock Proof System
//!
//! A deterministic, transparent proof backend. Produces SHA-256-based
//! "proofs" that are verifiable but provide **no zero-knowledge
//! guarantees**.
//!
//! ```text
//! proof = SHA256( "cohort.mock-proof.v1" || 0x00 || canonical_bytes(statement) )
//! ```
//!
//! Verification recomputes the digest and compares.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE.** Anyone can recompute the proof from the public
//! statement, and the statement carries the member's commitment. The proof
//! only binds a bundle's fields together; membership itself is established
//! by the Merkle path the bundle carries.

use cohort_core::Sha256Accumulator;
use serde::{Deserialize, Serialize};

use crate::statement::PublicStatement;
use crate::traits::{ProofError, ProofSystem, VerifyError};

const MOCK_PROOF_DOMAIN: &[u8] = b"cohort.mock-proof.v1";

/// A mock proof: hex-encoded SHA-256 over the domain tag and statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockProof {
    /// 64 lowercase hex characters.
    pub proof_hex: String,
}

/// Mock verifying key. Stateless.
#[derive(Debug, Clone, Default)]
pub struct MockVerifyingKey;

/// Mock proving key. Stateless.
#[derive(Debug, Clone, Default)]
pub struct MockProvingKey;

/// The deterministic mock backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProofSystem;

impl MockProofSystem {
    fn digest(statement: &PublicStatement) -> String {
        let mut acc = Sha256Accumulator::new();
        acc.update(MOCK_PROOF_DOMAIN);
        acc.update([0x00]);
        acc.update(statement.canonical_bytes());
        acc.finalize_hex()
    }
}

impl ProofSystem for MockProofSystem {
    type Proof = MockProof;
    type VerifyingKey = MockVerifyingKey;
    type ProvingKey = MockProvingKey;

    fn prove(
        &self,
        _pk: &Self::ProvingKey,
        statement: &PublicStatement,
    ) -> Result<Self::Proof, ProofError> {
        Ok(MockProof {
            proof_hex: Self::digest(statement),
        })
    }

    fn verify(
        &self,
        _vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        statement: &PublicStatement,
    ) -> Result<bool, VerifyError> {
        if proof.proof_hex.len() != 64 {
            return Err(VerifyError::MalformedProof(format!(
                "expected 64 hex chars, got {}",
                proof.proof_hex.len()
            )));
        }
        if !proof.proof_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VerifyError::MalformedProof(
                "proof_hex contains non-hex characters".to_string(),
            ));
        }
        Ok(proof.proof_hex.eq_ignore_ascii_case(&Self::digest(statement)))
    }
}
