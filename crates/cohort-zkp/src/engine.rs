//! # Proof Engine
//!
//! Generates and verifies membership proof bundles.
//!
//! ## Generation
//!
//! For a member, the engine takes the leaf's sibling path from the group,
//! derives the nullifier for the message, and has the backend bind a proof
//! to the resulting public statement. The bundle's root is the group root
//! at that moment.
//!
//! For a non-member, behaviour follows [`NonMemberPolicy`]: fail closed
//! with [`ProofError::NotAMember`] (default), or hand back a bundle tagged
//! [`ProofStatus::Unverified`] that verification always rejects.
//!
//! ## Verification
//!
//! [`ProofEngine::verify`] accepts a bundle only if it was generated
//! against the root and message the caller expects and is internally
//! consistent. It never errors or panics; [`ProofEngine::check`] runs the
//! same checks and reports the first failing one.
//!
//! ## Security Invariant
//!
//! Verification never trusts bundle fields it can recompute. The nullifier
//! is re-derived from the commitment and message, the path is folded from
//! the commitment, and the backend proof is checked against the statement
//! rebuilt from the bundle. A bundle whose status says `Verified` but
//! whose contents disagree is rejected.

use cohort_core::config::{MAX_TREE_DEPTH, MIN_TREE_DEPTH};
use cohort_core::{CohortConfig, NodeHash, NonMemberPolicy, Timestamp};
use cohort_crypto::{derive_nullifier, verify_merkle_proof, Group, Identity, SharedGroup};
use thiserror::Error;

use crate::bundle::{ProofBundle, ProofStatus};
use crate::mock::{MockProofSystem, MockProvingKey, MockVerifyingKey};
use crate::traits::{ProofError, ProofSystem, VerifyError};

/// Why a bundle was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The bundle was generated against a different root.
    #[error("root mismatch: expected {expected}, bundle has {actual}")]
    RootMismatch {
        /// Root the verifier expects.
        expected: NodeHash,
        /// Root in the bundle.
        actual: NodeHash,
    },

    /// The bundle is for a different message.
    #[error("message mismatch: expected {expected:?}, bundle has {actual:?}")]
    MessageMismatch {
        /// Message the verifier expects.
        expected: String,
        /// Message in the bundle.
        actual: String,
    },

    /// The bundle was issued to a non-member.
    #[error("bundle is unverified")]
    Unverified,

    /// The bundle carries no leaf index or no backend proof.
    #[error("bundle is missing {0}")]
    Incomplete(&'static str),

    /// The path length does not match the claimed depth, or the depth is
    /// unsupported.
    #[error("path has {path_len} steps for depth {depth}")]
    DepthMismatch {
        /// Claimed depth.
        depth: usize,
        /// Number of path steps.
        path_len: usize,
    },

    /// The path does not fold from the commitment to the root.
    #[error("merkle path does not lead to the bundle root")]
    InvalidPath,

    /// The nullifier is not the one derived from commitment and message.
    #[error("nullifier does not match commitment and message")]
    NullifierMismatch,

    /// The backend proof does not match the statement.
    #[error("proof does not match the public statement")]
    ProofMismatch,

    /// The backend proof could not be interpreted.
    #[error("backend rejected proof: {0}")]
    Backend(#[from] VerifyError),
}

/// Generates and verifies membership proof bundles.
#[derive(Debug, Clone, Default)]
pub struct ProofEngine {
    system: MockProofSystem,
    proving_key: MockProvingKey,
    verifying_key: MockVerifyingKey,
    policy: NonMemberPolicy,
}

impl ProofEngine {
    /// Create an engine with the given non-member policy.
    pub fn new(policy: NonMemberPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Create an engine from runtime configuration.
    pub fn from_config(config: &CohortConfig) -> Self {
        Self::new(config.non_member_policy)
    }

    /// The configured non-member policy.
    pub fn policy(&self) -> NonMemberPolicy {
        self.policy
    }

    /// Generate a bundle proving `identity` is in `group`, scoped to
    /// `message`.
    ///
    /// # Errors
    ///
    /// - [`ProofError::NotAMember`] if the commitment is absent and the
    ///   policy is [`NonMemberPolicy::FailClosed`].
    /// - [`ProofError::GenerationFailed`] if the backend fails.
    pub fn prove(
        &self,
        identity: &Identity,
        group: &Group,
        message: &str,
    ) -> Result<ProofBundle, ProofError> {
        let commitment = identity.commitment();
        let nullifier = derive_nullifier(&commitment, message);

        let Ok(index) = group.index_of(&commitment) else {
            return match self.policy {
                NonMemberPolicy::FailClosed => Err(ProofError::NotAMember(commitment)),
                NonMemberPolicy::DegradeUnverified => {
                    tracing::warn!(
                        commitment = %commitment,
                        group_size = group.size(),
                        "identity is not a group member; issuing unverified bundle"
                    );
                    Ok(ProofBundle {
                        root: group.root(),
                        depth: group.depth(),
                        nullifier,
                        message: message.to_string(),
                        commitment,
                        leaf_index: None,
                        merkle_path: Vec::new(),
                        status: ProofStatus::Unverified,
                        generated_at: Timestamp::now(),
                        proof: None,
                    })
                }
            };
        };

        let merkle = group.merkle_proof(index)?;
        let mut bundle = ProofBundle {
            root: merkle.root,
            depth: group.depth(),
            nullifier,
            message: message.to_string(),
            commitment,
            leaf_index: Some(index),
            merkle_path: merkle.path,
            status: ProofStatus::Verified,
            generated_at: Timestamp::now(),
            proof: None,
        };
        bundle.proof = Some(self.system.prove(&self.proving_key, &bundle.statement())?);
        tracing::debug!(
            leaf_index = index,
            root = %bundle.root,
            nullifier = %bundle.nullifier,
            "generated membership proof"
        );
        Ok(bundle)
    }

    /// Generate a bundle against a shared group, under its read lock.
    pub fn prove_shared(
        &self,
        identity: &Identity,
        group: &SharedGroup,
        message: &str,
    ) -> Result<ProofBundle, ProofError> {
        group.with_read(|g| self.prove(identity, g, message))
    }

    /// Whether `bundle` proves membership in the group with root
    /// `expected_root` for `expected_message`.
    pub fn verify(&self, bundle: &ProofBundle, expected_root: &NodeHash, expected_message: &str) -> bool {
        match self.check(bundle, expected_root, expected_message) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(
                    reason = %reason,
                    nullifier = %bundle.nullifier,
                    "rejected membership proof"
                );
                false
            }
        }
    }

    /// Run every verification check, reporting the first that fails.
    pub fn check(
        &self,
        bundle: &ProofBundle,
        expected_root: &NodeHash,
        expected_message: &str,
    ) -> Result<(), Rejection> {
        if bundle.root != *expected_root {
            return Err(Rejection::RootMismatch {
                expected: *expected_root,
                actual: bundle.root,
            });
        }
        if bundle.message != expected_message {
            return Err(Rejection::MessageMismatch {
                expected: expected_message.to_string(),
                actual: bundle.message.clone(),
            });
        }
        if bundle.status != ProofStatus::Verified {
            return Err(Rejection::Unverified);
        }
        if !(MIN_TREE_DEPTH..=MAX_TREE_DEPTH).contains(&bundle.depth)
            || bundle.merkle_path.len() != bundle.depth
        {
            return Err(Rejection::DepthMismatch {
                depth: bundle.depth,
                path_len: bundle.merkle_path.len(),
            });
        }
        let merkle = bundle.merkle_proof().ok_or(Rejection::Incomplete("leaf index"))?;
        if !verify_merkle_proof(&merkle) {
            return Err(Rejection::InvalidPath);
        }
        if derive_nullifier(&bundle.commitment, &bundle.message) != bundle.nullifier {
            return Err(Rejection::NullifierMismatch);
        }
        let proof = bundle.proof.as_ref().ok_or(Rejection::Incomplete("backend proof"))?;
        if !self.system.verify(&self.verifying_key, proof, &bundle.statement())? {
            return Err(Rejection::ProofMismatch);
        }
        Ok(())
    }
}
