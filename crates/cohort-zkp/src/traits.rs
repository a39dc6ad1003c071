//! # Proof System Trait
//!
//! Defines the abstract interface for membership proof backends. A backend
//! binds a proof to a [`PublicStatement`]: the root, depth, nullifier,
//! message and commitment a bundle claims.
//!
//! ## Security Invariant
//!
//! The trait is sealed. Only backends defined in this crate may implement
//! it, so an unaudited backend cannot be slotted in behind
//! [`crate::ProofEngine`]. Implementations require `Send + Sync`, and
//! proof generation and verification are pure functions with no side
//! effects.

use cohort_core::{CohortError, Commitment};
use cohort_crypto::GroupError;
use thiserror::Error;

use crate::statement::PublicStatement;

/// Error during proof generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The identity's commitment is not in the group and the engine is
    /// configured to fail closed.
    #[error("commitment {0} is not a member of the group")]
    NotAMember(Commitment),

    /// The group could not produce a path for the member.
    #[error("group error: {0}")]
    Group(#[from] GroupError),

    /// The backend could not produce a proof.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof bytes are not in the backend's format.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

impl From<ProofError> for CohortError {
    fn from(err: ProofError) -> Self {
        CohortError::Proof(Box::new(err))
    }
}

/// Abstract interface for a membership proof system.
///
/// Each implementation provides its own proof and key types.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// The proof type produced by this system.
    type Proof: Clone + Send + Sync;
    /// The verifying key type.
    type VerifyingKey: Clone + Send + Sync;
    /// The proving key type.
    type ProvingKey: Send + Sync;

    /// Generate a proof for `statement`.
    fn prove(
        &self,
        pk: &Self::ProvingKey,
        statement: &PublicStatement,
    ) -> Result<Self::Proof, ProofError>;

    /// Verify `proof` against `statement`.
    ///
    /// `Ok(false)` means a well-formed proof for a different statement;
    /// `Err` means the proof could not be interpreted at all.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        statement: &PublicStatement,
    ) -> Result<bool, VerifyError>;
}

mod private {
    pub trait Sealed {}
    impl Sealed for crate::mock::MockProofSystem {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_crypto::CapacityError;

    #[test]
    fn not_a_member_display_names_commitment() {
        let err = ProofError::NotAMember(Commitment::from_u64(31337));
        assert_eq!(format!("{err}"), "commitment 31337 is not a member of the group");
    }

    #[test]
    fn group_errors_convert() {
        let err: ProofError = GroupError::from(CapacityError::Full { capacity: 2 }).into();
        assert!(matches!(err, ProofError::Group(_)));
        assert!(format!("{err}").contains("full"));
    }

    #[test]
    fn proof_error_converts_into_cohort_error() {
        let err: CohortError = ProofError::GenerationFailed("backend offline".into()).into();
        match &err {
            CohortError::Proof(source) => assert!(source.to_string().contains("backend offline")),
            other => panic!("expected Proof, got: {other:?}"),
        }

        let outsider = Commitment::from_u64(31337);
        let err: CohortError = ProofError::NotAMember(outsider).into();
        match err.downcast_ref::<ProofError>() {
            Some(ProofError::NotAMember(c)) => assert_eq!(*c, outsider),
            other => panic!("expected NotAMember, got: {other:?}"),
        }
    }
}
