//! # Proof Bundle
//!
//! The value a member hands to the host: everything the verifier needs to
//! check a membership claim for one message, with no secret material.
//!
//! Bundles serialize to JSON with hex digests, a decimal commitment and an
//! RFC 3339 timestamp so they can be carried across a network boundary and
//! verified after deserialization.

use cohort_core::{Commitment, NodeHash, Nullifier, Timestamp};
use cohort_crypto::{MerkleProof, PathStep};
use serde::{Deserialize, Serialize};

use crate::mock::MockProof;
use crate::statement::PublicStatement;

/// Whether a bundle carries a membership path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofStatus {
    /// Generated for a member; carries a path and a backend proof.
    Verified,
    /// Generated for a non-member under the degraded policy. Verification
    /// always rejects it.
    Unverified,
}

impl ProofStatus {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Unverified => "unverified",
        }
    }
}

impl std::fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A membership proof for one `(identity, group root, message)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// Group root at generation time.
    pub root: NodeHash,
    /// Tree depth.
    pub depth: usize,
    /// Nullifier for `(commitment, message)`.
    pub nullifier: Nullifier,
    /// The action message.
    pub message: String,
    /// The member's commitment.
    pub commitment: Commitment,
    /// Leaf index, absent for unverified bundles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_index: Option<usize>,
    /// Sibling path, leaf to root. Empty for unverified bundles.
    #[serde(default)]
    pub merkle_path: Vec<PathStep>,
    /// Whether this bundle carries a membership path.
    pub status: ProofStatus,
    /// When the bundle was generated.
    pub generated_at: Timestamp,
    /// Backend proof over the public statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<MockProof>,
}

impl ProofBundle {
    /// Whether the bundle claims membership.
    pub fn is_verified(&self) -> bool {
        self.status == ProofStatus::Verified
    }

    /// The public statement this bundle claims.
    pub fn statement(&self) -> PublicStatement {
        PublicStatement {
            root: self.root,
            depth: self.depth,
            nullifier: self.nullifier,
            message: self.message.clone(),
            commitment: self.commitment,
        }
    }

    /// The inclusion proof carried by the bundle, if any.
    pub fn merkle_proof(&self) -> Option<MerkleProof> {
        let leaf_index = self.leaf_index?;
        Some(MerkleProof {
            leaf: self.commitment,
            leaf_index,
            root: self.root,
            path: self.merkle_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unverified() -> ProofBundle {
        ProofBundle {
            root: NodeHash::from_bytes([1; 32]),
            depth: 4,
            nullifier: Nullifier::from_bytes([2; 32]),
            message: "post".into(),
            commitment: Commitment::from_u64(5),
            leaf_index: None,
            merkle_path: Vec::new(),
            status: ProofStatus::Unverified,
            generated_at: Timestamp::now(),
            proof: None,
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ProofStatus::Verified).unwrap(), "\"verified\"");
        assert_eq!(ProofStatus::Unverified.to_string(), "unverified");
    }

    #[test]
    fn unverified_bundle_omits_optional_fields() {
        let bundle = unverified();
        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json.get("leaf_index").is_none());
        assert!(json.get("proof").is_none());
        assert_eq!(json["commitment"], "5");
        assert_eq!(json["status"], "unverified");
        let back: ProofBundle = serde_json::from_value(json).unwrap();
        assert_eq!(back, bundle);
    }

    #[test]
    fn unverified_bundle_has_no_merkle_proof() {
        assert!(unverified().merkle_proof().is_none());
        assert!(!unverified().is_verified());
    }

    #[test]
    fn statement_mirrors_bundle_fields() {
        let b = unverified();
        let s = b.statement();
        assert_eq!(s.root, b.root);
        assert_eq!(s.message, b.message);
        assert_eq!(s.commitment, b.commitment);
    }
}
