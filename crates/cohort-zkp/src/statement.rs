//! # Public Statement
//!
//! The public half of a membership claim: "the holder of `commitment` is a
//! leaf of the depth-`depth` tree with root `root`, and `nullifier` is its
//! tag for `message`". Backends bind proofs to the canonical byte encoding
//! of this statement.

use cohort_core::{Commitment, NodeHash, Nullifier, Sha256Accumulator};
use cohort_crypto::HASH_SCHEME;

/// Public inputs a proof is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicStatement {
    /// Group root the proof was generated against.
    pub root: NodeHash,
    /// Tree depth.
    pub depth: usize,
    /// Nullifier for `(commitment, message)`.
    pub nullifier: Nullifier,
    /// The action message.
    pub message: String,
    /// The member's commitment.
    pub commitment: Commitment,
}

impl PublicStatement {
    /// Canonical encoding:
    ///
    /// ```text
    /// len(scheme) || scheme || root || depth_u32_be || nullifier || commitment || len(message) || message
    /// ```
    ///
    /// Variable-length fields are length-prefixed so distinct statements
    /// never share an encoding.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + HASH_SCHEME.len() + 32 * 3 + 4 + 8 + self.message.len());
        out.extend_from_slice(&(HASH_SCHEME.len() as u64).to_be_bytes());
        out.extend_from_slice(HASH_SCHEME.as_bytes());
        out.extend_from_slice(self.root.as_bytes());
        out.extend_from_slice(&(self.depth as u32).to_be_bytes());
        out.extend_from_slice(self.nullifier.as_bytes());
        out.extend_from_slice(self.commitment.as_bytes());
        out.extend_from_slice(&(self.message.len() as u64).to_be_bytes());
        out.extend_from_slice(self.message.as_bytes());
        out
    }

    /// SHA-256 of the canonical encoding, hex-encoded. Useful as a log key.
    pub fn digest_hex(&self) -> String {
        let mut acc = Sha256Accumulator::new();
        acc.update(self.canonical_bytes());
        acc.finalize_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(message: &str) -> PublicStatement {
        PublicStatement {
            root: NodeHash::from_bytes([1; 32]),
            depth: 20,
            nullifier: Nullifier::from_bytes([2; 32]),
            message: message.to_string(),
            commitment: Commitment::from_u64(3),
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(statement("m").canonical_bytes(), statement("m").canonical_bytes());
        assert_eq!(statement("m").digest_hex().len(), 64);
    }

    #[test]
    fn every_field_affects_encoding() {
        let base = statement("m");
        let mut variants = vec![statement("n")];
        let mut v = base.clone();
        v.root = NodeHash::from_bytes([9; 32]);
        variants.push(v);
        let mut v = base.clone();
        v.depth = 21;
        variants.push(v);
        let mut v = base.clone();
        v.nullifier = Nullifier::from_bytes([9; 32]);
        variants.push(v);
        let mut v = base.clone();
        v.commitment = Commitment::from_u64(4);
        variants.push(v);
        for other in variants {
            assert_ne!(base.canonical_bytes(), other.canonical_bytes(), "{other:?}");
        }
    }

    #[test]
    fn encoding_starts_with_scheme() {
        let bytes = statement("").canonical_bytes();
        assert_eq!(&bytes[8..8 + HASH_SCHEME.len()], HASH_SCHEME.as_bytes());
    }
}
