//! # Nullifier Derivation
//!
//! `nullifier = SHA256("cohort.nullifier.v1" || 0x00 || commitment || len(message) || message)`
//!
//! The nullifier is a deterministic function of `(commitment, message)`:
//! the same member acting on the same message always produces the same
//! tag, which is what lets the host reject double actions. Different
//! messages give unlinkable tags. The message is length-prefixed so that
//! no two distinct messages share an encoding.

use cohort_core::{Commitment, Nullifier, Sha256Accumulator};

const NULLIFIER_DOMAIN: &[u8] = b"cohort.nullifier.v1";

/// Derive the nullifier for `commitment` acting on `message`.
pub fn derive_nullifier(commitment: &Commitment, message: &str) -> Nullifier {
    let mut acc = Sha256Accumulator::new();
    acc.update(NULLIFIER_DOMAIN);
    acc.update([0x00]);
    acc.update(commitment.as_bytes());
    acc.update_prefixed(message.as_bytes());
    Nullifier::from_bytes(acc.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_nullifier() {
        let c = Commitment::from_u64(42);
        assert_eq!(derive_nullifier(&c, "upvote-42"), derive_nullifier(&c, "upvote-42"));
    }

    #[test]
    fn different_messages_differ() {
        let c = Commitment::from_u64(42);
        assert_ne!(derive_nullifier(&c, "upvote-1"), derive_nullifier(&c, "upvote-2"));
        assert_ne!(derive_nullifier(&c, ""), derive_nullifier(&c, " "));
    }

    #[test]
    fn different_members_differ() {
        let a = Commitment::from_u64(1);
        let b = Commitment::from_u64(2);
        assert_ne!(derive_nullifier(&a, "post"), derive_nullifier(&b, "post"));
    }

    #[test]
    fn nullifier_is_not_the_leaf_hash() {
        let c = Commitment::from_u64(3);
        let leaf = crate::hash::leaf_hash(&c);
        assert_ne!(derive_nullifier(&c, "").as_bytes(), leaf.as_bytes());
    }
}
