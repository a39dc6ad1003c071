//! # Identity
//!
//! A member's private identity: a 32-byte random secret and the public
//! commitment derived from it.
//!
//! ```text
//! commitment = truncate_to_field(SHA256("cohort.identity.v1" || 0x00 || secret))
//! ```
//!
//! Truncation clears the top three bits of the digest, which always lands
//! below the BN254 scalar modulus. Derivation is deterministic: restoring
//! the same secret always yields the same commitment.
//!
//! ## Security Invariant
//!
//! The secret is zeroized on drop, redacted from `Debug`, and compared in
//! constant time. Only [`Identity::secret_hex`] exposes it, and that
//! returns a `Zeroizing<String>` so the exported copy is wiped as well.

use cohort_core::digest::{hex_to_32bytes, to_hex};
use cohort_core::{Commitment, Sha256Accumulator};
use rand_core::{CryptoRng, OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::IdentityError;

const IDENTITY_DOMAIN: &[u8] = b"cohort.identity.v1";

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct IdentitySecret([u8; 32]);

/// A member identity.
#[derive(Clone)]
pub struct Identity {
    secret: IdentitySecret,
    commitment: Commitment,
}

impl Identity {
    /// Generate a fresh identity from the operating system RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a fresh identity from the supplied RNG.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let identity = Self::from_secret_bytes(bytes);
        bytes.zeroize();
        identity
    }

    /// Restore an identity from its exported secret (64 hex characters).
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MalformedSecret`] if the text is not exactly
    /// 32 bytes of hex.
    pub fn restore(secret: &str) -> Result<Self, IdentityError> {
        let mut bytes =
            hex_to_32bytes(secret).map_err(|e| IdentityError::MalformedSecret(e.to_string()))?;
        let identity = Self::from_secret_bytes(bytes);
        bytes.zeroize();
        Ok(identity)
    }

    fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let commitment = derive_commitment(&bytes);
        Self {
            secret: IdentitySecret(bytes),
            commitment,
        }
    }

    /// The public commitment.
    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Export the secret as lowercase hex, for persistence by the caller.
    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(to_hex(&self.secret.0))
    }
}

fn derive_commitment(secret: &[u8; 32]) -> Commitment {
    let mut acc = Sha256Accumulator::new();
    acc.update(IDENTITY_DOMAIN);
    acc.update([0x00]);
    acc.update(secret);
    Commitment::from_digest_truncated(acc.finalize())
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.secret.0.ct_eq(&other.secret.0).into()
    }
}

impl Eq for Identity {}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("secret", &"<redacted>")
            .field("commitment", &self.commitment)
            .finish()
    }
}
