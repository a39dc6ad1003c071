//! # Digests — Merkle Nodes and Nullifiers
//!
//! 32-byte digest newtypes and the SHA-256 accumulator used to produce them.
//!
//! ## Security Invariant
//!
//! [`NodeHash`] and [`Nullifier`] are structurally identical but are kept as
//! separate types so that a nullifier can never be compared against a root
//! (or vice versa) by accident.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ParseError;

/// Number of hex characters in a 32-byte value.
pub const HEX_32_LEN: usize = 64;

/// Encode 32 bytes as lowercase hex.
pub fn to_hex(bytes: &[u8; 32]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a 64-char hex string (either case, surrounding whitespace ignored)
/// into 32 bytes.
pub fn hex_to_32bytes(hex: &str) -> Result<[u8; 32], ParseError> {
    let hex = hex.trim();
    if hex.is_empty() {
        return Err(ParseError::Empty);
    }
    if hex.len() != HEX_32_LEN {
        return Err(ParseError::InvalidLength {
            expected: HEX_32_LEN,
            actual: hex.len(),
        });
    }
    let mut out = [0u8; 32];
    for (i, ch) in hex.chars().enumerate() {
        let nibble = ch
            .to_digit(16)
            .ok_or(ParseError::InvalidCharacter { ch, position: i })? as u8;
        if i % 2 == 0 {
            out[i / 2] = nibble << 4;
        } else {
            out[i / 2] |= nibble;
        }
    }
    Ok(out)
}

/// Serde helper for 32-byte values encoded as hex strings.
pub mod hex32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_hex(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::hex_to_32bytes(&s).map_err(serde::de::Error::custom)
    }
}

/// Incremental SHA-256 over a sequence of byte slices.
///
/// Thin wrapper so that callers in other crates do not have to import
/// `sha2` traits just to hash a few concatenated fields.
#[derive(Clone, Default)]
pub struct Sha256Accumulator {
    hasher: Sha256,
}

impl Sha256Accumulator {
    /// Start an empty accumulation.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.hasher.update(data.as_ref());
    }

    /// Feed a length-prefixed byte string (u64 big-endian length).
    ///
    /// Used for variable-length fields so that `("ab", "c")` and `("a", "bc")`
    /// never hash to the same value.
    pub fn update_prefixed(&mut self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        self.hasher.update((data.len() as u64).to_be_bytes());
        self.hasher.update(data);
    }

    /// Consume the accumulator and return the raw digest.
    pub fn finalize(self) -> [u8; 32] {
        let hash = self.hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        out
    }

    /// Consume the accumulator and return the digest as lowercase hex.
    pub fn finalize_hex(self) -> String {
        to_hex(&self.finalize())
    }
}

impl std::fmt::Debug for Sha256Accumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Sha256Accumulator")
    }
}

/// A Merkle tree node digest (leaf hash, interior node, or root).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeHash(#[serde(with = "hex32")] [u8; 32]);

impl NodeHash {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as 64 lowercase hex chars.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse from 64 hex chars.
    pub fn from_hex(hex: &str) -> Result<Self, ParseError> {
        hex_to_32bytes(hex).map(Self)
    }
}

impl std::fmt::Display for NodeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for NodeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeHash({})", self.to_hex())
    }
}

impl std::str::FromStr for NodeHash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// A per-(identity, context) tag that exposes repeated actions without
/// exposing the actor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Nullifier(#[serde(with = "hex32")] [u8; 32]);

impl Nullifier {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as 64 lowercase hex chars.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse from 64 hex chars.
    pub fn from_hex(hex: &str) -> Result<Self, ParseError> {
        hex_to_32bytes(hex).map(Self)
    }
}

impl std::fmt::Display for Nullifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Nullifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nullifier({})", self.to_hex())
    }
}

impl std::str::FromStr for Nullifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_matches_known_sha256_of_empty_input() {
        let acc = Sha256Accumulator::new();
        assert_eq!(
            acc.finalize_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn accumulator_is_chunking_independent() {
        let mut a = Sha256Accumulator::new();
        a.update(b"hello ");
        a.update(b"world");
        let mut b = Sha256Accumulator::new();
        b.update(b"hello world");
        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn prefixed_updates_separate_field_boundaries() {
        let mut a = Sha256Accumulator::new();
        a.update_prefixed(b"ab");
        a.update_prefixed(b"c");
        let mut b = Sha256Accumulator::new();
        b.update_prefixed(b"a");
        b.update_prefixed(b"bc");
        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn hex_roundtrip_accepts_uppercase_and_whitespace() {
        let bytes = [0xabu8; 32];
        let hex = format!("  {}  ", to_hex(&bytes).to_uppercase());
        assert_eq!(hex_to_32bytes(&hex).unwrap(), bytes);
    }

    #[test]
    fn hex_rejects_wrong_length() {
        assert_eq!(
            hex_to_32bytes("abcd"),
            Err(ParseError::InvalidLength {
                expected: 64,
                actual: 4
            })
        );
    }

    #[test]
    fn hex_rejects_non_hex_character() {
        let mut s = "0".repeat(63);
        s.push('g');
        assert_eq!(
            hex_to_32bytes(&s),
            Err(ParseError::InvalidCharacter {
                ch: 'g',
                position: 63
            })
        );
    }

    #[test]
    fn hex_rejects_empty() {
        assert_eq!(hex_to_32bytes("   "), Err(ParseError::Empty));
    }

    #[test]
    fn node_hash_serializes_as_hex_string() {
        let h = NodeHash::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: NodeHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn nullifier_deserialize_rejects_garbage() {
        let result: Result<Nullifier, _> = serde_json::from_str("\"not-hex\"");
        assert!(result.is_err());
    }

    #[test]
    fn debug_output_names_the_type() {
        let n = Nullifier::from_bytes([0; 32]);
        assert!(format!("{n:?}").starts_with("Nullifier("));
        let h = NodeHash::from_bytes([0; 32]);
        assert!(format!("{h:?}").starts_with("NodeHash("));
    }
}
