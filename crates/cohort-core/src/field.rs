//! # Field-Element Commitments
//!
//! An identity commitment is an unsigned integer in the BN254 scalar field,
//! the field used by the arithmetic circuits a succinct membership-proof
//! backend would run over. Commitments are stored as 32 big-endian bytes.
//!
//! ## Text Form
//!
//! The canonical text form is the decimal integer, e.g.
//! `"1234567890123456789"`. Parsing additionally accepts a `0x`-prefixed
//! hex form of up to 64 digits. Anything else (signs, separators, empty
//! input, values at or above the modulus) is rejected.

use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// The BN254 scalar field modulus `r`, big-endian. Equal to
/// `Fr::MODULUS`.
///
/// `r = 21888242871839275222246405745257275088548364400416034343698204186575808495617`
pub const FIELD_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

/// Decimal digits in the modulus. Longer canonical inputs cannot be in the field.
const MODULUS_DIGITS: usize = 77;

/// A public identity commitment: a canonical element of the scalar field.
///
/// Stored as the canonical big-endian encoding of an [`Fr`]. The only way
/// to obtain a `Commitment` is through a constructor that checks the value
/// is below the modulus.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// The zero element.
    pub const ZERO: Commitment = Commitment([0u8; 32]);

    /// Build a commitment from big-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NotInField`] if the value is not below the modulus.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, ParseError> {
        // Reduction only changes values at or above the modulus.
        let reduced = Self::from_field(Fr::from_be_bytes_mod_order(&bytes));
        if reduced.0 != bytes {
            return Err(ParseError::NotInField);
        }
        Ok(reduced)
    }

    /// Wrap a field element.
    pub fn from_field(value: Fr) -> Self {
        let mut bytes = [0u8; 32];
        let be = value.into_bigint().to_bytes_be();
        bytes[32 - be.len()..].copy_from_slice(&be);
        Self(bytes)
    }

    /// The commitment as a field element.
    pub fn to_field(&self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.0)
    }

    /// Map a 32-byte hash output into the field by clearing its top three
    /// bits. The result is below `2^253`, which is below the modulus.
    pub fn from_digest_truncated(mut bytes: [u8; 32]) -> Self {
        bytes[0] &= 0x1f;
        Self(bytes)
    }

    /// Build a commitment from a small integer. Always in range.
    pub fn from_u64(value: u64) -> Self {
        Self::from_field(Fr::from(value))
    }

    /// The big-endian byte representation.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Borrow the big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Render the commitment as a decimal integer.
    pub fn to_decimal(&self) -> String {
        // `Fr`'s Display drops leading zeros, which leaves zero empty.
        if self.is_zero() {
            return "0".to_string();
        }
        self.to_field().to_string()
    }

    /// Render the commitment as `0x` followed by 64 lowercase hex chars.
    pub fn to_hex(&self) -> String {
        format!("0x{}", crate::digest::to_hex(&self.0))
    }

    /// Parse a commitment from its decimal or `0x`-hex text form.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => Self::from_be_bytes(parse_hex_digits(hex, 2)?),
            None => parse_decimal(s),
        }
    }
}

fn check_alphabet(s: &str, radix: u32, offset: usize) -> Result<(), ParseError> {
    match s.chars().enumerate().find(|(_, ch)| !ch.is_digit(radix)) {
        Some((i, ch)) => Err(ParseError::InvalidCharacter {
            ch,
            position: i + offset,
        }),
        None => Ok(()),
    }
}

fn parse_decimal(s: &str) -> Result<Commitment, ParseError> {
    check_alphabet(s, 10, 0)?;
    let digits = s.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(Commitment::ZERO);
    }
    if digits.len() > MODULUS_DIGITS {
        return Err(ParseError::Overflow);
    }
    // `Fr::from_str` reduces silently, so the range check happens on the
    // digit string: equal-length decimal strings order like their values.
    if digits.len() == MODULUS_DIGITS && digits >= Fr::MODULUS.to_string().as_str() {
        return Err(ParseError::NotInField);
    }
    Fr::from_str(digits)
        .map(Commitment::from_field)
        .map_err(|()| ParseError::NotInField)
}

/// `offset` is the number of prefix characters already stripped, so error
/// positions refer to the caller's original (trimmed) string.
fn parse_hex_digits(hex: &str, offset: usize) -> Result<[u8; 32], ParseError> {
    if hex.is_empty() {
        return Err(ParseError::Empty);
    }
    check_alphabet(hex, 16, offset)?;
    if hex.len() > 64 {
        return Err(ParseError::Overflow);
    }
    crate::digest::hex_to_32bytes(&format!("{hex:0>64}"))
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl std::fmt::Debug for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Commitment({})", self.to_decimal())
    }
}

impl std::str::FromStr for Commitment {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
