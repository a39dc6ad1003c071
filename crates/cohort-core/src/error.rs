//! # Error Types — Structured Error Hierarchy
//!
//! Errors owned by `cohort-core`. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations. Crates further up
//! the DAG define their own enums (group, identity, proof) and convert
//! into [`CohortError`] where a single caller-facing type is convenient.
//! The typed error is kept as the source and can be recovered with
//! [`CohortError::downcast_ref`].

use thiserror::Error;

/// A typed error from a crate above `cohort-core`.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for Cohort.
#[derive(Error, Debug)]
pub enum CohortError {
    /// A textual value could not be parsed into a domain type.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Merkle group operation failed.
    #[error("group error: {0}")]
    Group(#[source] BoxedSource),

    /// Identity derivation failed.
    #[error("identity error: {0}")]
    Identity(#[source] BoxedSource),

    /// Proof generation failed.
    #[error("proof error: {0}")]
    Proof(#[source] BoxedSource),
}

impl CohortError {
    /// The typed error behind a group, identity or proof failure, if it is
    /// an `E`.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Group(source) | Self::Identity(source) | Self::Proof(source) => {
                source.downcast_ref::<E>()
            }
            Self::Parse(_) | Self::Config(_) => None,
        }
    }
}

/// Error while parsing a commitment, digest, or nullifier from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input was empty after trimming.
    #[error("empty input")]
    Empty,

    /// The input contained a character outside the expected alphabet.
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Zero-based character offset into the trimmed input.
        position: usize,
    },

    /// The value is wider than the field modulus.
    #[error("value is wider than the field modulus")]
    Overflow,

    /// The value is not a canonical element of the scalar field.
    #[error("value is not below the field modulus")]
    NotInField,

    /// A fixed-width hex value had the wrong length.
    #[error("expected {expected} hex chars, got {actual}")]
    InvalidLength {
        /// Required number of hex characters.
        expected: usize,
        /// Number of hex characters supplied.
        actual: usize,
    },
}

/// Error while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was being read.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The YAML document did not match the configuration schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An environment override held an unusable value.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Environment variable name.
        var: &'static str,
        /// The raw value found.
        value: String,
    },

    /// A field failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A non-member policy name was not recognised.
    #[error("unknown non-member policy {0:?} (expected fail-closed or degrade-unverified)")]
    UnknownPolicy(String),
}
