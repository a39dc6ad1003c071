//! # Cryptographic Error Types
//!
//! Structured errors for group and identity operations. Uses `thiserror`
//! for ergonomic error definitions with diagnostic context.

use cohort_core::{Commitment, CohortError};
use thiserror::Error;

/// The group cannot hold the requested tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    /// Requested depth is outside the supported range.
    #[error("tree depth {depth} outside supported range {min}..={max}")]
    DepthOutOfRange {
        /// The depth that was requested.
        depth: usize,
        /// Smallest supported depth.
        min: usize,
        /// Largest supported depth.
        max: usize,
    },

    /// Every leaf slot is taken.
    #[error("group is full ({capacity} leaves)")]
    Full {
        /// Maximum number of leaves, `2^depth`.
        capacity: u64,
    },
}

/// Errors from Merkle group operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// Capacity limit hit.
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// The commitment is already a member.
    #[error("commitment {0} is already a member")]
    Duplicate(Commitment),

    /// A leaf index past the end of the group.
    #[error("leaf index {index} out of range for group of size {size}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current group size.
        size: usize,
    },

    /// The commitment is not a member.
    #[error("commitment {0} not found in group")]
    NotFound(Commitment),
}

/// Errors from identity derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The secret text could not be decoded.
    #[error("malformed identity secret: {0}")]
    MalformedSecret(String),
}

impl From<GroupError> for CohortError {
    fn from(err: GroupError) -> Self {
        CohortError::Group(Box::new(err))
    }
}

impl From<IdentityError> for CohortError {
    fn from(err: IdentityError) -> Self {
        CohortError::Identity(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_out_of_range_display() {
        let err = CapacityError::DepthOutOfRange {
            depth: 40,
            min: 1,
            max: 32,
        };
        assert_eq!(format!("{err}"), "tree depth 40 outside supported range 1..=32");
    }

    #[test]
    fn capacity_error_is_transparent_inside_group_error() {
        let err: GroupError = CapacityError::Full { capacity: 16 }.into();
        assert_eq!(format!("{err}"), "group is full (16 leaves)");
    }

    #[test]
    fn duplicate_display_uses_decimal_commitment() {
        let err = GroupError::Duplicate(Commitment::from_u64(77));
        assert!(format!("{err}").contains("77"));
    }

    #[test]
    fn index_out_of_range_display() {
        let err = GroupError::IndexOutOfRange { index: 5, size: 3 };
        let msg = format!("{err}");
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn converts_into_cohort_error() {
        let err: CohortError = GroupError::Duplicate(Commitment::from_u64(9)).into();
        assert!(matches!(err, CohortError::Group(_)));
        assert_eq!(
            err.downcast_ref::<GroupError>(),
            Some(&GroupError::Duplicate(Commitment::from_u64(9)))
        );
        assert!(err.downcast_ref::<IdentityError>().is_none());

        let err: CohortError = IdentityError::MalformedSecret("short".into()).into();
        assert!(format!("{err}").contains("short"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(matches!(
            err.downcast_ref::<IdentityError>(),
            Some(IdentityError::MalformedSecret(_))
        ));
    }
}
