//! # Nullifier Ledger
//!
//! Record of nullifiers already spent. The host owns the ledger and
//! persists it however it likes; [`InMemoryNullifierLedger`] serves tests
//! and single-process deployments.
//!
//! ## Security Invariant
//!
//! [`NullifierLedger::try_record`] is an atomic check-and-insert. Two
//! concurrent submissions carrying the same nullifier can never both see
//! `true`, so one member cannot act twice on the same message by racing.

use std::collections::HashSet;

use cohort_core::Nullifier;
use parking_lot::Mutex;

/// Storage seam for spent nullifiers.
pub trait NullifierLedger: Send + Sync {
    /// Whether `nullifier` has been recorded.
    fn is_used(&self, nullifier: &Nullifier) -> bool;

    /// Record `nullifier`. Returns `true` if it was not already recorded,
    /// `false` if it was. Must be atomic with respect to other callers.
    fn try_record(&self, nullifier: Nullifier) -> bool;
}

/// Process-local ledger.
#[derive(Debug, Default)]
pub struct InMemoryNullifierLedger {
    used: Mutex<HashSet<Nullifier>>,
}

impl InMemoryNullifierLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded nullifiers.
    pub fn len(&self) -> usize {
        self.used.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.used.lock().is_empty()
    }
}

impl NullifierLedger for InMemoryNullifierLedger {
    fn is_used(&self, nullifier: &Nullifier) -> bool {
        self.used.lock().contains(nullifier)
    }

    fn try_record(&self, nullifier: Nullifier) -> bool {
        self.used.lock().insert(nullifier)
    }
}
