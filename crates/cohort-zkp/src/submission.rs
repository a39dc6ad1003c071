//! # Action Submission State Machine
//!
//! Tracks one anonymous action from identity restore to acceptance.
//!
//! ```text
//! IDENTITY_RESTORED → GROUP_REFRESHED → PROOF_GENERATED ─┬→ PROOF_VERIFIED → NULLIFIER_CHECKED ─┬→ ACCEPTED
//!                                                        │                                      └→ REJECTED_DUPLICATE
//!                                                        └→ PROOF_REJECTED
//! ```
//!
//! Terminal states: ACCEPTED, REJECTED_DUPLICATE, PROOF_REJECTED.
//!
//! The member drives the first half ([`prepare_bundle`]); the host drives
//! the second ([`accept_bundle`]), starting from a received bundle.

use cohort_core::{Commitment, NodeHash, Nullifier};
use cohort_crypto::{IdentityError, Identity, SharedGroup, SyncOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bundle::ProofBundle;
use crate::engine::{ProofEngine, Rejection};
use crate::ledger::NullifierLedger;
use crate::traits::ProofError;

// ── Submission State ─────────────────────────────────────────────────

/// Where a submission is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionState {
    /// The member's identity has been restored from its secret.
    IdentityRestored,
    /// The group has been brought up to date with the registry.
    GroupRefreshed,
    /// A bundle exists for the action message.
    ProofGenerated,
    /// The host accepted the proof.
    ProofVerified,
    /// The host rejected the proof. Terminal state.
    ProofRejected,
    /// The host has consulted the nullifier ledger.
    NullifierChecked,
    /// The action was recorded. Terminal state.
    Accepted,
    /// The nullifier was already spent. Terminal state.
    RejectedDuplicate,
}

impl SubmissionState {
    /// Whether this is a terminal state (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Accepted | Self::RejectedDuplicate | Self::ProofRejected
        )
    }

    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdentityRestored => "IDENTITY_RESTORED",
            Self::GroupRefreshed => "GROUP_REFRESHED",
            Self::ProofGenerated => "PROOF_GENERATED",
            Self::ProofVerified => "PROOF_VERIFIED",
            Self::ProofRejected => "PROOF_REJECTED",
            Self::NullifierChecked => "NULLIFIER_CHECKED",
            Self::Accepted => "ACCEPTED",
            Self::RejectedDuplicate => "REJECTED_DUPLICATE",
        }
    }

    /// Whether `next` may follow this state. No wildcard, so a new variant
    /// must be placed explicitly.
    pub fn can_transition_to(&self, next: SubmissionState) -> bool {
        match self {
            Self::IdentityRestored => next == Self::GroupRefreshed,
            Self::GroupRefreshed => next == Self::ProofGenerated,
            Self::ProofGenerated => matches!(next, Self::ProofVerified | Self::ProofRejected),
            Self::ProofVerified => next == Self::NullifierChecked,
            Self::NullifierChecked => matches!(next, Self::Accepted | Self::RejectedDuplicate),
            Self::ProofRejected | Self::Accepted | Self::RejectedDuplicate => false,
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Error Types ──────────────────────────────────────────────────────

/// Errors while driving a submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Illegal state transition attempted.
    #[error("invalid submission transition from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: SubmissionState,
        /// Attempted target state.
        to: SubmissionState,
    },

    /// The identity secret could not be restored.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Proof generation failed.
    #[error(transparent)]
    Proof(#[from] ProofError),
}

// ── Submission ───────────────────────────────────────────────────────

/// One action's progress through the state machine, with its history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    state: SubmissionState,
    history: Vec<SubmissionState>,
}

impl Submission {
    /// A member-side submission, starting at `IDENTITY_RESTORED`.
    pub fn new() -> Self {
        Self::starting_at(SubmissionState::IdentityRestored)
    }

    /// A host-side submission for a bundle just received, starting at
    /// `PROOF_GENERATED`.
    pub fn received() -> Self {
        Self::starting_at(SubmissionState::ProofGenerated)
    }

    fn starting_at(state: SubmissionState) -> Self {
        Self {
            state,
            history: vec![state],
        }
    }

    /// Current state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Every state visited, in order, including the current one.
    pub fn history(&self) -> &[SubmissionState] {
        &self.history
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::InvalidTransition`] if `next` may not follow the
    /// current state. The submission is left unchanged.
    pub fn advance(&mut self, next: SubmissionState) -> Result<(), SubmissionError> {
        if !self.state.can_transition_to(next) {
            return Err(SubmissionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}

impl Default for Submission {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`accept_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The action was recorded under this nullifier.
    Accepted(Nullifier),
    /// The proof failed verification.
    Rejected(Rejection),
    /// The nullifier had already been spent.
    Duplicate(Nullifier),
}

impl SubmissionOutcome {
    /// Whether the action was recorded.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The terminal state this outcome corresponds to.
    pub fn final_state(&self) -> SubmissionState {
        match self {
            Self::Accepted(_) => SubmissionState::Accepted,
            Self::Rejected(_) => SubmissionState::ProofRejected,
            Self::Duplicate(_) => SubmissionState::RejectedDuplicate,
        }
    }
}

/// Member side: restore the identity, refresh the group from the registry's
/// ordered commitment list, and generate a bundle for `message`.
///
/// Returns the bundle with a submission in `PROOF_GENERATED`.
pub fn prepare_bundle(
    engine: &ProofEngine,
    secret: &str,
    group: &SharedGroup,
    registry: &[Commitment],
    message: &str,
) -> Result<(ProofBundle, Submission), SubmissionError> {
    let identity = Identity::restore(secret)?;
    let mut submission = Submission::new();

    match group.sync(registry) {
        SyncOutcome::Appended(added) => tracing::debug!(added, "group refreshed"),
        SyncOutcome::Rebuilt(report) => tracing::debug!(
            members = report.inserted,
            skipped = report.skipped.len(),
            "group rebuilt"
        ),
    }
    submission.advance(SubmissionState::GroupRefreshed)?;

    let bundle = engine.prove_shared(&identity, group, message)?;
    submission.advance(SubmissionState::ProofGenerated)?;
    Ok((bundle, submission))
}

/// Host side: verify `bundle` against the expected root and message, then
/// spend its nullifier.
///
/// The ledger is only touched for bundles that verify, and the spend is a
/// single atomic `try_record`, so concurrent duplicates cannot both be
/// accepted.
pub fn accept_bundle<L>(
    engine: &ProofEngine,
    bundle: &ProofBundle,
    expected_root: &NodeHash,
    message: &str,
    ledger: &L,
) -> SubmissionOutcome
where
    L: NullifierLedger + ?Sized,
{
    let (outcome, _) = accept_bundle_tracked(engine, bundle, expected_root, message, ledger);
    outcome
}

// The host-side path only ever takes legal transitions.
fn step(submission: &mut Submission, next: SubmissionState) {
    if let Err(e) = submission.advance(next) {
        tracing::error!(error = %e, "submission state machine out of sync");
    }
}

/// Like [`accept_bundle`], also returning the submission history.
pub fn accept_bundle_tracked<L>(
    engine: &ProofEngine,
    bundle: &ProofBundle,
    expected_root: &NodeHash,
    message: &str,
    ledger: &L,
) -> (SubmissionOutcome, Submission)
where
    L: NullifierLedger + ?Sized,
{
    let mut submission = Submission::received();

    if let Err(reason) = engine.check(bundle, expected_root, message) {
        tracing::debug!(reason = %reason, nullifier = %bundle.nullifier, "submission rejected");
        step(&mut submission, SubmissionState::ProofRejected);
        return (SubmissionOutcome::Rejected(reason), submission);
    }
    step(&mut submission, SubmissionState::ProofVerified);

    let nullifier = bundle.nullifier;
    step(&mut submission, SubmissionState::NullifierChecked);
    if ledger.try_record(nullifier) {
        step(&mut submission, SubmissionState::Accepted);
        tracing::info!(nullifier = %nullifier, "submission accepted");
        (SubmissionOutcome::Accepted(nullifier), submission)
    } else {
        step(&mut submission, SubmissionState::RejectedDuplicate);
        tracing::info!(nullifier = %nullifier, "duplicate nullifier rejected");
        (SubmissionOutcome::Duplicate(nullifier), submission)
    }
}
