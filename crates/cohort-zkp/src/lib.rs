//! # cohort-zkp — Membership Proof Engine
//!
//! Turns a member identity and a group into a proof bundle for one message,
//! and checks bundles on the host side.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): the sealed `ProofSystem` trait every backend
//!   satisfies, with `ProofError` and `VerifyError`.
//! - **Statement** (`statement.rs`): the public inputs a proof binds to and
//!   their canonical encoding.
//! - **Mock** (`mock.rs`): `MockProofSystem`, a transparent SHA-256
//!   backend. Not zero-knowledge.
//! - **Bundle** (`bundle.rs`): `ProofBundle`, the serializable value a
//!   member hands to the host.
//! - **Engine** (`engine.rs`): `ProofEngine::prove` / `verify` / `check`,
//!   with the configurable non-member policy.
//! - **Ledger** (`ledger.rs`): the spent-nullifier seam.
//! - **Context** (`context.rs`): conventional action messages.
//! - **Submission** (`submission.rs`): the per-action state machine and the
//!   member-side and host-side drivers.
//!
//! ## Crate Policy
//!
//! - Depends on `cohort-core` and `cohort-crypto` internally.
//! - Verification entry points return `bool` or a typed rejection; they
//!   never panic on attacker-supplied bundles.
//! - No `unsafe`.

pub mod bundle;
pub mod context;
pub mod engine;
pub mod ledger;
pub mod mock;
pub mod statement;
pub mod submission;
pub mod traits;

pub use bundle::{ProofBundle, ProofStatus};
pub use context::ActionContext;
pub use engine::{ProofEngine, Rejection};
pub use ledger::{InMemoryNullifierLedger, NullifierLedger};
pub use mock::{MockProof, MockProofSystem};
pub use statement::PublicStatement;
pub use submission::{
    accept_bundle, accept_bundle_tracked, prepare_bundle, Submission, SubmissionError,
    SubmissionOutcome, SubmissionState,
};
pub use traits::{ProofError, ProofSystem, VerifyError};
