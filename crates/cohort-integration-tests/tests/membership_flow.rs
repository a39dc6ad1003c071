//! # Membership Flow Integration Tests
//!
//! End-to-end scenarios across identity, group, proof engine and ledger:
//! - Depth-4 group indexing and proof shape
//! - Prove/verify for every member
//! - Rebuild removing a member, under both non-member policies
//! - Double upvote rejected by the nullifier ledger
//! - Action contexts scoping nullifiers
//! - Passport proofs bound to an attribute set

use cohort_core::{AttributeSet, NonMemberPolicy};
use cohort_crypto::{verify_merkle_proof, Group, Identity};
use cohort_zkp::{
    accept_bundle, ActionContext, InMemoryNullifierLedger, ProofEngine, ProofError, ProofStatus,
    Rejection, SubmissionOutcome,
};
use rand_core::{CryptoRng, RngCore};

/// Deterministic byte stream for reproducible identities. Not secure.
struct CountingRng(u64);

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_be_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for CountingRng {}

fn three_members() -> (Identity, Identity, Identity) {
    let mut rng = CountingRng(7);
    (
        Identity::generate_with(&mut rng),
        Identity::generate_with(&mut rng),
        Identity::generate_with(&mut rng),
    )
}

// ---------------------------------------------------------------------------
// 1. Depth-4 group
// ---------------------------------------------------------------------------

#[test]
fn depth_four_group_indexes_and_proofs() {
    let (a, b, c) = three_members();
    let mut group = Group::new(4).unwrap();
    for id in [&a, &b, &c] {
        group.insert(id.commitment()).unwrap();
    }

    assert_eq!(group.index_of(&b.commitment()).unwrap(), 1);
    let proof = group.merkle_proof(1).unwrap();
    assert_eq!(proof.path.len(), 4);
    assert!(verify_merkle_proof(&proof));

    let root = group.root();
    assert_eq!(group.root(), root, "root must be stable without inserts");
}

#[test]
fn generate_with_is_reproducible() {
    let (a1, _, _) = three_members();
    let (a2, _, _) = three_members();
    assert_eq!(a1, a2);
    assert_eq!(a1.commitment(), a2.commitment());
}

// ---------------------------------------------------------------------------
// 2. Prove and verify
// ---------------------------------------------------------------------------

#[test]
fn every_member_can_prove_and_verify() {
    let (a, b, c) = three_members();
    let mut group = Group::new(4).unwrap();
    group
        .insert_many([a.commitment(), b.commitment(), c.commitment()])
        .unwrap();
    let engine = ProofEngine::default();
    for id in [&a, &b, &c] {
        let bundle = engine.prove(id, &group, "hello").unwrap();
        assert!(engine.verify(&bundle, &group.root(), "hello"));
        assert!(!engine.verify(&bundle, &group.root(), "goodbye"));
    }
}

#[test]
fn bundle_from_older_root_fails_after_growth() {
    let (a, b, _) = three_members();
    let mut group = Group::new(4).unwrap();
    group.insert(a.commitment()).unwrap();
    let engine = ProofEngine::default();
    let bundle = engine.prove(&a, &group, "m").unwrap();
    let old_root = group.root();
    group.insert(b.commitment()).unwrap();

    assert!(engine.verify(&bundle, &old_root, "m"));
    assert!(matches!(
        engine.check(&bundle, &group.root(), "m"),
        Err(Rejection::RootMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// 3. Rebuild removes a member
// ---------------------------------------------------------------------------

fn rebuilt_without_middle() -> (Identity, Identity, Identity, Group, Group) {
    let (a, b, c) = three_members();
    let mut before = Group::new(4).unwrap();
    before
        .insert_many([a.commitment(), b.commitment(), c.commitment()])
        .unwrap();
    let mut after = before.clone();
    let report = after.rebuild([a.commitment().to_string(), c.commitment().to_string()]);
    assert!(report.is_clean());
    (a, b, c, before, after)
}

#[test]
fn removed_member_fails_closed() {
    let (_, b, _, before, after) = rebuilt_without_middle();
    assert!(!after.contains(&b.commitment()));
    assert_ne!(before.root(), after.root());

    let engine = ProofEngine::default();
    match engine.prove(&b, &after, "post") {
        Err(ProofError::NotAMember(c)) => assert_eq!(c, b.commitment()),
        other => panic!("expected NotAMember, got: {other:?}"),
    }

    // A bundle made before removal cannot pass against the new root.
    let stale = engine.prove(&b, &before, "post").unwrap();
    assert!(!engine.verify(&stale, &after.root(), "post"));
}

#[test]
fn removed_member_degraded_bundle_is_rejected() {
    let (_, b, _, _, after) = rebuilt_without_middle();
    let engine = ProofEngine::new(NonMemberPolicy::DegradeUnverified);
    let bundle = engine.prove(&b, &after, "post").unwrap();
    assert_eq!(bundle.status, ProofStatus::Unverified);
    assert!(!engine.verify(&bundle, &after.root(), "post"));
}

#[test]
fn remaining_members_reindex_and_verify() {
    let (a, _, c, _, after) = rebuilt_without_middle();
    assert_eq!(after.index_of(&a.commitment()).unwrap(), 0);
    assert_eq!(after.index_of(&c.commitment()).unwrap(), 1);
    let engine = ProofEngine::default();
    let bundle = engine.prove(&c, &after, "post").unwrap();
    assert!(engine.verify(&bundle, &after.root(), "post"));
}

// ---------------------------------------------------------------------------
// 4. Double submission
// ---------------------------------------------------------------------------

#[test]
fn double_upvote_is_rejected() {
    let (a, b, _) = three_members();
    let mut group = Group::new(4).unwrap();
    group.insert_many([a.commitment(), b.commitment()]).unwrap();
    let engine = ProofEngine::default();
    let ledger = InMemoryNullifierLedger::new();
    let message = ActionContext::Upvote("42".into()).message();
    assert_eq!(message, "upvote-42");

    let first = engine.prove(&a, &group, &message).unwrap();
    let second = engine.prove(&a, &group, &message).unwrap();
    assert_eq!(first.nullifier, second.nullifier);

    let root = group.root();
    assert!(accept_bundle(&engine, &first, &root, &message, &ledger).is_accepted());
    assert_eq!(
        accept_bundle(&engine, &second, &root, &message, &ledger),
        SubmissionOutcome::Duplicate(second.nullifier)
    );

    // A different member upvoting the same item is independent.
    let other = engine.prove(&b, &group, &message).unwrap();
    assert!(accept_bundle(&engine, &other, &root, &message, &ledger).is_accepted());
    assert_eq!(ledger.len(), 2);
}

#[test]
fn distinct_actions_have_distinct_nullifiers() {
    let (a, _, _) = three_members();
    let mut group = Group::new(4).unwrap();
    group.insert(a.commitment()).unwrap();
    let engine = ProofEngine::default();
    let contexts = [
        ActionContext::Upvote("1".into()),
        ActionContext::Upvote("2".into()),
        ActionContext::Reply {
            feedback_id: "1".into(),
            content: "agreed".into(),
        },
        ActionContext::Post("new idea".into()),
    ];
    let nullifiers: Vec<_> = contexts
        .iter()
        .map(|ctx| engine.prove(&a, &group, &ctx.message()).unwrap().nullifier)
        .collect();
    for i in 0..nullifiers.len() {
        for j in (i + 1)..nullifiers.len() {
            assert_ne!(nullifiers[i], nullifiers[j]);
        }
    }
}

#[test]
fn restored_identity_proves_as_original() {
    let (a, _, _) = three_members();
    let restored = Identity::restore(&a.secret_hex()).unwrap();
    let mut group = Group::new(4).unwrap();
    group.insert(a.commitment()).unwrap();
    let engine = ProofEngine::default();
    let from_original = engine.prove(&a, &group, "m").unwrap();
    let from_restored = engine.prove(&restored, &group, "m").unwrap();
    assert_eq!(from_original.nullifier, from_restored.nullifier);
    assert!(engine.verify(&from_restored, &group.root(), "m"));
}

// ---------------------------------------------------------------------------
// 5. Passport
// ---------------------------------------------------------------------------

#[test]
fn passport_proof_binds_attribute_set() {
    let (a, b, _) = three_members();
    let mut group = Group::new(4).unwrap();
    group.insert_many([a.commitment(), b.commitment()]).unwrap();
    let engine = ProofEngine::default();

    let mut attributes = AttributeSet::new();
    attributes.insert("location".into(), "Forest City".into());
    attributes.insert("skills".into(), vec!["rust", "design"].into());
    let passport = ActionContext::Passport(attributes.clone()).message();

    let bundle = engine.prove(&a, &group, &passport).unwrap();
    assert!(engine.verify(&bundle, &group.root(), &passport));

    // Presenting the same proof for different attributes fails.
    attributes.insert("location".into(), "Lisbon".into());
    let other = ActionContext::Passport(attributes).message();
    assert!(matches!(
        engine.check(&bundle, &group.root(), &other),
        Err(Rejection::MessageMismatch { .. })
    ));

    // An outsider cannot obtain a passport.
    let outsider = Identity::generate();
    assert!(matches!(
        engine.prove(&outsider, &group, &passport),
        Err(ProofError::NotAMember(_))
    ));
}
