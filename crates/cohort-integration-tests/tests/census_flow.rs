//! # Census Integration Tests
//!
//! Snapshots taken against a live group and recorded into a history:
//! - Totals and roots track the group
//! - Histograms aggregate self-reported attributes
//! - Growth over trailing windows

use chrono::{Duration, TimeZone, Utc};
use cohort_census::{snapshot_at, CensusHistory, Growth, MemberAttributes};
use cohort_core::{Commitment, Timestamp};
use cohort_crypto::Group;
use proptest::prelude::*;

fn t0() -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap())
}

fn later(days: i64) -> Timestamp {
    Timestamp::from_datetime(*t0().as_datetime() + Duration::days(days))
}

#[test]
fn snapshots_follow_group_growth() {
    let mut group = Group::new(8).unwrap();
    let mut members = Vec::new();
    let mut history = CensusHistory::new();

    for day in 0..40i64 {
        group.insert(Commitment::from_u64(day as u64 + 1)).unwrap();
        let location = if day % 2 == 0 { "Forest City" } else { "Lisbon" };
        members.push(
            MemberAttributes::new()
                .joined_at(later(day))
                .with("location", location)
                .with("skills", vec!["rust", "zk"]),
        );
        let snap = snapshot_at(&group, &members, later(day));
        assert_eq!(snap.total_count, day as u64 + 1);
        assert_eq!(snap.root, group.root());
        assert_eq!(snap.active_count, if day == 0 { 1 } else { 2 });
        history.record(snap);
    }

    let latest = history.latest().unwrap();
    assert_eq!(latest.count("location", "Forest City"), 20);
    assert_eq!(latest.count("location", "Lisbon"), 20);
    assert_eq!(latest.count("skills", "rust"), 40);

    assert_eq!(
        history.growth(later(39)),
        Growth {
            last_24h: 1,
            last_7d: 7,
            last_30d: 30,
        }
    );
    assert_eq!(history.since(later(30)).len(), 10);
}

#[test]
fn snapshot_root_changes_after_rebuild() {
    let mut group = Group::new(4).unwrap();
    group
        .insert_many((1..=3).map(Commitment::from_u64))
        .unwrap();
    let before = snapshot_at(&group, &Vec::<MemberAttributes>::new(), t0());
    group.rebuild(["1", "3"]);
    let after = snapshot_at(&group, &Vec::<MemberAttributes>::new(), later(1));
    assert_ne!(before.root, after.root);
    assert_eq!(after.total_count, 2);

    let mut history = CensusHistory::new();
    history.record(before);
    history.record(after);
    assert_eq!(history.growth(later(1)).last_24h, -1);
}

proptest! {
    #[test]
    fn histogram_totals_match_single_valued_reports(codes in proptest::collection::vec(0u8..5, 0..60)) {
        let mut group = Group::new(8).unwrap();
        let members: Vec<MemberAttributes> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| {
                group.insert(Commitment::from_u64(i as u64 + 1)).unwrap();
                MemberAttributes::new().with("ageRange", format!("band-{code}"))
            })
            .collect();
        let snap = snapshot_at(&group, &members, t0());
        let total: u64 = snap
            .histograms
            .get("ageRange")
            .map(|h| h.values().sum())
            .unwrap_or(0);
        prop_assert_eq!(total, codes.len() as u64);
        prop_assert_eq!(snap.total_count, codes.len() as u64);
    }
}
