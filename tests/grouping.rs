//! Tests for grouping module

use clubmatch::grouping::*;
use clubmatch::{PersonalityTrait, Profile, Rank, Region};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashSet};

fn member(id: &str, rank: Rank, interests: &[&str]) -> Profile {
    Profile::new(
        id,
        Region::Seoul,
        rank,
        PersonalityTrait::Neutral,
        interests.iter().copied(),
    )
}

fn football_club(count: usize) -> Vec<Profile> {
    (0..count)
        .map(|i| member(&format!("p{i}"), Rank::ALL[i % Rank::ALL.len()], &["축구"]))
        .collect()
}

#[test]
fn test_single_full_group() {
    let profiles = football_club(5);
    let bucket: Vec<&Profile> = profiles.iter().collect();
    let mut rng = StdRng::seed_from_u64(42);

    let formation = form_groups(&bucket, 5, &mut rng);

    assert_eq!(formation.groups.len(), 1);
    assert!(formation.unassigned.is_empty());
    let ranks: BTreeSet<Rank> = formation.groups[0].iter().map(|p| p.rank).collect();
    assert_eq!(ranks.len(), 5, "all five ranks should be represented");
}

#[test]
fn test_leftovers_stay_unassigned() {
    // 7 profiles, target 5 -> one club of 5, two orphaned
    let profiles = football_club(7);
    let bucket: Vec<&Profile> = profiles.iter().collect();
    let mut rng = StdRng::seed_from_u64(7);

    let formation = form_groups(&bucket, 5, &mut rng);

    assert_eq!(formation.groups.len(), 1);
    assert_eq!(formation.groups[0].len(), 5);
    assert_eq!(formation.unassigned.len(), 2);

    let grouped: HashSet<&str> = formation.groups[0].iter().map(|p| p.id.as_str()).collect();
    for p in &formation.unassigned {
        assert!(!grouped.contains(p.id.as_str()));
    }
}

#[test]
fn test_multiple_groups_exact_size() {
    let profiles = football_club(15);
    let bucket: Vec<&Profile> = profiles.iter().collect();
    let mut rng = StdRng::seed_from_u64(3);

    let formation = form_groups(&bucket, 5, &mut rng);

    assert_eq!(formation.groups.len(), 3);
    for group in &formation.groups {
        assert_eq!(group.len(), 5);
    }
    assert!(formation.unassigned.is_empty());
}

#[test]
fn test_prefers_new_ranks() {
    let profiles = vec![
        member("s1", Rank::Staff, &["독서"]),
        member("s2", Rank::Staff, &["독서"]),
        member("s3", Rank::Staff, &["독서"]),
        member("am", Rank::AssistantManager, &["독서"]),
        member("m", Rank::Manager, &["독서"]),
        member("dgm", Rank::DeputyGeneralManager, &["독서"]),
    ];
    let bucket: Vec<&Profile> = profiles.iter().collect();

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let formation = form_groups(&bucket, 3, &mut rng);
        assert!(!formation.groups.is_empty());

        let first = &formation.groups[0];
        let ranks: BTreeSet<Rank> = first.iter().map(|p| p.rank).collect();
        assert_eq!(ranks.len(), 3, "seed {seed}: expected three distinct ranks");
    }
}

#[test]
fn test_group_keeps_common_interest() {
    let profiles = vec![
        member("a", Rank::Staff, &["축구", "독서"]),
        member("b", Rank::Manager, &["축구", "요리"]),
        member("c", Rank::GeneralManager, &["독서", "축구"]),
        member("d", Rank::AssistantManager, &["축구"]),
        member("e", Rank::Staff, &["축구", "등산"]),
        member("f", Rank::Manager, &["등산"]),
    ];
    let bucket: Vec<&Profile> = profiles.iter().collect();
    let mut rng = StdRng::seed_from_u64(11);

    let formation = form_groups(&bucket, 3, &mut rng);
    for group in &formation.groups {
        assert!(!clubmatch::common_interests(group).is_empty());
    }
}

#[test]
fn test_partial_group_is_dissolved() {
    // Two disjoint interest pairs can never reach three members
    let profiles = vec![
        member("a", Rank::Staff, &["축구"]),
        member("b", Rank::Manager, &["축구"]),
        member("c", Rank::Staff, &["요리"]),
        member("d", Rank::Manager, &["요리"]),
    ];
    let bucket: Vec<&Profile> = profiles.iter().collect();
    let mut rng = StdRng::seed_from_u64(1);

    let formation = form_groups(&bucket, 3, &mut rng);

    assert!(formation.groups.is_empty());
    assert_eq!(formation.unassigned.len(), 4);
}

#[test]
fn test_seed_without_interests_dissolves() {
    let profiles: Vec<Profile> = (0..5)
        .map(|i| member(&format!("p{i}"), Rank::Staff, &[]))
        .collect();
    let bucket: Vec<&Profile> = profiles.iter().collect();
    let mut rng = StdRng::seed_from_u64(5);

    let formation = form_groups(&bucket, 3, &mut rng);

    assert!(formation.groups.is_empty());
    assert_eq!(formation.unassigned.len(), 5);
}

#[test]
fn test_bucket_smaller_than_target() {
    let profiles = football_club(2);
    let bucket: Vec<&Profile> = profiles.iter().collect();
    let mut rng = StdRng::seed_from_u64(0);

    let formation = form_groups(&bucket, 3, &mut rng);
    assert!(formation.groups.is_empty());
    assert_eq!(formation.unassigned.len(), 2);

    let formation = form_groups(&bucket, 0, &mut rng);
    assert!(formation.groups.is_empty());
}

#[test]
fn test_same_seed_same_groups() {
    let profiles = football_club(12);
    let bucket: Vec<&Profile> = profiles.iter().collect();

    let ids = |seed: u64| -> Vec<Vec<String>> {
        let mut rng = StdRng::seed_from_u64(seed);
        form_groups(&bucket, 4, &mut rng)
            .groups
            .iter()
            .map(|g| g.iter().map(|p| p.id.clone()).collect())
            .collect()
    };

    assert_eq!(ids(99), ids(99));
}
