//! Tests for bucketing module

use clubmatch::{
    bucket_profiles, eligible_buckets, BucketKey, PersonalityTrait, Profile, Rank, Region,
};

fn profile(id: &str, region: Region, personality: PersonalityTrait) -> Profile {
    Profile::new(id, region, Rank::Staff, personality, ["축구"])
}

#[test]
fn test_bucket_by_region_and_trait() {
    let profiles = vec![
        profile("a", Region::Seoul, PersonalityTrait::Neutral),
        profile("b", Region::Busan, PersonalityTrait::Neutral),
        profile("c", Region::Seoul, PersonalityTrait::Neutral),
        profile("d", Region::Seoul, PersonalityTrait::Extrovert),
    ];

    let buckets = bucket_profiles(&profiles);
    assert_eq!(buckets.len(), 3);

    let seoul_neutral = &buckets[&BucketKey {
        region: Region::Seoul,
        personality_trait: PersonalityTrait::Neutral,
    }];
    let ids: Vec<&str> = seoul_neutral.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"], "input order is kept inside a bucket");
}

#[test]
fn test_bucket_keys_are_ordered() {
    let profiles = vec![
        profile("a", Region::Daegu, PersonalityTrait::Neutral),
        profile("b", Region::Seoul, PersonalityTrait::Introvert),
        profile("c", Region::Seoul, PersonalityTrait::Extrovert),
    ];

    let keys: Vec<BucketKey> = bucket_profiles(&profiles).into_keys().collect();
    assert_eq!(keys[0].region, Region::Seoul);
    assert_eq!(keys[0].personality_trait, PersonalityTrait::Extrovert);
    assert_eq!(keys[1].personality_trait, PersonalityTrait::Introvert);
    assert_eq!(keys[2].region, Region::Daegu);
}

#[test]
fn test_only_full_buckets_are_eligible() {
    let mut profiles: Vec<Profile> = (0..5)
        .map(|i| profile(&format!("s{i}"), Region::Seoul, PersonalityTrait::Neutral))
        .collect();
    profiles.extend(
        (0..4).map(|i| profile(&format!("b{i}"), Region::Busan, PersonalityTrait::Neutral)),
    );

    let eligible = eligible_buckets(&profiles, 5);
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].0.region, Region::Seoul);
    assert_eq!(eligible[0].1.len(), 5);

    assert_eq!(eligible_buckets(&profiles, 4).len(), 2);
    assert!(eligible_buckets(&profiles, 6).is_empty());
}

#[test]
fn test_empty_input() {
    assert!(bucket_profiles(&[]).is_empty());
    assert!(eligible_buckets(&[], 3).is_empty());
}
