//! Bucketing of profiles by (region, personality trait).
//!
//! Region and personality act as hard pre-filters: greedy formation only
//! ever looks inside one bucket, and only buckets holding at least
//! `target_size` profiles are eligible in a run.

use std::collections::BTreeMap;

use crate::{PersonalityTrait, Profile, Region};

/// Key of a bucket. Ordered so buckets are visited deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub region: Region,
    pub personality_trait: PersonalityTrait,
}

impl BucketKey {
    pub fn of(profile: &Profile) -> Self {
        Self {
            region: profile.region,
            personality_trait: profile.personality_trait,
        }
    }
}

/// Partition profiles into buckets, keeping input order inside each bucket.
pub fn bucket_profiles(profiles: &[Profile]) -> BTreeMap<BucketKey, Vec<&Profile>> {
    let mut buckets: BTreeMap<BucketKey, Vec<&Profile>> = BTreeMap::new();
    for profile in profiles {
        buckets.entry(BucketKey::of(profile)).or_default().push(profile);
    }
    buckets
}

/// Buckets with at least `target_size` members, in ascending key order.
pub fn eligible_buckets(
    profiles: &[Profile],
    target_size: usize,
) -> Vec<(BucketKey, Vec<&Profile>)> {
    bucket_profiles(profiles)
        .into_iter()
        .filter(|(_, members)| members.len() >= target_size)
        .collect()
}
