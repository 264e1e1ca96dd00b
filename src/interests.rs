//! Interest and rank utilities over a group of profiles.
//!
//! All functions are pure and deterministic for a given input.

use std::collections::{BTreeMap, BTreeSet};

use crate::Profile;

/// Interests held by every profile in the group.
///
/// Empty for an empty group; a single profile's own interest set otherwise.
pub fn common_interests(profiles: &[&Profile]) -> BTreeSet<String> {
    let mut iter = profiles.iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };

    let mut common: BTreeSet<String> = first.interests.iter().cloned().collect();
    for profile in iter {
        if common.is_empty() {
            break;
        }
        let theirs = profile.interest_set();
        common.retain(|label| theirs.contains(label.as_str()));
    }
    common
}

/// Most frequent interest label across the group.
///
/// Every occurrence in a member's list counts, so repeated labels weigh more.
/// Ties go to the lexicographically smallest label. `None` when nobody lists
/// any interest.
pub fn primary_interest(profiles: &[&Profile]) -> Option<String> {
    let counts = interest_counts(profiles);
    counts
        .into_iter()
        .max_by(|(a_label, a_count), (b_label, b_count)| {
            a_count.cmp(b_count).then_with(|| b_label.cmp(a_label))
        })
        .map(|(label, _)| label)
}

/// Occurrence count per interest label.
pub fn interest_counts(profiles: &[&Profile]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for profile in profiles {
        for label in &profile.interests {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of distinct ranks in the group.
pub fn rank_diversity(profiles: &[&Profile]) -> usize {
    profiles
        .iter()
        .map(|p| p.rank)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Whether the profile lists at least one of the given labels.
pub fn shares_interest(profile: &Profile, labels: &BTreeSet<String>) -> bool {
    profile.interests.iter().any(|i| labels.contains(i))
}
