//! Greedy club formation inside a bucket.
//!
//! Each club is seeded from a random unassigned profile and grown one member
//! at a time. A candidate is admissible only if it shares an interest with
//! the club's current common-interest set, so the intersection never
//! empties after the seed. Among admissible candidates the first one whose
//! rank is not yet represented wins; otherwise one is picked at random.
//!
//! A club that cannot reach `target_size` is dissolved, its members go back
//! to the unassigned pool, and the bucket stops producing clubs.

use log::debug;
use rand::Rng;

use crate::interests::{common_interests, shares_interest};
use crate::Profile;

/// Result of running greedy formation over one bucket.
#[derive(Debug, Clone, Default)]
pub struct BucketFormation<'a> {
    /// Accepted clubs, each exactly `target_size` long, seed first
    pub groups: Vec<Vec<&'a Profile>>,
    /// Profiles left without a club in this bucket
    pub unassigned: Vec<&'a Profile>,
}

/// Form clubs of exactly `target_size` from one bucket.
///
/// `rng` drives seed selection and the random fallback pick; pass a seeded
/// generator for reproducible runs.
pub fn form_groups<'a, R: Rng + ?Sized>(
    bucket: &[&'a Profile],
    target_size: usize,
    rng: &mut R,
) -> BucketFormation<'a> {
    let mut unassigned: Vec<&'a Profile> = bucket.to_vec();
    let mut groups: Vec<Vec<&'a Profile>> = Vec::new();

    if target_size == 0 {
        return BucketFormation { groups, unassigned };
    }

    while unassigned.len() >= target_size {
        let seed_idx = rng.gen_range(0..unassigned.len());
        let seed = unassigned.remove(seed_idx);
        let mut group = vec![seed];

        while group.len() < target_size && !unassigned.is_empty() {
            let common = common_interests(&group);
            if common.is_empty() {
                break;
            }

            let candidates: Vec<usize> = unassigned
                .iter()
                .enumerate()
                .filter(|(_, p)| shares_interest(p, &common))
                .map(|(i, _)| i)
                .collect();
            if candidates.is_empty() {
                break;
            }

            let chosen = pick_candidate(&group, &unassigned, &candidates, rng);
            group.push(unassigned.remove(chosen));
        }

        if group.len() == target_size && !common_interests(&group).is_empty() {
            groups.push(group);
        } else {
            debug!(
                "[Grouping] Dissolving partial club of {} (seed {}), {} left unassigned",
                group.len(),
                seed.id,
                unassigned.len() + group.len()
            );
            unassigned.extend(group);
            break;
        }
    }

    BucketFormation { groups, unassigned }
}

/// Index into `unassigned` of the next member to admit.
///
/// Prefers the first candidate bringing a new rank into the group.
fn pick_candidate<R: Rng + ?Sized>(
    group: &[&Profile],
    unassigned: &[&Profile],
    candidates: &[usize],
    rng: &mut R,
) -> usize {
    let fresh_rank = candidates
        .iter()
        .copied()
        .find(|&i| !group.iter().any(|m| m.rank == unassigned[i].rank));

    match fresh_rank {
        Some(i) => i,
        None => candidates[rng.gen_range(0..candidates.len())],
    }
}
