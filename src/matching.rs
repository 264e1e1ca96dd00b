//! Matching run orchestration.
//!
//! A run buckets the profiles, forms clubs greedily inside each eligible
//! bucket, finalizes them, and finally gives the designated profile a
//! chance through the guarantee pass. The run is a pure function of its
//! arguments: the caller persists the returned clubs.

use std::collections::HashSet;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::bucketing::{eligible_buckets, BucketKey};
use crate::explain::{finalize_club, FinalizeContext};
use crate::grouping::form_groups;
use crate::guarantee::{guarantee_club, GuaranteeRequest};
use crate::{now_iso, Club, ClubMatchError, MatchConfig, Profile, Result};

/// Derive a reproducible RNG seed from a run id.
///
/// Takes the first eight bytes (big-endian) of the SHA-256 digest, so the
/// value is stable across platforms and toolchains.
pub fn derive_seed(run_id: &str) -> u64 {
    let digest = Sha256::digest(run_id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Partition profiles into clubs.
///
/// `existing_clubs` are the clubs persisted by earlier runs; they are only
/// read by the guarantee pass to avoid placing the designated profile twice.
///
/// # Errors
///
/// `InsufficientProfiles` when fewer than `config.min_profiles` profiles are given.
pub fn compute_matches(
    profiles: &[Profile],
    config: &MatchConfig,
    run_id: &str,
    existing_clubs: &[Club],
) -> Result<Vec<Club>> {
    if profiles.len() < config.min_profiles {
        return Err(ClubMatchError::InsufficientProfiles {
            count: profiles.len(),
            minimum: config.min_profiles,
        });
    }

    let seed = config.seed.unwrap_or_else(|| derive_seed(run_id));
    let mut rng = StdRng::seed_from_u64(seed);

    let mut formed: Vec<(usize, Vec<&Profile>)> = Vec::new();
    let mut designated_bucket_count = 0;
    let designated = config
        .designated_profile_id
        .as_deref()
        .and_then(|id| profiles.iter().find(|p| p.id == id));
    let designated_key = designated.map(BucketKey::of);

    let buckets = eligible_buckets(profiles, config.target_size);
    debug!(
        "[Matching] Run {}: {} profiles, {} eligible buckets, seed {}",
        run_id,
        profiles.len(),
        buckets.len(),
        seed
    );

    for (key, members) in &buckets {
        let formation = form_groups(members, config.target_size, &mut rng);
        debug!(
            "[Matching] Bucket {}/{}: {} members -> {} clubs, {} unassigned",
            key.region,
            key.personality_trait,
            members.len(),
            formation.groups.len(),
            formation.unassigned.len()
        );

        if Some(*key) == designated_key {
            designated_bucket_count = formation.groups.len();
        }
        formed.extend(formation.groups.into_iter().enumerate());
    }

    // Every club of the run carries the time formation finished.
    let timestamp = now_iso();
    let ctx = FinalizeContext {
        run_id,
        mode: config.explanation_mode,
        timestamp: &timestamp,
    };
    let mut clubs: Vec<Club> = formed
        .iter()
        .map(|(sequence, group)| finalize_club(group, *sequence, false, &ctx))
        .collect();

    if let Some(designated) = designated {
        let request = GuaranteeRequest {
            designated,
            profiles,
            run_clubs: &clubs,
            existing_clubs,
            target_size: config.target_size,
            sequence: designated_bucket_count,
        };
        if let Some(club) = guarantee_club(&request, &ctx) {
            clubs.push(club);
        }
    }

    info!(
        "[Matching] Run {} complete: {} clubs, {} of {} profiles placed",
        run_id,
        clubs.len(),
        clubs.iter().map(Club::len).sum::<usize>(),
        profiles.len()
    );

    Ok(clubs)
}

/// Ids of profiles that appear in none of the given clubs, in input order.
pub fn unassigned_ids(profiles: &[Profile], clubs: &[Club]) -> Vec<String> {
    let placed: HashSet<&str> = clubs
        .iter()
        .flat_map(|c| c.member_ids.iter().map(String::as_str))
        .collect();
    profiles
        .iter()
        .filter(|p| !placed.contains(p.id.as_str()))
        .map(|p| p.id.clone())
        .collect()
}
