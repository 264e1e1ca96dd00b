//! Guarantee pass for a designated profile.
//!
//! Places one externally designated profile (the demo account) into a club
//! when the main algorithm left it out, relaxing constraints step by step:
//!
//! 1. same region, same trait, shared interest
//! 2. same region, shared interest
//! 3. shared interest only
//!
//! The first pool large enough to fill a club wins. Peers are picked one per
//! distinct rank first, then topped up in pool order. If no pool is large
//! enough the pass does nothing.

use std::collections::{BTreeSet, HashSet};

use log::{debug, info};

use crate::explain::{finalize_club, FinalizeContext};
use crate::interests::common_interests;
use crate::{Club, Profile};

/// Inputs of the guarantee pass. Everything is passed in explicitly,
/// including the persisted clubs from earlier runs.
#[derive(Debug, Clone, Copy)]
pub struct GuaranteeRequest<'a> {
    pub designated: &'a Profile,
    /// All profiles of the run, in input order
    pub profiles: &'a [Profile],
    /// Clubs already produced by this run
    pub run_clubs: &'a [Club],
    /// Clubs persisted by earlier runs
    pub existing_clubs: &'a [Club],
    pub target_size: usize,
    /// Sequence index for the club name
    pub sequence: usize,
}

/// Build a club around the designated profile, if it needs one and one can be made.
pub fn guarantee_club(request: &GuaranteeRequest<'_>, ctx: &FinalizeContext<'_>) -> Option<Club> {
    let designated = request.designated;

    let already_placed = request
        .run_clubs
        .iter()
        .chain(request.existing_clubs)
        .any(|c| c.contains(&designated.id));
    if already_placed {
        debug!("[Guarantee] {} already has a club, skipping", designated.id);
        return None;
    }

    let needed = request.target_size.saturating_sub(1);
    let Some(pool) = candidate_pool(request, needed) else {
        info!(
            "[Guarantee] Could not gather {} peers for {}, no club created",
            needed, designated.id
        );
        return None;
    };

    let peers = select_peers(designated, &pool, needed);
    let mut members: Vec<&Profile> = Vec::with_capacity(peers.len() + 1);
    members.push(designated);
    members.extend(peers);

    if common_interests(&members).is_empty() {
        info!(
            "[Guarantee] Peers for {} share no common interest, no club created",
            designated.id
        );
        return None;
    }

    info!(
        "[Guarantee] Built club of {} around {}",
        members.len(),
        designated.id
    );
    Some(finalize_club(&members, request.sequence, true, ctx))
}

/// First relaxation level whose pool holds at least `needed` profiles.
fn candidate_pool<'a>(request: &GuaranteeRequest<'a>, needed: usize) -> Option<Vec<&'a Profile>> {
    let designated = request.designated;
    let own: BTreeSet<&str> = designated.interest_set();

    let taken: HashSet<&str> = request
        .run_clubs
        .iter()
        .flat_map(|c| c.member_ids.iter().map(String::as_str))
        .collect();

    let available: Vec<&'a Profile> = request
        .profiles
        .iter()
        .filter(|p| p.id != designated.id && !taken.contains(p.id.as_str()))
        .filter(|p| p.interests.iter().any(|i| own.contains(i.as_str())))
        .collect();

    let strict: Vec<&'a Profile> = available
        .iter()
        .copied()
        .filter(|p| {
            p.region == designated.region && p.personality_trait == designated.personality_trait
        })
        .collect();
    if strict.len() >= needed {
        debug!("[Guarantee] Strict pool: {} candidates", strict.len());
        return Some(strict);
    }

    let same_region: Vec<&'a Profile> = available
        .iter()
        .copied()
        .filter(|p| p.region == designated.region)
        .collect();
    if same_region.len() >= needed {
        debug!("[Guarantee] Region pool: {} candidates", same_region.len());
        return Some(same_region);
    }

    if available.len() >= needed {
        debug!("[Guarantee] Interest pool: {} candidates", available.len());
        return Some(available);
    }

    None
}

/// Pick `needed` peers: one per rank not yet in the club, then pool order.
fn select_peers<'a>(designated: &Profile, pool: &[&'a Profile], needed: usize) -> Vec<&'a Profile> {
    let mut seen_ranks = BTreeSet::from([designated.rank]);
    let mut picked: Vec<&'a Profile> = Vec::with_capacity(needed);

    for &candidate in pool {
        if picked.len() == needed {
            break;
        }
        if seen_ranks.insert(candidate.rank) {
            picked.push(candidate);
        }
    }

    for &candidate in pool {
        if picked.len() == needed {
            break;
        }
        if !picked.iter().any(|p| p.id == candidate.id) {
            picked.push(candidate);
        }
    }

    picked
}
