//! Club finalization and match rationale.
//!
//! Turns an accepted group of profiles into a [`Club`]: timestamps, a
//! readable name, structured diversity metrics and a rationale per member.
//! The rationale is generated once here and never recomputed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::interests::{common_interests, interest_counts, primary_interest, rank_diversity};
use crate::{create_id_with_prefix, Club, ClubStatus, ExplanationMode, Profile, Rank, Region};

/// Section key of the club-level rationale in [`Club::explanations`].
pub const GROUP_SECTION: &str = "그룹";

/// Section key of the per-member detail in detailed mode.
pub const MEMBER_SECTION: &str = "개인";

const SIMPLE_RATIONALE: &str = "같은 지역·성향과 공통 관심사를 기준으로 매칭되었습니다.";
const GUARANTEE_SUFFIX: &str = " | 보장 매칭: 지정 사용자를 위한 완화 조건 구성";

/// Structured metrics attached to a club in detailed mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubMetrics {
    /// Interests shared by every member, sorted
    pub common_interests: Vec<String>,
    /// Distinct rank count
    pub rank_diversity: usize,
    /// Distinct ranks / club size, two decimals
    pub rank_diversity_score: f64,
    /// Distinct ranks present, by seniority
    pub ranks: Vec<Rank>,
    pub interest_counts: BTreeMap<String, usize>,
    /// Shannon entropy of the interest distribution (natural log)
    pub interest_shannon: f64,
    /// Member count per personality trait label
    pub trait_counts: BTreeMap<String, usize>,
    pub trait_shannon: f64,
    pub region_majority: Option<Region>,
    /// Labels listed by more than one member
    pub shared_interest_count: usize,
}

/// Run-wide values shared by every club finalized in a run.
#[derive(Debug, Clone, Copy)]
pub struct FinalizeContext<'a> {
    pub run_id: &'a str,
    pub mode: ExplanationMode,
    /// Completion time of the run, used for both created and updated stamps
    pub timestamp: &'a str,
}

/// Sequence label for the `index`-th club of a bucket: A, B, ... Z, A2, B2, ...
pub fn sequence_label(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    match index / 26 {
        0 => letter.to_string(),
        cycle => format!("{}{}", letter, cycle + 1),
    }
}

/// Build a club from its members. The first member is the leader.
///
/// `sequence` is the club's position within its bucket for this run.
/// Guarantee-pass clubs start `Active` and carry a marker in their rationale.
pub fn finalize_club(
    members: &[&Profile],
    sequence: usize,
    guaranteed: bool,
    ctx: &FinalizeContext<'_>,
) -> Club {
    let leader = members.first();
    let leader_id = leader.map(|p| p.id.clone()).unwrap_or_default();
    let region = leader.map(|p| p.region.label()).unwrap_or_default();

    let primary = primary_interest(members);
    let name = format!(
        "{} {} 클럽 {}",
        region,
        primary.as_deref().unwrap_or("공통"),
        sequence_label(sequence)
    );

    let common: Vec<String> = common_interests(members).into_iter().collect();
    let diversity = rank_diversity(members);

    let (match_score_breakdown, explanations) = match ctx.mode {
        ExplanationMode::Simple => (None, simple_explanations(members, guaranteed)),
        ExplanationMode::Detailed => {
            let metrics = club_metrics(members);
            let explanations = detailed_explanations(members, &common, diversity, guaranteed);
            (Some(metrics), explanations)
        }
    };

    Club {
        id: create_id_with_prefix("club"),
        name,
        member_ids: members.iter().map(|p| p.id.clone()).collect(),
        leader_id,
        primary_interest: primary,
        status: if guaranteed {
            ClubStatus::Active
        } else {
            ClubStatus::Matched
        },
        chat_link: None,
        match_score_breakdown,
        explanations,
        match_run_id: Some(ctx.run_id.to_string()),
        guaranteed,
        created_at: ctx.timestamp.to_string(),
        updated_at: ctx.timestamp.to_string(),
    }
}

fn simple_explanations(
    members: &[&Profile],
    guaranteed: bool,
) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut text = SIMPLE_RATIONALE.to_string();
    if guaranteed {
        text.push_str(GUARANTEE_SUFFIX);
    }
    members
        .iter()
        .map(|p| {
            let sections = BTreeMap::from([(GROUP_SECTION.to_string(), text.clone())]);
            (p.id.clone(), sections)
        })
        .collect()
}

fn detailed_explanations(
    members: &[&Profile],
    common: &[String],
    diversity: usize,
    guaranteed: bool,
) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut group_text = format!(
        "공통 관심사: {} | 직급 다양성: {}종",
        common.join(", "),
        diversity
    );
    if guaranteed {
        group_text.push_str(GUARANTEE_SUFFIX);
    }

    let shared = shared_interests(members);

    members
        .iter()
        .map(|p| {
            let mine: Vec<&str> = p
                .interests
                .iter()
                .map(String::as_str)
                .filter(|i| shared.contains(*i))
                .collect();
            let member_text = format!(
                "{} | 지역:{} | 직급:{} | 성향:{} | 공유 관심사({}): {}",
                p.display_name(),
                p.region,
                p.rank,
                p.personality_trait,
                mine.len(),
                if mine.is_empty() {
                    "-".to_string()
                } else {
                    mine.join(", ")
                }
            );
            let sections = BTreeMap::from([
                (GROUP_SECTION.to_string(), group_text.clone()),
                (MEMBER_SECTION.to_string(), member_text),
            ]);
            (p.id.clone(), sections)
        })
        .collect()
}

/// Interest labels listed by more than one member.
fn shared_interests(members: &[&Profile]) -> BTreeSet<String> {
    interest_counts(members)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(label, _)| label)
        .collect()
}

/// Diversity and cohesion metrics for a group of profiles.
pub fn club_metrics(members: &[&Profile]) -> ClubMetrics {
    let size = members.len().max(1);

    let ranks: Vec<Rank> = members
        .iter()
        .map(|p| p.rank)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let interest_counts = interest_counts(members);
    let shared_interest_count = interest_counts.values().filter(|&&c| c > 1).count();

    let mut trait_counts: BTreeMap<String, usize> = BTreeMap::new();
    for p in members {
        *trait_counts
            .entry(p.personality_trait.label().to_string())
            .or_insert(0) += 1;
    }

    let mut region_counts: BTreeMap<Region, usize> = BTreeMap::new();
    for p in members {
        *region_counts.entry(p.region).or_insert(0) += 1;
    }
    // Ties resolve to the earliest region in declaration order.
    let region_majority = region_counts
        .iter()
        .max_by(|(ra, ca), (rb, cb)| ca.cmp(cb).then_with(|| rb.cmp(ra)))
        .map(|(region, _)| *region);

    ClubMetrics {
        common_interests: common_interests(members).into_iter().collect(),
        rank_diversity: ranks.len(),
        rank_diversity_score: round_to(ranks.len() as f64 / size as f64, 2),
        ranks,
        interest_shannon: shannon(interest_counts.values().copied()),
        interest_counts,
        trait_shannon: shannon(trait_counts.values().copied()),
        trait_counts,
        region_majority,
        shared_interest_count,
    }
}

/// Shannon entropy (natural log) of a count distribution, three decimals.
pub fn shannon(counts: impl Iterator<Item = usize> + Clone) -> f64 {
    let total: usize = counts.clone().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let entropy: f64 = counts
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum();
    round_to(entropy, 3)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
