//! Synthetic roster generator for demos, tests and benchmarking.
//!
//! Generates plausible employee profiles from a seed, with canonical
//! Korean names drawn deterministically from a family × given name pool.
//!
//! Feature-gated behind `synthetic`.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use clubmatch::synthetic::SyntheticRoster;
//!
//! let roster = SyntheticRoster { count: 30, seed: 42, start_index: 0 };
//! let profiles = roster.generate(&HashSet::new());
//! assert_eq!(profiles.len(), 30);
//! ```

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{
    classify_personality, create_id_with_prefix, now_iso, PersonalityTrait, Profile, Rank,
    Region, INTERESTS,
};

// ============================================================================
// Names
// ============================================================================

pub const FAMILY_NAMES: [&str; 20] = [
    "김", "이", "박", "최", "정", "강", "조", "윤", "장", "임", "오", "한", "신", "서", "권", "황",
    "안", "송", "유", "전",
];

pub const GIVEN_NAMES: [&str; 40] = [
    "서준", "민준", "서연", "지후", "하윤", "지우", "서현", "도윤", "예준", "하준", "지민", "유진",
    "수아", "윤서", "현우", "연우", "다은", "주원", "시우", "가은", "은우", "준서", "세아", "지호",
    "예린", "태윤", "소윤", "지안", "민서", "다현", "은서", "나윤", "채원", "시윤", "지환", "서율",
    "지유", "준우", "하율", "예서",
];

fn raw_name_for_index(index: usize) -> String {
    let family = FAMILY_NAMES[index % FAMILY_NAMES.len()];
    let given = GIVEN_NAMES[(index / FAMILY_NAMES.len()) % GIVEN_NAMES.len()];
    format!("{family}{given}")
}

/// Canonical name for `index`, skipping names already in `existing`.
///
/// Walks forward through the pool on collision; once the whole pool is
/// taken, appends a numeric suffix such as `김서준(2)`.
pub fn canonical_name(index: usize, existing: &HashSet<String>) -> String {
    let pool = FAMILY_NAMES.len() * GIVEN_NAMES.len();
    for attempt in 0..pool {
        let candidate = raw_name_for_index(index + attempt);
        if !existing.contains(&candidate) {
            return candidate;
        }
    }

    let base = raw_name_for_index(index % pool);
    let mut suffix = 2;
    while existing.contains(&format!("{base}({suffix})")) {
        suffix += 1;
    }
    format!("{base}({suffix})")
}

/// `count` distinct canonical names starting at `start_index`.
pub fn canonical_names(
    count: usize,
    existing: &HashSet<String>,
    start_index: usize,
) -> Vec<String> {
    let mut used = existing.clone();
    (0..count)
        .map(|i| {
            let name = canonical_name(start_index + i, &used);
            used.insert(name.clone());
            name
        })
        .collect()
}

// ============================================================================
// Roster
// ============================================================================

/// Scenario configuration for a synthetic roster.
#[derive(Debug, Clone)]
pub struct SyntheticRoster {
    /// Number of profiles to generate.
    pub count: usize,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
    /// First index into the name pool.
    pub start_index: usize,
}

impl SyntheticRoster {
    /// Generate profiles, avoiding names in `existing_names`.
    ///
    /// Attributes are a function of the seed; ids are fresh on every call.
    pub fn generate(&self, existing_names: &HashSet<String>) -> Vec<Profile> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let names = canonical_names(self.count, existing_names, self.start_index);

        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let interest_count = rng.gen_range(2..=4);
                let interests: Vec<String> = INTERESTS
                    .choose_multiple(&mut rng, interest_count)
                    .map(|s| s.to_string())
                    .collect();
                let answers: Vec<u8> = (0..5).map(|_| rng.gen_range(1..=5)).collect();
                let personality_trait =
                    classify_personality(&answers).unwrap_or(PersonalityTrait::Neutral);

                Profile {
                    id: create_id_with_prefix("u"),
                    name,
                    employee_number: format!("E{}", 2024001 + self.start_index + i),
                    region: Region::ALL[rng.gen_range(0..Region::ALL.len())],
                    rank: Rank::ALL[rng.gen_range(0..Rank::ALL.len())],
                    interests,
                    personality_trait,
                    survey_answers: Some(answers),
                    created_at: now_iso(),
                }
            })
            .collect()
    }
}
