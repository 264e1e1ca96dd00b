//! # Club Match
//!
//! Club formation engine for employee interest clubs.
//!
//! This library provides:
//! - Bucketing of profiles by region and personality trait
//! - Greedy, rank-diverse club formation over shared interests
//! - Explainable club finalization (simple or detailed rationale)
//! - A guarantee pass that places a designated profile via relaxed constraints
//! - Activity reports with simulated verification scoring and club points
//! - JSON-file stores with atomic replace for profiles, clubs, reports and runs
//!
//! ## Features
//!
//! - **`persistence`** - JSON-file stores and the [`ClubEngine`] run façade
//! - **`synthetic`** - Seeded sample roster generator
//! - **`cli`** - The `clubmatch-cli` binary
//!
//! ## Quick Start
//!
//! ```rust
//! use clubmatch::{compute_matches, MatchConfig, PersonalityTrait, Profile, Rank, Region};
//!
//! let profiles: Vec<Profile> = Rank::ALL
//!     .iter()
//!     .enumerate()
//!     .map(|(i, rank)| {
//!         let id = format!("u{i}");
//!         Profile::new(id, Region::Seoul, *rank, PersonalityTrait::Neutral, ["축구", "독서"])
//!     })
//!     .collect();
//!
//! let config = MatchConfig { seed: Some(42), ..MatchConfig::default() };
//! let clubs = compute_matches(&profiles, &config, "run-1", &[]).unwrap();
//! assert_eq!(clubs.len(), 1);
//! assert_eq!(clubs[0].member_ids.len(), 5);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{ClubMatchError, OptionExt, Result};

// Interest and rank utilities over groups of profiles
pub mod interests;
pub use interests::{common_interests, primary_interest, rank_diversity};

// (region, personality trait) pre-filter
pub mod bucketing;
pub use bucketing::{bucket_profiles, eligible_buckets, BucketKey};

// Greedy club formation inside a bucket
pub mod grouping;
pub use grouping::{form_groups, BucketFormation};

// Club finalization and rationale
pub mod explain;
pub use explain::{finalize_club, sequence_label, ClubMetrics, FinalizeContext};

// Fallback placement of the designated profile
pub mod guarantee;
pub use guarantee::{guarantee_club, GuaranteeRequest};

// Run orchestration
pub mod matching;
pub use matching::{compute_matches, derive_seed, unassigned_ids};

// Personality survey
pub mod survey;
pub use survey::{classify_personality, SURVEY_QUESTIONS};

// Activity reports, verification scoring and analytics
pub mod reports;
pub use reports::{
    club_points, create_report, top_clubs, unverify_report, verify_report, ActivityReport,
    ClubStanding, ReportStatus, SystemAnalytics, VerificationMetrics,
};

// JSON-file stores and the run façade
#[cfg(feature = "persistence")]
pub mod engine;
#[cfg(feature = "persistence")]
pub use engine::{
    demo_profile, ClubEngine, ClubStore, JsonCollection, NewProfile, ProfileStore, ReportStore,
    RunLog, RunSummary,
};

// Seeded sample data
#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Constants
// ============================================================================

/// Club size used when the caller does not ask for one.
pub const DEFAULT_TARGET_SIZE: usize = 5;

/// Smallest club size the engine accepts.
pub const MIN_TARGET_SIZE: usize = 3;

/// Fewest profiles a run will accept.
pub const DEFAULT_MIN_PROFILES: usize = 5;

/// Id of the demo account that the guarantee pass places by default.
pub const DEMO_PROFILE_ID: &str = "demo_user";

/// Interest labels offered at registration.
pub const INTERESTS: [&str; 9] = [
    "축구", "영화보기", "보드게임", "러닝", "독서", "헬스", "요리", "사진", "등산",
];

// ============================================================================
// Enumerated Labels
// ============================================================================

/// Office location of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "서울")]
    Seoul,
    #[serde(rename = "부산")]
    Busan,
    #[serde(rename = "대전")]
    Daejeon,
    #[serde(rename = "대구")]
    Daegu,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Seoul, Region::Busan, Region::Daejeon, Region::Daegu];

    pub fn label(&self) -> &'static str {
        match self {
            Region::Seoul => "서울",
            Region::Busan => "부산",
            Region::Daejeon => "대전",
            Region::Daegu => "대구",
        }
    }
}

/// Job rank, ordered by seniority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "사원")]
    Staff,
    #[serde(rename = "대리")]
    AssistantManager,
    #[serde(rename = "과장")]
    Manager,
    #[serde(rename = "차장")]
    DeputyGeneralManager,
    #[serde(rename = "부장")]
    GeneralManager,
}

impl Rank {
    pub const ALL: [Rank; 5] = [
        Rank::Staff,
        Rank::AssistantManager,
        Rank::Manager,
        Rank::DeputyGeneralManager,
        Rank::GeneralManager,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Staff => "사원",
            Rank::AssistantManager => "대리",
            Rank::Manager => "과장",
            Rank::DeputyGeneralManager => "차장",
            Rank::GeneralManager => "부장",
        }
    }
}

/// Personality trait derived from the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PersonalityTrait {
    #[serde(rename = "외향")]
    Extrovert,
    #[serde(rename = "내향")]
    Introvert,
    #[serde(rename = "중간")]
    Neutral,
}

impl PersonalityTrait {
    pub fn label(&self) -> &'static str {
        match self {
            PersonalityTrait::Extrovert => "외향",
            PersonalityTrait::Introvert => "내향",
            PersonalityTrait::Neutral => "중간",
        }
    }
}

macro_rules! label_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

label_display!(Region, Rank, PersonalityTrait);

// ============================================================================
// Core Types
// ============================================================================

/// One employee's registration record.
///
/// Read-only input to a matching run. Unknown fields are rejected when
/// loading from JSON so malformed records fail at the store boundary.
///
/// # Example
/// ```
/// use clubmatch::{PersonalityTrait, Profile, Rank, Region};
///
/// let p = Profile::new("u1", Region::Busan, Rank::Manager, PersonalityTrait::Extrovert, ["러닝"]);
/// assert!(p.has_interest("러닝"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub employee_number: String,
    pub region: Region,
    pub rank: Rank,
    /// Interest labels. Semantically a set; order is kept for display.
    #[serde(default)]
    pub interests: Vec<String>,
    pub personality_trait: PersonalityTrait,
    /// Raw Likert answers the trait was derived from (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_answers: Option<Vec<u8>>,
    #[serde(default)]
    pub created_at: String,
}

impl Profile {
    /// Create a profile with no name, survey or timestamp.
    pub fn new<I, S>(
        id: impl Into<String>,
        region: Region,
        rank: Rank,
        personality_trait: PersonalityTrait,
        interests: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: String::new(),
            employee_number: String::new(),
            region,
            rank,
            interests: interests.into_iter().map(Into::into).collect(),
            personality_trait,
            survey_answers: None,
            created_at: String::new(),
        }
    }

    /// Interest labels as a set.
    pub fn interest_set(&self) -> BTreeSet<&str> {
        self.interests.iter().map(String::as_str).collect()
    }

    pub fn has_interest(&self, label: &str) -> bool {
        self.interests.iter().any(|i| i == label)
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Lifecycle of a club. Runs create `Matched` clubs; admins activate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClubStatus {
    #[default]
    Matched,
    Active,
}

/// A club produced by one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    /// "{region} {primary interest} 클럽 {sequence}"
    pub name: String,
    /// Member profile ids; the leader comes first
    pub member_ids: Vec<String>,
    pub leader_id: String,
    pub primary_interest: Option<String>,
    #[serde(default)]
    pub status: ClubStatus,
    #[serde(default)]
    pub chat_link: Option<String>,
    /// Structured metrics, present in detailed explanation mode
    #[serde(default)]
    pub match_score_breakdown: Option<ClubMetrics>,
    /// member id -> section -> rationale
    #[serde(default)]
    pub explanations: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub match_run_id: Option<String>,
    /// Built by the guarantee pass rather than the main algorithm
    #[serde(default)]
    pub guaranteed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Club {
    pub fn contains(&self, profile_id: &str) -> bool {
        self.member_ids.iter().any(|m| m == profile_id)
    }

    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

/// Metadata recorded for each matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRun {
    pub id: String,
    pub created_at: String,
    pub target_size: usize,
    pub user_count: usize,
    pub club_count: usize,
    #[serde(default)]
    pub superseded: bool,
}

// ============================================================================
// Configuration
// ============================================================================

/// Verbosity of the per-member rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationMode {
    /// One canned line per member
    Simple,
    /// Shared interests, rank diversity and per-member detail
    #[default]
    Detailed,
}

impl FromStr for ExplanationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(ExplanationMode::Simple),
            "detailed" => Ok(ExplanationMode::Detailed),
            other => Err(format!("unknown explanation mode: {other}")),
        }
    }
}

/// Configuration for a matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Members per club.
    /// Default: 5
    pub target_size: usize,

    /// Runs with fewer profiles fail with `InsufficientProfiles`.
    /// Default: 5
    pub min_profiles: usize,

    /// Rationale verbosity.
    /// Default: detailed
    pub explanation_mode: ExplanationMode,

    /// Profile the guarantee pass places. `None` disables the pass.
    /// Default: "demo_user"
    pub designated_profile_id: Option<String>,

    /// Explicit RNG seed. When `None` the seed is derived from the run id.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            min_profiles: DEFAULT_MIN_PROFILES,
            explanation_mode: ExplanationMode::Detailed,
            designated_profile_id: Some(DEMO_PROFILE_ID.to_string()),
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Default configuration with a different club size.
    pub fn with_target_size(target_size: usize) -> Self {
        Self {
            target_size,
            ..Self::default()
        }
    }

    /// Caller-side validation; the engine itself only checks the profile count.
    pub fn validate(&self) -> Result<()> {
        if self.target_size < MIN_TARGET_SIZE {
            return Err(ClubMatchError::InvalidTargetSize {
                target_size: self.target_size,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Ids and Timestamps
// ============================================================================

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Process-wide sequence so ids minted within one millisecond stay distinct.
static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Fresh id of the form `{prefix}_{unix_millis}_{sequence}_{4 random chars}`.
///
/// Unique within a process; the random tail separates processes.
pub fn create_id_with_prefix(prefix: &str) -> String {
    let sequence = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!(
        "{}_{}_{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        sequence,
        suffix
    )
}

/// Current UTC time, RFC 3339 with a `Z` suffix and second precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
