//! # Club Engine
//!
//! File-backed stores around the pure matching core.
//!
//! ## Architecture
//!
//! The engine is composed of focused stores, one JSON file each:
//! - `ProfileStore` - Registered profiles, demo profile, duplicate checks
//! - `ClubStore` - Clubs from every run, activation
//! - `ReportStore` - Activity reports and verification
//! - `RunLog` - Metadata of each matching run, supersede flags
//!
//! [`ClubEngine`] ties them together: it loads profiles, runs
//! [`compute_matches`](crate::compute_matches), appends the new clubs and
//! records the run.

pub mod club_store;
pub mod collection;
pub mod profile_store;
pub mod report_store;
pub mod run_log;

pub use club_store::ClubStore;
pub use collection::JsonCollection;
pub use profile_store::{demo_profile, NewProfile, ProfileStore};
pub use report_store::ReportStore;
pub use run_log::RunLog;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::{
    compute_matches, create_id_with_prefix, now_iso, top_clubs, unassigned_ids, ClubMatchError,
    ClubStanding, MatchConfig, MatchRun, Result, SystemAnalytics,
};

/// Outcome of one persisted matching run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub club_count: usize,
    /// Profiles placed in a club by this run
    pub placed: usize,
    /// Profiles left without a club by this run
    pub unassigned: Vec<String>,
}

/// Matching engine over a data directory.
#[derive(Debug, Clone)]
pub struct ClubEngine {
    data_dir: PathBuf,
    pub profiles: ProfileStore,
    pub clubs: ClubStore,
    pub reports: ReportStore,
    pub runs: RunLog,
    config: MatchConfig,
}

impl ClubEngine {
    pub const PROFILES_FILE: &'static str = "users.json";
    pub const CLUBS_FILE: &'static str = "clubs.json";
    pub const REPORTS_FILE: &'static str = "activity_reports.json";
    pub const RUNS_FILE: &'static str = "match_runs.json";

    /// Open (creating if needed) a data directory with default configuration.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(data_dir, MatchConfig::default())
    }

    /// Open a data directory with custom configuration.
    pub fn with_config(data_dir: impl AsRef<Path>, config: MatchConfig) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            profiles: ProfileStore::new(data_dir.join(Self::PROFILES_FILE)),
            clubs: ClubStore::new(data_dir.join(Self::CLUBS_FILE)),
            reports: ReportStore::new(data_dir.join(Self::REPORTS_FILE)),
            runs: RunLog::new(data_dir.join(Self::RUNS_FILE)),
            data_dir,
            config,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MatchConfig {
        &mut self.config
    }

    /// Run matching over all stored profiles under a fresh run id.
    pub fn run_matching(&self) -> Result<RunSummary> {
        self.run_matching_as(&create_id_with_prefix("run"))
    }

    /// Run matching under the given run id and persist the result.
    ///
    /// # Errors
    ///
    /// `InvalidTargetSize` for a club size below 3, `InsufficientProfiles`
    /// when fewer profiles than one club (or the configured minimum) exist.
    pub fn run_matching_as(&self, run_id: &str) -> Result<RunSummary> {
        self.run_with(&self.config, run_id)
    }

    /// Repeat the most recent run's club size under a fresh run id.
    ///
    /// Mode, seed and designated profile come from the engine configuration.
    pub fn rerun_last(&self) -> Result<RunSummary> {
        let last = self.runs.latest()?.ok_or(ClubMatchError::NoPreviousRun)?;
        let config = MatchConfig {
            target_size: last.target_size,
            ..self.config.clone()
        };
        info!(
            "[Engine] Rerunning with settings of {} (target size {})",
            last.id, last.target_size
        );
        self.run_with(&config, &create_id_with_prefix("run"))
    }

    /// Mark a stored run superseded.
    pub fn supersede_run(&self, run_id: &str) -> Result<MatchRun> {
        self.runs.supersede(run_id)
    }

    fn run_with(&self, config: &MatchConfig, run_id: &str) -> Result<RunSummary> {
        config.validate()?;

        let profiles = self.profiles.load()?;
        if profiles.len() < config.target_size {
            return Err(ClubMatchError::InsufficientProfiles {
                count: profiles.len(),
                minimum: config.target_size,
            });
        }

        let existing = self.clubs.load()?;
        let clubs = compute_matches(&profiles, config, run_id, &existing)?;
        self.clubs.append(&clubs)?;

        self.runs.record(MatchRun {
            id: run_id.to_string(),
            created_at: now_iso(),
            target_size: config.target_size,
            user_count: profiles.len(),
            club_count: clubs.len(),
            superseded: false,
        })?;

        let unassigned = unassigned_ids(&profiles, &clubs);
        info!(
            "[Engine] Run {} stored: {} clubs, {} profiles unassigned",
            run_id,
            clubs.len(),
            unassigned.len()
        );

        Ok(RunSummary {
            run_id: run_id.to_string(),
            club_count: clubs.len(),
            placed: profiles.len() - unassigned.len(),
            unassigned,
        })
    }

    /// Verify a stored report and persist the awarded points.
    pub fn verify_report(&self, report_id: &str, base_points: u32) -> Result<u32> {
        let clubs = self.clubs.load()?;
        let profiles = self.profiles.load()?;
        self.reports.verify(report_id, &clubs, &profiles, base_points)
    }

    pub fn analytics(&self) -> Result<SystemAnalytics> {
        Ok(SystemAnalytics::compute(
            &self.profiles.load()?,
            &self.clubs.load()?,
            &self.runs.load()?,
            &self.reports.load()?,
        ))
    }

    pub fn top_clubs(&self, limit: usize) -> Result<Vec<ClubStanding>> {
        Ok(top_clubs(
            &self.clubs.load()?,
            &self.reports.load()?,
            &self.profiles.load()?,
            limit,
        ))
    }

    /// Delete clubs, reports and runs, and reset profiles to the demo profile.
    pub fn reset(&self) -> Result<()> {
        self.clubs.clear()?;
        self.reports.clear()?;
        self.runs.clear()?;
        self.profiles.reset()?;
        info!("[Engine] Reset data in {}", self.data_dir.display());
        Ok(())
    }
}
