//! Unified error handling for club matching.

use thiserror::Error;

/// Errors raised by the matching engine, the stores and the report workflow.
#[derive(Debug, Error)]
pub enum ClubMatchError {
    /// Not enough profiles to run matching at all.
    #[error("need at least {minimum} profiles to run matching, got {count}")]
    InsufficientProfiles { count: usize, minimum: usize },

    /// Target club size below the supported minimum.
    #[error("target size {target_size} is too small (minimum is 3)")]
    InvalidTargetSize { target_size: usize },

    /// Survey submitted with the wrong number of answers.
    #[error("expected {expected} survey answers, got {got}")]
    InvalidSurvey { expected: usize, got: usize },

    /// Survey answer outside the 1-5 Likert scale.
    #[error("survey answer {value} is outside 1..=5")]
    InvalidSurveyAnswer { value: u8 },

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("club not found: {0}")]
    ClubNotFound(String),

    #[error("activity report not found: {0}")]
    ReportNotFound(String),

    #[error("match run not found: {0}")]
    RunNotFound(String),

    /// A rerun was requested before any run was recorded.
    #[error("no previous match run to repeat")]
    NoPreviousRun,

    /// Another profile already uses this name in the same region.
    #[error("duplicate profile: {name} ({region})")]
    DuplicateProfile { name: String, region: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Atomic replace of a collection file failed.
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ClubMatchError>;

/// Turn `Option` lookups into typed not-found errors.
pub trait OptionExt<T> {
    fn ok_or_profile_not_found(self, id: &str) -> Result<T>;
    fn ok_or_club_not_found(self, id: &str) -> Result<T>;
    fn ok_or_report_not_found(self, id: &str) -> Result<T>;
    fn ok_or_run_not_found(self, id: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_profile_not_found(self, id: &str) -> Result<T> {
        self.ok_or_else(|| ClubMatchError::ProfileNotFound(id.to_string()))
    }

    fn ok_or_club_not_found(self, id: &str) -> Result<T> {
        self.ok_or_else(|| ClubMatchError::ClubNotFound(id.to_string()))
    }

    fn ok_or_report_not_found(self, id: &str) -> Result<T> {
        self.ok_or_else(|| ClubMatchError::ReportNotFound(id.to_string()))
    }

    fn ok_or_run_not_found(self, id: &str) -> Result<T> {
        self.ok_or_else(|| ClubMatchError::RunNotFound(id.to_string()))
    }
}
