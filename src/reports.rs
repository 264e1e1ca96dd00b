//! Club activity reports, simulated verification and points.
//!
//! Verification is a deterministic scoring function over the report text
//! and the club's members, not a real classifier.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::interests::rank_diversity;
use crate::{create_id_with_prefix, now_iso, Club, ClubStatus, MatchRun, Profile};

/// Points for each club interest mentioned in the report text.
const POINTS_PER_INTEREST: u32 = 5;
/// Points for full attendance, scaled by the participation ratio.
const PARTICIPATION_POINTS: f64 = 10.0;
/// Points for a fully detailed report, scaled by the detail ratio.
const DETAIL_POINTS: f64 = 5.0;
/// Characters of report text that count as fully detailed.
const DETAIL_CHARS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    Pending,
    Verified,
}

/// Scores produced by verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationMetrics {
    /// Distinct member interests mentioned in the text
    pub interest: usize,
    /// Participants / club size, capped at 1.0
    pub participation: f64,
    /// Text length / 50 chars, capped at 1.0
    pub detail: f64,
}

/// A club's report of one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub id: String,
    pub club_id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub photo_filename: String,
    pub raw_text: String,
    pub formatted_report: String,
    #[serde(default)]
    pub participant_count: Option<u32>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_metrics: Option<VerificationMetrics>,
    pub created_at: String,
}

/// Create a pending report.
pub fn create_report(
    club_id: &str,
    date: &str,
    photo_filename: &str,
    raw_text: &str,
    participant_count: Option<u32>,
) -> ActivityReport {
    let participants = participant_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let formatted_report = format!(
        "활동일자: {}, 참여인원: {}, 활동내용: {}",
        date, participants, raw_text
    )
    .trim()
    .to_string();

    ActivityReport {
        id: create_id_with_prefix("rep"),
        club_id: club_id.to_string(),
        date: date.to_string(),
        photo_filename: photo_filename.to_string(),
        raw_text: raw_text.to_string(),
        formatted_report,
        participant_count,
        status: ReportStatus::Pending,
        verified_at: None,
        points_awarded: None,
        verification_metrics: None,
        created_at: now_iso(),
    }
}

/// Score a report against its club and mark it verified.
///
/// Returns the points awarded. Re-verifying keeps the original award.
pub fn verify_report(
    report: &mut ActivityReport,
    club: &Club,
    profiles: &[Profile],
    base_points: u32,
) -> u32 {
    if report.status == ReportStatus::Verified {
        if let Some(points) = report.points_awarded {
            return points;
        }
    }

    let metrics = score_report(report, club, profiles);
    let interest_points = POINTS_PER_INTEREST.saturating_mul(metrics.interest as u32);
    let points = base_points
        .saturating_add(interest_points)
        .saturating_add((PARTICIPATION_POINTS * metrics.participation).round() as u32)
        .saturating_add((DETAIL_POINTS * metrics.detail).round() as u32);

    report.status = ReportStatus::Verified;
    report.verified_at = Some(now_iso());
    report.points_awarded = Some(points);
    report.verification_metrics = Some(metrics);
    points
}

/// Return a report to pending, dropping its award.
pub fn unverify_report(report: &mut ActivityReport) {
    report.status = ReportStatus::Pending;
    report.verified_at = None;
    report.points_awarded = None;
    report.verification_metrics = None;
}

fn score_report(report: &ActivityReport, club: &Club, profiles: &[Profile]) -> VerificationMetrics {
    let members: Vec<&Profile> = profiles.iter().filter(|p| club.contains(&p.id)).collect();

    let interests: BTreeSet<&str> = members
        .iter()
        .flat_map(|p| p.interests.iter().map(String::as_str))
        .collect();
    let interest = interests
        .iter()
        .filter(|label| report.raw_text.contains(*label))
        .count();

    let participation = match (report.participant_count, club.len()) {
        (Some(n), size) if size > 0 => (f64::from(n) / size as f64).min(1.0),
        _ => 0.0,
    };

    let detail = (report.raw_text.chars().count() as f64 / DETAIL_CHARS).min(1.0);

    VerificationMetrics {
        interest,
        participation,
        detail,
    }
}

// ============================================================================
// Analytics
// ============================================================================

/// Total verified points per club id.
pub fn club_points(reports: &[ActivityReport]) -> BTreeMap<String, u32> {
    let mut points: BTreeMap<String, u32> = BTreeMap::new();
    for report in reports {
        if report.status == ReportStatus::Verified {
            let total = points.entry(report.club_id.clone()).or_insert(0);
            *total = total.saturating_add(report.points_awarded.unwrap_or(0));
        }
    }
    points
}

/// A club's position in the points table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubStanding {
    pub club_id: String,
    /// "{leader name} 팀"
    pub label: String,
    pub points: u32,
}

/// Clubs with the most verified points, highest first. Ties go to the smaller club id.
pub fn top_clubs(
    clubs: &[Club],
    reports: &[ActivityReport],
    profiles: &[Profile],
    limit: usize,
) -> Vec<ClubStanding> {
    let by_id: HashMap<&str, &Club> = clubs.iter().map(|c| (c.id.as_str(), c)).collect();
    let names: HashMap<&str, &str> = profiles
        .iter()
        .map(|p| (p.id.as_str(), p.display_name()))
        .collect();

    let mut ranked: Vec<(String, u32)> = club_points(reports).into_iter().collect();
    ranked.sort_by(|(a_id, a_pts), (b_id, b_pts)| b_pts.cmp(a_pts).then_with(|| a_id.cmp(b_id)));

    ranked
        .into_iter()
        .filter_map(|(club_id, points)| {
            let club = by_id.get(club_id.as_str())?;
            let leader = names
                .get(club.leader_id.as_str())
                .copied()
                .unwrap_or(club.leader_id.as_str());
            Some(ClubStanding {
                label: format!("{} 팀", leader),
                club_id,
                points,
            })
        })
        .take(limit)
        .collect()
}

/// System-wide counters for the admin overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemAnalytics {
    pub total_users: usize,
    pub total_clubs: usize,
    pub active_clubs: usize,
    pub total_match_runs: usize,
    pub pending_reports: usize,
    pub verified_reports: usize,
    pub total_points_awarded: u32,
    /// Mean distinct rank count per non-empty club
    pub avg_rank_diversity: f64,
    /// Mean distinct interest count per non-empty club
    pub avg_interest_variety: f64,
}

impl SystemAnalytics {
    pub fn compute(
        profiles: &[Profile],
        clubs: &[Club],
        runs: &[MatchRun],
        reports: &[ActivityReport],
    ) -> Self {
        let mut analytics = Self {
            total_users: profiles.len(),
            total_clubs: clubs.len(),
            active_clubs: clubs
                .iter()
                .filter(|c| c.status == ClubStatus::Active)
                .count(),
            total_match_runs: runs.len(),
            pending_reports: reports
                .iter()
                .filter(|r| r.status == ReportStatus::Pending)
                .count(),
            verified_reports: reports
                .iter()
                .filter(|r| r.status == ReportStatus::Verified)
                .count(),
            total_points_awarded: club_points(reports)
                .values()
                .fold(0u32, |acc, p| acc.saturating_add(*p)),
            ..Self::default()
        };

        if profiles.is_empty() {
            return analytics;
        }

        let by_id: HashMap<&str, &Profile> = profiles.iter().map(|p| (p.id.as_str(), p)).collect();
        let mut rank_total = 0usize;
        let mut variety_total = 0usize;
        let mut counted = 0usize;
        for club in clubs.iter().filter(|c| !c.is_empty()) {
            let members: Vec<&Profile> = club
                .member_ids
                .iter()
                .filter_map(|id| by_id.get(id.as_str()).copied())
                .collect();
            let variety: BTreeSet<&str> = members
                .iter()
                .flat_map(|p| p.interests.iter().map(String::as_str))
                .collect();
            rank_total += rank_diversity(&members);
            variety_total += variety.len();
            counted += 1;
        }

        if counted > 0 {
            analytics.avg_rank_diversity = rank_total as f64 / counted as f64;
            analytics.avg_interest_variety = variety_total as f64 / counted as f64;
        }
        analytics
    }
}
