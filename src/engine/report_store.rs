//! Activity report storage and the verification workflow.

use std::path::PathBuf;

use crate::error::OptionExt;
use crate::reports::{create_report, unverify_report, verify_report, ActivityReport};
use crate::{Club, Profile, Result};

use super::collection::JsonCollection;

#[derive(Debug, Clone)]
pub struct ReportStore {
    collection: JsonCollection<ActivityReport>,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            collection: JsonCollection::new(path),
        }
    }

    pub fn load(&self) -> Result<Vec<ActivityReport>> {
        self.collection.load()
    }

    /// Store a new pending report for a club.
    pub fn submit(
        &self,
        club_id: &str,
        date: &str,
        photo_filename: &str,
        raw_text: &str,
        participant_count: Option<u32>,
    ) -> Result<ActivityReport> {
        let report = create_report(club_id, date, photo_filename, raw_text, participant_count);
        self.collection.append(report.clone())?;
        Ok(report)
    }

    /// Verify a report against its club and persist the award.
    pub fn verify(
        &self,
        report_id: &str,
        clubs: &[Club],
        profiles: &[Profile],
        base_points: u32,
    ) -> Result<u32> {
        let mut reports = self.load()?;
        let report = reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_report_not_found(report_id)?;
        let club = clubs
            .iter()
            .find(|c| c.id == report.club_id)
            .ok_or_club_not_found(&report.club_id)?;

        let points = verify_report(report, club, profiles, base_points);
        self.collection.replace_all(&reports)?;
        Ok(points)
    }

    pub fn unverify(&self, report_id: &str) -> Result<()> {
        let mut reports = self.load()?;
        let report = reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_report_not_found(report_id)?;
        unverify_report(report);
        self.collection.replace_all(&reports)
    }

    pub fn clear(&self) -> Result<()> {
        self.collection.clear()
    }
}
