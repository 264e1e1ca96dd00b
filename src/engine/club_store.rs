//! Club storage. Append-only from the engine's point of view.

use std::path::PathBuf;

use crate::error::OptionExt;
use crate::{now_iso, Club, ClubStatus, Result};

use super::collection::JsonCollection;

#[derive(Debug, Clone)]
pub struct ClubStore {
    collection: JsonCollection<Club>,
}

impl ClubStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            collection: JsonCollection::new(path),
        }
    }

    pub fn load(&self) -> Result<Vec<Club>> {
        self.collection.load()
    }

    /// Append the clubs of a new run. Earlier clubs are never touched.
    pub fn append(&self, clubs: &[Club]) -> Result<()> {
        self.collection.extend(clubs.iter().cloned())
    }

    pub fn get(&self, club_id: &str) -> Result<Club> {
        self.load()?
            .into_iter()
            .find(|c| c.id == club_id)
            .ok_or_club_not_found(club_id)
    }

    /// Mark a club active and attach its chat link.
    pub fn activate(&self, club_id: &str, chat_link: Option<&str>) -> Result<Club> {
        let mut clubs = self.load()?;
        let club = clubs
            .iter_mut()
            .find(|c| c.id == club_id)
            .ok_or_club_not_found(club_id)?;
        club.status = ClubStatus::Active;
        club.chat_link = Some(chat_link.unwrap_or_default().to_string());
        club.updated_at = now_iso();
        let activated = club.clone();

        self.collection.replace_all(&clubs)?;
        Ok(activated)
    }

    /// Every club the profile belongs to, oldest first.
    pub fn clubs_for_member(&self, profile_id: &str) -> Result<Vec<Club>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|c| c.contains(profile_id))
            .collect())
    }

    /// Clubs formed by one matching run, in stored order.
    pub fn clubs_for_run(&self, run_id: &str) -> Result<Vec<Club>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|c| c.match_run_id.as_deref() == Some(run_id))
            .collect())
    }

    /// The profile's most recently updated club.
    pub fn current_club_for(&self, profile_id: &str) -> Result<Option<Club>> {
        let clubs = self.clubs_for_member(profile_id)?;
        Ok(clubs
            .into_iter()
            .max_by(|a, b| a.updated_at.cmp(&b.updated_at)))
    }

    pub fn clear(&self) -> Result<()> {
        self.collection.clear()
    }
}
