//! Profile storage with registration rules.
//!
//! Manages the registered employee profiles, including:
//! - Keeping the demo profile present
//! - Duplicate detection on (name, region)
//! - Deriving the personality trait from survey answers

use std::path::PathBuf;

use crate::error::OptionExt;
use crate::{
    classify_personality, create_id_with_prefix, now_iso, ClubMatchError, PersonalityTrait,
    Profile, Rank, Region, Result, DEMO_PROFILE_ID,
};

use super::collection::JsonCollection;

/// The built-in demo account.
pub fn demo_profile() -> Profile {
    Profile {
        id: DEMO_PROFILE_ID.to_string(),
        name: "데모사용자".to_string(),
        employee_number: "E0000000".to_string(),
        region: Region::Seoul,
        rank: Rank::Staff,
        interests: vec!["축구".to_string(), "영화보기".to_string()],
        personality_trait: PersonalityTrait::Neutral,
        survey_answers: Some(vec![3; 5]),
        created_at: now_iso(),
    }
}

/// Registration form input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub name: String,
    pub employee_number: String,
    pub region: Region,
    pub rank: Rank,
    pub interests: Vec<String>,
    pub survey_answers: Vec<u8>,
}

/// Storage for registered profiles.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    collection: JsonCollection<Profile>,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            collection: JsonCollection::new(path),
        }
    }

    /// Load all profiles, adding the demo profile if it is missing.
    pub fn load(&self) -> Result<Vec<Profile>> {
        let mut profiles = self.collection.load()?;
        if !profiles.iter().any(|p| p.id == DEMO_PROFILE_ID) {
            profiles.push(demo_profile());
            self.collection.replace_all(&profiles)?;
        }
        Ok(profiles)
    }

    /// Replace all profiles. The demo profile is kept even if omitted.
    pub fn save(&self, profiles: &[Profile]) -> Result<()> {
        if profiles.iter().any(|p| p.id == DEMO_PROFILE_ID) {
            return self.collection.replace_all(profiles);
        }
        let mut all = profiles.to_vec();
        all.push(demo_profile());
        self.collection.replace_all(&all)
    }

    pub fn get(&self, id: &str) -> Result<Profile> {
        self.load()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_profile_not_found(id)
    }

    /// Register a new profile.
    ///
    /// # Errors
    ///
    /// `DuplicateProfile` if the name is taken in the same region, or a
    /// survey error if the answers are invalid.
    pub fn register(&self, draft: NewProfile) -> Result<Profile> {
        let mut profiles = self.load()?;
        ensure_unique(&draft, &profiles, None)?;
        let personality_trait = classify_personality(&draft.survey_answers)?;

        let profile = Profile {
            id: create_id_with_prefix("u"),
            name: draft.name,
            employee_number: draft.employee_number,
            region: draft.region,
            rank: draft.rank,
            interests: dedup_interests(draft.interests),
            personality_trait,
            survey_answers: Some(draft.survey_answers),
            created_at: now_iso(),
        };
        profiles.push(profile.clone());
        self.collection.replace_all(&profiles)?;
        Ok(profile)
    }

    /// Overwrite an existing profile's editable fields.
    pub fn update(&self, id: &str, draft: NewProfile) -> Result<Profile> {
        let mut profiles = self.load()?;
        ensure_unique(&draft, &profiles, Some(id))?;
        let personality_trait = classify_personality(&draft.survey_answers)?;

        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_profile_not_found(id)?;
        profile.name = draft.name;
        profile.employee_number = draft.employee_number;
        profile.region = draft.region;
        profile.rank = draft.rank;
        profile.interests = dedup_interests(draft.interests);
        profile.personality_trait = personality_trait;
        profile.survey_answers = Some(draft.survey_answers);
        let updated = profile.clone();

        self.collection.replace_all(&profiles)?;
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let profiles = self.load()?;
        let before = profiles.len();
        let remaining: Vec<Profile> = profiles.into_iter().filter(|p| p.id != id).collect();
        if remaining.len() == before {
            return Err(ClubMatchError::ProfileNotFound(id.to_string()));
        }
        self.save(&remaining)
    }

    /// Append already-built profiles (e.g. a synthetic roster).
    pub fn add_many(&self, new_profiles: Vec<Profile>) -> Result<usize> {
        let count = new_profiles.len();
        let mut profiles = self.load()?;
        profiles.extend(new_profiles);
        self.collection.replace_all(&profiles)?;
        Ok(count)
    }

    /// Drop every profile and re-seed the demo profile.
    pub fn reset(&self) -> Result<()> {
        self.collection.replace_all(&[demo_profile()])
    }
}

fn ensure_unique(draft: &NewProfile, profiles: &[Profile], exclude_id: Option<&str>) -> Result<()> {
    let name = draft.name.trim().to_lowercase();
    let taken = profiles
        .iter()
        .filter(|p| Some(p.id.as_str()) != exclude_id)
        .any(|p| p.name.trim().to_lowercase() == name && p.region == draft.region);
    if taken {
        return Err(ClubMatchError::DuplicateProfile {
            name: draft.name.clone(),
            region: draft.region.to_string(),
        });
    }
    Ok(())
}

/// Interests are a set; keep the first occurrence of each label.
fn dedup_interests(interests: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(interests.len());
    for label in interests {
        let label = label.trim().to_string();
        if !label.is_empty() && !out.contains(&label) {
            out.push(label);
        }
    }
    out
}
