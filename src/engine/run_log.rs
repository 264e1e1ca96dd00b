//! Log of matching runs.

use std::path::PathBuf;

use log::info;

use crate::error::OptionExt;
use crate::{MatchRun, Result};

use super::collection::JsonCollection;

#[derive(Debug, Clone)]
pub struct RunLog {
    collection: JsonCollection<MatchRun>,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            collection: JsonCollection::new(path),
        }
    }

    pub fn load(&self) -> Result<Vec<MatchRun>> {
        self.collection.load()
    }

    pub fn record(&self, run: MatchRun) -> Result<()> {
        self.collection.append(run)
    }

    pub fn get(&self, run_id: &str) -> Result<MatchRun> {
        self.load()?
            .into_iter()
            .find(|r| r.id == run_id)
            .ok_or_run_not_found(run_id)
    }

    /// Most recent run by creation time; the later entry wins a tie.
    pub fn latest(&self) -> Result<Option<MatchRun>> {
        Ok(self
            .load()?
            .into_iter()
            .max_by(|a, b| a.created_at.cmp(&b.created_at)))
    }

    /// Flag a run as replaced by a newer one. Its clubs are left untouched.
    pub fn supersede(&self, run_id: &str) -> Result<MatchRun> {
        let mut runs = self.load()?;
        let run = runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or_run_not_found(run_id)?;
        run.superseded = true;
        let superseded = run.clone();

        self.collection.replace_all(&runs)?;
        info!("[RunLog] Marked run {} superseded", run_id);
        Ok(superseded)
    }

    pub fn clear(&self) -> Result<()> {
        self.collection.clear()
    }
}
