//! JSON-file collection with atomic replace.
//!
//! Each collection is a single pretty-printed JSON array. Writes go to a
//! temporary file in the same directory which is then renamed over the
//! target, so readers never observe a half-written file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::{ClubMatchError, Result};

/// A list of records persisted as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonCollection<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records. A missing or blank file is an empty collection.
    pub fn load(&self) -> Result<Vec<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            warn!(
                "[Store] Rejecting malformed collection {}: {}",
                self.path.display(),
                e
            );
            ClubMatchError::Json(e)
        })
    }

    /// Replace the whole collection atomically.
    pub fn replace_all(&self, items: &[T]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, items)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;

        tmp.persist(&self.path)
            .map_err(|e| ClubMatchError::Persist {
                path: self.path.display().to_string(),
                source: e.error,
            })?;
        Ok(())
    }

    /// Append one record.
    pub fn append(&self, item: T) -> Result<()> {
        self.extend(std::iter::once(item))
    }

    /// Append several records in one write.
    pub fn extend(&self, items: impl IntoIterator<Item = T>) -> Result<()> {
        let mut all = self.load()?;
        all.extend(items);
        self.replace_all(&all)
    }

    pub fn clear(&self) -> Result<()> {
        self.replace_all(&[])
    }
}
