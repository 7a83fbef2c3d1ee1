//! TOML files replaced atomically on save.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use nexus_core::error::Result;
use serde::{Serialize, de::DeserializeOwned};

use super::atomic_write::write_atomic;

/// Typed handle to a TOML file. Saves go through [`write_atomic`], so a
/// reader sees either the old document or the new one.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file is missing or blank.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(toml::from_str(&content)?))
    }

    pub fn save(&self, data: &T) -> Result<()> {
        let document = toml::to_string_pretty(data)?;
        write_atomic(&self.path, document.as_bytes(), None)
    }
}
