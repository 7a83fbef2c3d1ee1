//! `config.toml` storage.

use std::path::PathBuf;

use nexus_core::config::AppConfig;
use nexus_core::error::Result;

use super::atomic_toml::AtomicTomlFile;

/// Loads and saves [`AppConfig`]. A missing file yields defaults.
pub struct ConfigStorage {
    file: AtomicTomlFile<AppConfig>,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        let config = self.file.load()?;
        if config.is_none() {
            tracing::debug!(
                "No config at {}, using defaults",
                self.file.path().display()
            );
        }
        Ok(config.unwrap_or_default())
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.file.save(config)
    }

    /// Writes a default config when none exists yet. Returns true if it wrote one.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.file.path().exists() {
            return Ok(false);
        }
        self.file.save(&AppConfig::default())?;
        Ok(true)
    }
}
