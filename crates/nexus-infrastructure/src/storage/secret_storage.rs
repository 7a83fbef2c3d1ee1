//! Secret configuration file storage (`secret.json`).
//!
//! # Security Note
//!
//! Plaintext JSON, written with 600 permissions on Unix. Contents are never
//! logged.

use std::fs;
use std::path::{Path, PathBuf};

use nexus_core::config::SecretConfig;
use nexus_core::error::Result;

use super::atomic_write::write_atomic;

const SECRET_FILE_MODE: u32 = 0o600;

pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads `secret.json`; a missing or blank file is an empty config.
    pub fn load(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, config: &SecretConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes(), Some(SECRET_FILE_MODE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
