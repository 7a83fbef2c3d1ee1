//! File-backed credential store over `secret.json`.

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use nexus_core::config::SecretConfig;
use nexus_core::error::Result;
use nexus_core::provider::Backend;
use nexus_core::secret::CredentialStore;

use crate::storage::SecretStorage;

/// Per-backend API keys read from `secret.json`, cached after the first load.
///
/// Writes go to disk first and update the cache only on success.
#[derive(Clone)]
pub struct FileCredentialStore {
    secrets: Arc<RwLock<SecretConfig>>,
    storage: Arc<SecretStorage>,
}

impl FileCredentialStore {
    /// Opens the store, loading the file once.
    pub fn open(path: PathBuf) -> Result<Self> {
        let storage = SecretStorage::with_path(path);
        let secrets = storage.load()?;
        tracing::debug!(
            "Loaded credentials from {} ({} configured)",
            storage.path().display(),
            count_configured(&secrets)
        );
        Ok(Self {
            secrets: Arc::new(RwLock::new(secrets)),
            storage: Arc::new(storage),
        })
    }

    /// Model name override stored next to a key, if any.
    pub fn model_override(&self, backend: Backend) -> Option<String> {
        self.read()
            .entry(backend)
            .and_then(|entry| entry.model_name.clone())
            .filter(|name| !name.trim().is_empty())
    }

    /// Snapshot of the cached file contents.
    pub fn snapshot(&self) -> SecretConfig {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, SecretConfig> {
        self.secrets.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SecretConfig> {
        self.secrets.write().unwrap_or_else(|e| e.into_inner())
    }

    fn modify(&self, f: impl FnOnce(&mut SecretConfig)) -> Result<()> {
        let mut guard = self.write();
        let mut next = guard.clone();
        f(&mut next);
        self.storage.save(&next)?;
        *guard = next;
        Ok(())
    }
}

fn count_configured(secrets: &SecretConfig) -> usize {
    [
        Backend::Gemini,
        Backend::OpenAI,
        Backend::Anthropic,
        Backend::Perplexity,
    ]
    .into_iter()
    .filter(|b| {
        secrets
            .entry(*b)
            .is_some_and(|e| !e.api_key.trim().is_empty())
    })
    .count()
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, backend: Backend) -> Option<String> {
        self.read()
            .entry(backend)
            .map(|entry| entry.api_key.clone())
            .filter(|key| !key.is_empty())
    }

    fn set(&self, backend: Backend, secret: &str) -> Result<()> {
        let secret = secret.trim().to_string();
        self.modify(|config| config.set_key(backend, secret))?;
        tracing::info!("Stored API key for {}", backend);
        Ok(())
    }

    fn remove(&self, backend: Backend) -> Result<()> {
        self.modify(|config| {
            *config.entry_mut(backend) = None;
        })?;
        tracing::info!("Removed API key for {}", backend);
        Ok(())
    }
}
