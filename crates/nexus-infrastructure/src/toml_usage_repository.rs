//! TOML-backed usage repository (`usage.toml`).

use std::path::PathBuf;

use nexus_core::error::Result;
use nexus_core::subscription::{SubscriptionUsage, UsageRepository};

use crate::storage::AtomicTomlFile;

pub struct TomlUsageRepository {
    file: AtomicTomlFile<SubscriptionUsage>,
}

impl TomlUsageRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

#[async_trait::async_trait]
impl UsageRepository for TomlUsageRepository {
    async fn load(&self) -> Result<Option<SubscriptionUsage>> {
        self.file.load()
    }

    async fn save(&self, usage: &SubscriptionUsage) -> Result<()> {
        self.file.save(usage)?;
        tracing::debug!(
            "Saved usage: platform={} byok={}",
            usage.tokens_used,
            usage.byok_tokens_used
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::provider::CredentialSource;
    use nexus_core::subscription::Tier;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlUsageRepository::new(temp_dir.path().join("usage.toml"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlUsageRepository::new(temp_dir.path().join("usage.toml"));
        let mut usage = SubscriptionUsage::new(Tier::Pro);
        usage.record(CredentialSource::Platform, 300);
        usage.record(CredentialSource::User, 1234);

        repo.save(&usage).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(usage));
    }
}
