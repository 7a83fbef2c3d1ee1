//! Unified path management for nexus configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/nexus/             # Config directory (or $NEXUS_CONFIG_DIR)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys (0600)
//! ├── usage.toml               # Subscription usage counters
//! ├── tasks.json               # Local task cache
//! └── logs/                    # Application logs
//!     └── nexus.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use nexus_core::error::{NexusError, Result};

/// Environment variable overriding the base directory.
pub const CONFIG_DIR_ENV: &str = "NEXUS_CONFIG_DIR";

const APP_DIR: &str = "nexus";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NexusPaths {
    base: PathBuf,
}

impl NexusPaths {
    /// Resolves the base directory: explicit `base`, then `$NEXUS_CONFIG_DIR`,
    /// then `~/.config/nexus`.
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        Self::resolve(base.map(Path::to_path_buf), from_env, dirs::home_dir())
    }

    fn resolve(
        explicit: Option<PathBuf>,
        from_env: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(base) = explicit {
            return Ok(Self { base });
        }
        if let Some(base) = from_env.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self { base });
        }
        let home = home.ok_or_else(|| NexusError::config("Cannot find home directory"))?;
        Ok(Self {
            base: home.join(".config").join(APP_DIR),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.toml")
    }

    /// # Security Note
    ///
    /// Written with 600 permissions on Unix.
    pub fn secret_file(&self) -> PathBuf {
        self.base.join("secret.json")
    }

    pub fn usage_file(&self) -> PathBuf {
        self.base.join("usage.toml")
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.base.join("tasks.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_wins() {
        let paths = NexusPaths::resolve(
            Some(PathBuf::from("/tmp/explicit")),
            Some(PathBuf::from("/tmp/env")),
            Some(PathBuf::from("/home/alex")),
        )
        .unwrap();
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/explicit/config.toml"));
    }

    #[test]
    fn test_env_override_before_home() {
        let paths = NexusPaths::resolve(
            None,
            Some(PathBuf::from("/tmp/env")),
            Some(PathBuf::from("/home/alex")),
        )
        .unwrap();
        assert_eq!(paths.secret_file(), PathBuf::from("/tmp/env/secret.json"));
    }

    #[test]
    fn test_home_default() {
        let paths =
            NexusPaths::resolve(None, Some(PathBuf::new()), Some(PathBuf::from("/home/alex")))
                .unwrap();
        assert!(paths.config_dir().ends_with(".config/nexus"));
        assert!(paths.logs_dir().ends_with("nexus/logs"));
    }

    #[test]
    fn test_no_home_is_config_error() {
        let err = NexusPaths::resolve(None, None, None).unwrap_err();
        assert!(err.is_config());
    }
}
