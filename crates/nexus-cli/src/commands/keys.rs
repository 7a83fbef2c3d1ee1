use std::sync::Arc;

use anyhow::{Result, bail};
use colored::Colorize;
use nexus_core::provider::{Backend, CredentialSource};
use nexus_core::secret::CredentialStore;
use nexus_infrastructure::{FileCredentialStore, NexusPaths};
use nexus_interaction::credential_resolver::MIN_USER_CREDENTIAL_LEN;
use nexus_interaction::{CredentialResolver, PlatformCredentials};
use strum::IntoEnumIterator;

pub fn set(paths: NexusPaths, backend: Backend, key: &str) -> Result<()> {
    if key.trim().chars().count() <= MIN_USER_CREDENTIAL_LEN {
        bail!("key is too short; it must be longer than {MIN_USER_CREDENTIAL_LEN} characters");
    }
    let store = FileCredentialStore::open(paths.secret_file())?;
    store.set(backend, key)?;
    println!("{}", format!("Saved key for {}", backend.display_name()).green());
    Ok(())
}

pub fn remove(paths: NexusPaths, backend: Backend) -> Result<()> {
    let store = FileCredentialStore::open(paths.secret_file())?;
    store.remove(backend)?;
    println!("Removed key for {}", backend.display_name());
    Ok(())
}

pub fn list(paths: NexusPaths) -> Result<()> {
    let store = FileCredentialStore::open(paths.secret_file())?;
    let resolver = CredentialResolver::new(Arc::new(store.clone()), PlatformCredentials::from_env());

    for backend in Backend::iter() {
        let credential = resolver.resolve(backend);
        let status = if credential.is_empty() {
            "not configured".red().to_string()
        } else {
            match credential.source {
                CredentialSource::User => {
                    let key = store.get(backend).unwrap_or_default();
                    format!("your key {}", mask(&key)).green().to_string()
                }
                CredentialSource::Platform => "platform key".cyan().to_string(),
            }
        };
        println!("{:<12} {status}", backend.display_name());
    }
    Ok(())
}

/// Shows only the last four characters.
fn mask(key: &str) -> String {
    let key = key.trim();
    let count = key.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask("sk-live-abcdef1234"), "****1234");
        assert_eq!(mask("abc"), "****");
    }
}
