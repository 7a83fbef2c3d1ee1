//! Credential Resolver.
//!
//! Picks the credential for a backend: the user's own key when one is
//! configured, otherwise the platform key for the one backend that has it.

use std::fmt;
use std::sync::Arc;

use nexus_core::provider::{Backend, CredentialSource, GatewayError, ProviderCredential};
use nexus_core::secret::CredentialStore;
use secrecy::{ExposeSecret, SecretString};

/// A user key counts only when its trimmed length exceeds this.
pub const MIN_USER_CREDENTIAL_LEN: usize = 5;

pub const PLATFORM_KEY_ENV: &str = "NEXUS_PLATFORM_API_KEY";
pub const PLATFORM_KEY_FALLBACK_ENV: &str = "GEMINI_API_KEY";

/// Process-wide platform-provisioned secrets.
#[derive(Default)]
pub struct PlatformCredentials {
    gemini: Option<SecretString>,
}

impl PlatformCredentials {
    pub fn new(gemini: Option<String>) -> Self {
        Self {
            gemini: gemini
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(SecretString::new),
        }
    }

    /// Reads `NEXUS_PLATFORM_API_KEY`, falling back to `GEMINI_API_KEY`.
    pub fn from_env() -> Self {
        let key = std::env::var(PLATFORM_KEY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| std::env::var(PLATFORM_KEY_FALLBACK_ENV).ok());
        Self::new(key)
    }

    /// The platform secret for `backend`, if provisioned.
    pub fn get(&self, backend: Backend) -> Option<&SecretString> {
        match backend {
            Backend::Gemini => self.gemini.as_ref(),
            Backend::OpenAI | Backend::Anthropic | Backend::Perplexity => None,
        }
    }

    pub fn is_provisioned(&self, backend: Backend) -> bool {
        self.get(backend).is_some()
    }
}

impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformCredentials")
            .field("gemini", &self.gemini.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
    platform: Arc<PlatformCredentials>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn CredentialStore>, platform: PlatformCredentials) -> Self {
        Self {
            store,
            platform: Arc::new(platform),
        }
    }

    /// Pure lookup. Never fails; an empty secret with source `Platform` means
    /// nothing is configured.
    pub fn resolve(&self, backend: Backend) -> ProviderCredential {
        if let Some(user_key) = self
            .store
            .get(backend)
            .map(|k| k.trim().to_string())
            .filter(|k| k.chars().count() > MIN_USER_CREDENTIAL_LEN)
        {
            return ProviderCredential::new(user_key, CredentialSource::User);
        }

        if backend.has_platform_fallback() {
            if let Some(platform) = self.platform.get(backend) {
                return ProviderCredential::new(
                    platform.expose_secret().clone(),
                    CredentialSource::Platform,
                );
            }
        }

        ProviderCredential::missing()
    }

    /// [`resolve`](Self::resolve) for an outgoing request.
    ///
    /// Fails with `Authentication` when no usable secret exists, before any
    /// network traffic. This covers the fallback backend when the platform
    /// secret is not provisioned.
    pub fn resolve_for_call(&self, backend: Backend) -> Result<ProviderCredential, GatewayError> {
        let credential = self.resolve(backend);
        if credential.is_empty() {
            tracing::debug!(%backend, "No credential available");
            return Err(GatewayError::Authentication { backend });
        }
        Ok(credential)
    }

    pub fn has_user_credential(&self, backend: Backend) -> bool {
        self.resolve(backend).source == CredentialSource::User
    }
}
