//! Credential store trait.
//!
//! Per-backend user-supplied API keys. The resolver only reads through
//! this seam; the CLI writes through it.
//!
//! # Security Note
//!
//! Implementations should ensure that:
//! - Secret files have appropriate permissions (e.g., 600 on Unix)
//! - Secrets are never logged or exposed in error messages

use crate::error::Result;
use crate::provider::Backend;

pub trait CredentialStore: Send + Sync {
    /// The stored secret for `backend`, if any.
    fn get(&self, backend: Backend) -> Option<String>;

    fn set(&self, backend: Backend, secret: &str) -> Result<()>;

    fn remove(&self, backend: Backend) -> Result<()>;
}
