//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: `User`, `StorageProvider`
//! - `service`: `IdentityProvider` trait and the config-backed `StaticIdentityProvider`

mod model;
mod service;

pub use model::{StorageProvider, User};
pub use service::{IdentityProvider, StaticIdentityProvider};
