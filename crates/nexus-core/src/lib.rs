pub mod config;
pub mod error;
pub mod persona;
pub mod provider;
pub mod secret;
pub mod session;
pub mod subscription;
pub mod task;
pub mod user;
pub mod voice;

// Re-export common error type
pub use error::{NexusError, Result};
