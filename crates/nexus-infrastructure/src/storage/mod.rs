//! Storage layer for atomic file operations.

mod atomic_toml;
mod atomic_write;
mod config_storage;
mod secret_storage;

pub use atomic_toml::AtomicTomlFile;
pub use atomic_write::write_atomic;
pub use config_storage::ConfigStorage;
pub use secret_storage::SecretStorage;
