pub mod credential_store;
pub mod local_task_store;
pub mod paths;
pub mod storage;
pub mod toml_usage_repository;

pub use crate::credential_store::FileCredentialStore;
pub use crate::local_task_store::LocalTaskStore;
pub use crate::paths::NexusPaths;
pub use crate::toml_usage_repository::TomlUsageRepository;
