//! Task store trait.

use super::model::Task;
use crate::error::Result;

/// Uniform save/fetch contract over the local cache and remote document stores.
///
/// `root_ref` names the folder or database inside the store; stores without
/// that notion ignore it.
#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, root_ref: &str) -> Result<Vec<Task>>;

    /// Inserts the task, or replaces the stored task with the same id.
    async fn save(&self, task: &Task, root_ref: &str) -> Result<()>;

    fn provider_display_name(&self) -> &str;
}
