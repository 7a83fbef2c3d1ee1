//! Local JSON task cache (`tasks.json`).
//!
//! Tasks are grouped by root reference so several roots can share one file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use nexus_core::error::Result;
use nexus_core::task::{Task, TaskStore};
use tokio::sync::Mutex;

use crate::storage::write_atomic;

const PROVIDER_NAME: &str = "Local Cache";

type TaskFile = BTreeMap<String, Vec<Task>>;

pub struct LocalTaskStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl LocalTaskStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<TaskFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(TaskFile::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TaskFile::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl TaskStore for LocalTaskStore {
    async fn get(&self, root_ref: &str) -> Result<Vec<Task>> {
        let mut all = self.read_all().await?;
        Ok(all.remove(root_ref).unwrap_or_default())
    }

    async fn save(&self, task: &Task, root_ref: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        let tasks = all.entry(root_ref.to_string()).or_default();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        let json = serde_json::to_string_pretty(&all)?;
        write_atomic(&self.path, json.as_bytes(), None)?;
        tracing::debug!("Saved task {} under '{}'", task.id, root_ref);
        Ok(())
    }

    fn provider_display_name(&self) -> &str {
        PROVIDER_NAME
    }
}
