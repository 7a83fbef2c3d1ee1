//! Task domain module.
//!
//! The task model and the uniform store contract shared by the local cache
//! and remote document stores.

mod model;
mod repository;

pub use model::{Task, TaskPriority, TaskStatus, TaskType};
pub use repository::TaskStore;
