use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::persona::PersonaSlug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not started")]
    #[strum(to_string = "Not started", serialize = "not-started")]
    NotStarted,
    #[serde(rename = "In progress")]
    #[strum(to_string = "In progress", serialize = "in-progress")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum TaskPriority {
    #[serde(rename = "High Priority")]
    #[strum(to_string = "High Priority", serialize = "high")]
    High,
    Medium,
    Low,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum TaskType {
    #[default]
    #[serde(rename = "Today To-Do")]
    #[strum(to_string = "Today To-Do", serialize = "today")]
    Today,
    #[serde(rename = "Later To-Do")]
    #[strum(to_string = "Later To-Do", serialize = "later")]
    Later,
    #[serde(rename = "Maybe To-Do")]
    #[strum(to_string = "Maybe To-Do", serialize = "maybe")]
    Maybe,
}

/// A productivity task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, rename = "type")]
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_it_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personas_involved: Vec<PersonaSlug>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            task_type: TaskType::default(),
            due_date: None,
            do_it_date: None,
            notes: None,
            personas_involved: Vec::new(),
            archived: false,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Sets status, keeping the `completed` flag consistent with it.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Completed;
    }
}
