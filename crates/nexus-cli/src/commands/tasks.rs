use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use nexus_application::AppServices;
use nexus_core::task::{Task, TaskPriority, TaskStatus, TaskType};
use nexus_infrastructure::NexusPaths;

/// Root used when the configured user has no data store root.
const DEFAULT_ROOT_REF: &str = "default";

pub struct TaskDraft {
    pub title: String,
    pub priority: TaskPriority,
    pub task_type: TaskType,
    pub due: Option<NaiveDate>,
    pub notes: Option<String>,
}

async fn root_ref(services: &AppServices) -> String {
    services
        .identity
        .current_user()
        .await
        .and_then(|user| user.data_store_root_ref)
        .unwrap_or_else(|| DEFAULT_ROOT_REF.to_string())
}

pub async fn list(paths: NexusPaths, include_archived: bool) -> Result<()> {
    let services = AppServices::load(paths)?;
    let root = root_ref(&services).await;
    let tasks = services.task_store.get(&root).await?;

    let visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| include_archived || !t.archived)
        .collect();
    if visible.is_empty() {
        println!(
            "{}",
            format!("No tasks in {}", services.task_store.provider_display_name()).bright_black()
        );
        return Ok(());
    }

    for task in visible {
        let check = if task.completed { "✔" } else { "☐" };
        let title = match task.status {
            TaskStatus::Completed => task.title.strikethrough().to_string(),
            TaskStatus::InProgress => task.title.yellow().to_string(),
            TaskStatus::NotStarted => task.title.clone(),
        };
        let mut meta = vec![task.task_type.to_string()];
        if task.priority != TaskPriority::None {
            meta.push(task.priority.to_string());
        }
        if let Some(due) = task.due_date {
            meta.push(format!("due {due}"));
        }
        println!("{check} {title} {}", format!("[{}]", meta.join(", ")).bright_black());
    }
    Ok(())
}

pub async fn add(paths: NexusPaths, draft: TaskDraft) -> Result<()> {
    let services = AppServices::load(paths)?;
    let root = root_ref(&services).await;

    let mut task = Task::new(draft.title);
    task.priority = draft.priority;
    task.task_type = draft.task_type;
    task.due_date = draft.due;
    task.notes = draft.notes;
    services.task_store.save(&task, &root).await?;

    println!(
        "{}",
        format!(
            "Added '{}' to {}",
            task.title,
            services.task_store.provider_display_name()
        )
        .green()
    );
    Ok(())
}
