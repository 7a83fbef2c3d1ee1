use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nexus_core::persona::PersonaSlug;
use nexus_core::provider::{Backend, ProviderSelection};
use nexus_core::task::{TaskPriority, TaskType};
use nexus_infrastructure::NexusPaths;

mod commands;
mod helper;
mod logging;
mod speech;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Nexus - multi-provider assistant with persona dispatch", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration directory (default: ~/.config/nexus, or $NEXUS_CONFIG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with Nexus. Sends MESSAGE once, or opens a REPL when omitted
    Chat {
        /// auto, gemini, openai, anthropic or perplexity
        #[arg(long)]
        provider: Option<ProviderSelection>,

        /// Start with a specialized persona instead of the orchestrator
        #[arg(long)]
        persona: Option<PersonaSlug>,

        /// Read replies aloud on the console speech engine. Playback only:
        /// the console has no speech recognition, so /voice reports it unavailable
        #[arg(long)]
        speak: bool,

        message: Vec<String>,
    },
    /// Manage your own provider API keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Show subscription usage
    Usage,
    /// List available personas
    Personas,
    /// Manage tasks in the local task store
    Tasks {
        #[command(subcommand)]
        action: TasksAction,
    },
}

#[derive(Subcommand)]
enum KeysAction {
    /// Store a key for a backend
    Set { backend: Backend, key: String },
    /// Remove a stored key
    Remove { backend: Backend },
    /// Show which backends have a usable credential
    List,
}

#[derive(Subcommand)]
enum TasksAction {
    /// List tasks
    List {
        /// Include archived tasks
        #[arg(long)]
        all: bool,
    },
    /// Add a task
    Add {
        title: String,

        /// high, medium, low or none
        #[arg(long, default_value = "none")]
        priority: TaskPriority,

        /// today, later or maybe
        #[arg(long = "type", default_value = "today")]
        task_type: TaskType,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<chrono::NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = NexusPaths::new(cli.config_dir.as_deref())?;
    let _log_guard = logging::init(cli.verbose, &paths.logs_dir());
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "nexus starting");

    match cli.command {
        Commands::Chat {
            provider,
            persona,
            speak,
            message,
        } => {
            let options = commands::chat::ChatOptions {
                provider,
                persona,
                speak,
                message: (!message.is_empty()).then(|| message.join(" ")),
            };
            commands::chat::run(paths, options).await?
        }
        Commands::Keys { action } => match action {
            KeysAction::Set { backend, key } => commands::keys::set(paths, backend, &key)?,
            KeysAction::Remove { backend } => commands::keys::remove(paths, backend)?,
            KeysAction::List => commands::keys::list(paths)?,
        },
        Commands::Usage => commands::usage::show(paths).await?,
        Commands::Personas => commands::personas::list(paths)?,
        Commands::Tasks { action } => match action {
            TasksAction::List { all } => commands::tasks::list(paths, all).await?,
            TasksAction::Add {
                title,
                priority,
                task_type,
                due,
                notes,
            } => {
                let draft = commands::tasks::TaskDraft {
                    title,
                    priority,
                    task_type,
                    due,
                    notes,
                };
                commands::tasks::add(paths, draft).await?
            }
        },
    }

    Ok(())
}
