use std::sync::Arc;

use anyhow::{Result, bail};
use colored::Colorize;
use nexus_application::{
    AppServices, ConversationController, SharedVoice, VoiceController, VoiceLoop, lock_voice,
};
use nexus_core::persona::{PersonaCatalog, PersonaSlug};
use nexus_core::provider::ProviderSelection;
use nexus_core::session::{Interaction, RejectReason, TurnOutcome};
use nexus_infrastructure::NexusPaths;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use super::usage::print_usage;
use crate::helper::{COMMANDS, ChatHelper};
use crate::speech::ConsoleSpeechEngine;

pub struct ChatOptions {
    pub provider: Option<ProviderSelection>,
    pub persona: Option<PersonaSlug>,
    pub speak: bool,
    pub message: Option<String>,
}

pub async fn run(paths: NexusPaths, options: ChatOptions) -> Result<()> {
    let services = AppServices::load(paths)?;

    let voice = options.speak.then(|| {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut settings = services.config.voice.clone();
        settings.auto_speak = true;
        let voice = VoiceController::new(Arc::new(ConsoleSpeechEngine::new(tx)), settings)
            .into_shared();
        (voice, rx)
    });

    let mut controller = services
        .conversation(voice.as_ref().map(|(v, _)| v.clone()))
        .await?;
    if let Some(selection) = options.provider {
        controller = controller.with_provider_selection(selection);
    }
    if let Some(slug) = options.persona {
        controller.set_active_persona(slug)?;
    }
    let controller = Arc::new(controller);

    // Drains speech completions for the console engine.
    let voice_loop = voice.map(|(voice, rx)| VoiceLoop::new(voice, controller.clone(), rx).spawn());

    let result = match options.message {
        Some(message) => one_shot(&controller, &services.catalog, &message).await,
        None => repl(&controller, &services.catalog).await,
    };

    if let Some(handle) = voice_loop {
        handle.abort();
    }
    result
}

async fn one_shot(
    controller: &ConversationController,
    catalog: &PersonaCatalog,
    message: &str,
) -> Result<()> {
    match controller.run_turn(message).await {
        TurnOutcome::Completed(reply) => {
            print_interaction(catalog, &reply);
            Ok(())
        }
        TurnOutcome::Failed(notice) => bail!("{}", notice.content),
        TurnOutcome::Rejected(RejectReason::EmptyInput) => bail!("message is empty"),
        TurnOutcome::Rejected(reason) => bail!("message rejected: {reason}"),
    }
}

async fn repl(controller: &ConversationController, catalog: &PersonaCatalog) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== Nexus ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message, '/help' for commands, or '/quit' to exit.".bright_black()
    );
    println!();
    for interaction in controller.transcript() {
        print_interaction(catalog, &interaction);
    }

    loop {
        let line = match rl.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        if trimmed.starts_with('/') {
            if !handle_command(controller, catalog, trimmed) {
                break;
            }
            continue;
        }

        match controller.run_turn(trimmed).await {
            TurnOutcome::Completed(reply) | TurnOutcome::Failed(reply) => {
                print_interaction(catalog, &reply)
            }
            TurnOutcome::Rejected(reason) => {
                println!("{}", format!("(not sent: {reason})").bright_black())
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    Ok(())
}

/// Returns false when the REPL should exit.
fn handle_command(controller: &ConversationController, catalog: &PersonaCatalog, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (command, arg) {
        ("/quit" | "/exit", _) => return false,
        ("/help", _) => {
            for (cmd, help) in COMMANDS {
                println!("  {} {}", cmd.bright_cyan(), help.bright_black());
            }
        }
        ("/persona", None) => {
            let slug = controller.active_persona();
            let name = catalog.get(slug).map_or(slug.as_ref(), |p| p.name.as_str());
            println!("Active persona: {} ({slug})", name.bold());
        }
        ("/persona", Some(raw)) => match raw.parse::<PersonaSlug>() {
            Ok(slug) => match controller.set_active_persona(slug) {
                Ok(()) => println!("{}", format!("Persona set to {slug}").green()),
                Err(err) => println!("{}", err.to_string().red()),
            },
            Err(_) => println!("{}", format!("Unknown persona '{raw}'").red()),
        },
        ("/provider", None) => {
            println!("Provider: {}", controller.provider_selection());
        }
        ("/provider", Some(raw)) => match raw.parse::<ProviderSelection>() {
            Ok(selection) => {
                controller.set_provider_selection(selection);
                println!("{}", format!("Provider set to {selection}").green());
            }
            Err(err) => println!("{}", err.red()),
        },
        ("/usage", _) => print_usage(&controller.usage()),
        ("/export", _) => match serde_json::to_string_pretty(&controller.export_conversation()) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("{}", err.to_string().red()),
        },
        ("/voice", _) => match controller.voice() {
            Some(voice) => println!("{}", toggle_voice(voice)),
            None => println!("{}", "Voice is off; start with --speak".bright_black()),
        },
        ("/voices", _) => match controller.voice() {
            Some(voice) => {
                for v in lock_voice(voice).list_voices() {
                    println!("  {} ({})", v.name, v.lang);
                }
            }
            None => println!("{}", "Voice is off; start with --speak".bright_black()),
        },
        _ => println!("{}", format!("Unknown command {command}; try /help").bright_black()),
    }
    true
}

/// Flips hands-free mode and describes the result.
fn toggle_voice(voice: &SharedVoice) -> String {
    let toggled = lock_voice(voice).toggle_voice_mode();
    match toggled {
        Ok(true) => "Listening (hands-free on)".green().to_string(),
        Ok(false) => "Hands-free off".bright_black().to_string(),
        Err(err) => format!("Hands-free unavailable: {err}").red().to_string(),
    }
}

fn print_interaction(catalog: &PersonaCatalog, interaction: &Interaction) {
    if interaction.is_user() {
        println!("{}", format!("> {}", interaction.content).green());
        return;
    }

    let persona = interaction.persona.and_then(|slug| catalog.get(slug));
    let (icon, name) = persona.map_or(("🧠", "Nexus"), |p| (p.icon.as_str(), p.name.as_str()));
    println!("{} {}", icon, name.bright_magenta().bold());
    for line in interaction.content.lines() {
        println!("{}", line.bright_blue());
    }
    if let (Some(backend), Some(tokens), Some(source)) =
        (interaction.backend, interaction.tokens, interaction.source)
    {
        println!(
            "{}",
            format!("[{} · {tokens} tokens · {source}]", backend.display_name()).bright_black()
        );
    }
    println!();
}
