//! Built-in persona presets.
//!
//! `email` and `automation` are routable slugs without a preset; a
//! classification that lands on them falls back to the orchestrator.

use super::model::{Persona, PersonaSlug};

/// Returns the persona presets shipped with the application.
///
/// - **Master Orchestrator**: routes requests to specialized agents
/// - **Executive Summary**: concise briefings
/// - **Task Manager**: task tracking and prioritization
/// - **Calendar Intel**: scheduling and conflict detection
/// - **Research Pro**: web search and synthesis
pub fn get_default_presets() -> Vec<Persona> {
    vec![
        Persona {
            slug: PersonaSlug::Orchestrator,
            name: "Master Orchestrator".to_string(),
            icon: "🧠".to_string(),
            description: "Routes requests to specialized agents.".to_string(),
            system_instruction: "You are the Master Orchestrator for Nexus. Your job is to analyze the user message and determine which specialized agent (Executive, Tasks, Calendar, Email, Research, Automation) is best suited. Respond by acknowledging the task and delegating it.".to_string(),
            use_cases: vec!["Navigation".to_string(), "Complex coordination".to_string()],
        },
        Persona {
            slug: PersonaSlug::Executive,
            name: "Executive Summary".to_string(),
            icon: "📊".to_string(),
            description: "Synthesizes briefings from all sources.".to_string(),
            system_instruction: "You are the Executive Summary Agent. Provide concise, actionable briefings. Focus on \"What do I need to know now?\" and \"What do I need to do next?\".".to_string(),
            use_cases: vec!["Daily briefing".to_string(), "Catch up".to_string()],
        },
        Persona {
            slug: PersonaSlug::Tasks,
            name: "Task Manager".to_string(),
            icon: "✅".to_string(),
            description: "Manages your productivity repository.".to_string(),
            system_instruction: "You are the Task Management Agent. You help users track, prioritize, and complete tasks. Be organized and efficient.".to_string(),
            use_cases: vec![
                "Create task".to_string(),
                "List tasks".to_string(),
                "Prioritize".to_string(),
            ],
        },
        Persona {
            slug: PersonaSlug::Calendar,
            name: "Calendar Intel".to_string(),
            icon: "📅".to_string(),
            description: "Scheduling and conflict detection.".to_string(),
            system_instruction: "You are the Calendar Intelligence Agent. You manage time. Detect conflicts and suggest optimal meeting times.".to_string(),
            use_cases: vec![
                "Check availability".to_string(),
                "Schedule meeting".to_string(),
            ],
        },
        Persona {
            slug: PersonaSlug::Research,
            name: "Research Pro".to_string(),
            icon: "🔍".to_string(),
            description: "Web search and synthesis.".to_string(),
            system_instruction: "You are the Research Agent. Use web search to find up-to-date info and synthesize it into clear reports.".to_string(),
            use_cases: vec![
                "Market research".to_string(),
                "Competitor analysis".to_string(),
            ],
        },
    ]
}
