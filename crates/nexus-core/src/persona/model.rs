//! Persona domain model.
//!
//! A persona is a specialized agent role: a slug from a closed set, a display
//! identity and the system instruction sent with every request it answers.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Identity of every persona the dispatcher can route to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PersonaSlug {
    /// Generic router persona; classifies messages into the others.
    Orchestrator,
    Executive,
    Tasks,
    Calendar,
    Email,
    Research,
    Automation,
}

impl PersonaSlug {
    /// Parses a slug from free-form text, tolerating surrounding whitespace and quotes.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        raw.trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '`' || c == '.')
            .trim()
            .parse()
            .ok()
    }

    pub fn is_orchestrator(self) -> bool {
        self == PersonaSlug::Orchestrator
    }
}

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub slug: PersonaSlug,
    /// Display name, e.g. "Research Pro"
    pub name: String,
    pub icon: String,
    pub description: String,
    /// Sent as the system instruction of every request this persona answers
    pub system_instruction: String,
    #[serde(default)]
    pub use_cases: Vec<String>,
}

/// A `[[persona]]` table from `config.toml`.
///
/// Fields left out keep the preset value. An override for a slug without a
/// preset must supply at least `name` and `system_instruction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaOverride {
    pub slug: PersonaSlug,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<Vec<String>>,
}

impl Default for PersonaSlug {
    fn default() -> Self {
        PersonaSlug::Orchestrator
    }
}

impl Persona {
    /// Applies an override in place. The slug is never changed.
    pub fn apply(&mut self, patch: &PersonaOverride) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = icon.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(instruction) = &patch.system_instruction {
            self.system_instruction = instruction.clone();
        }
        if let Some(use_cases) = &patch.use_cases {
            self.use_cases = use_cases.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_slug_round_trip() {
        for slug in PersonaSlug::iter() {
            assert_eq!(slug.to_string().parse::<PersonaSlug>().unwrap(), slug);
        }
        assert_eq!(PersonaSlug::iter().count(), 7);
    }

    #[test]
    fn test_parse_loose() {
        assert_eq!(
            PersonaSlug::parse_loose("  Calendar\n"),
            Some(PersonaSlug::Calendar)
        );
        assert_eq!(
            PersonaSlug::parse_loose("\"research\""),
            Some(PersonaSlug::Research)
        );
        assert_eq!(PersonaSlug::parse_loose("marketing"), None);
        assert_eq!(PersonaSlug::parse_loose(""), None);
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut persona = Persona {
            slug: PersonaSlug::Tasks,
            name: "Task Manager".into(),
            icon: "✅".into(),
            description: "d".into(),
            system_instruction: "old".into(),
            use_cases: vec!["Create task".into()],
        };
        persona.apply(&PersonaOverride {
            slug: PersonaSlug::Tasks,
            system_instruction: Some("new".into()),
            ..Default::default()
        });
        assert_eq!(persona.system_instruction, "new");
        assert_eq!(persona.name, "Task Manager");
        assert_eq!(persona.use_cases, vec!["Create task".to_string()]);
    }
}
