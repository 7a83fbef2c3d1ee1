//! Conversation snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::{Interaction, Sender};
use crate::provider::ProviderSelection;

const TITLE_MAX_CHARS: usize = 48;

/// A point-in-time export of a transcript for an external persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub provider: ProviderSelection,
    pub interactions: Vec<Interaction>,
}

impl Conversation {
    /// Derives a title from the first user message, truncated on a char boundary.
    pub fn title_from(interactions: &[Interaction]) -> String {
        let Some(first) = interactions.iter().find(|i| i.sender == Sender::User) else {
            return "New conversation".to_string();
        };
        let text = first.content.trim();
        if text.chars().count() <= TITLE_MAX_CHARS {
            return text.to_string();
        }
        let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
        title.push('…');
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaSlug;

    #[test]
    fn test_title_skips_greeting() {
        let interactions = vec![
            Interaction::agent("c", PersonaSlug::Orchestrator, "Hello"),
            Interaction::user("c", "  plan my week  "),
        ];
        assert_eq!(Conversation::title_from(&interactions), "plan my week");
    }

    #[test]
    fn test_title_truncates_on_char_boundary() {
        let long = "ü".repeat(100);
        let title = Conversation::title_from(&[Interaction::user("c", long)]);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 1);
        assert!(title.ends_with('…'));
    }

    #[test]
    fn test_empty_transcript_title() {
        assert_eq!(Conversation::title_from(&[]), "New conversation");
    }
}
