//! Transcript entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::persona::PersonaSlug;
use crate::provider::{Backend, ChatTurn, CredentialSource, HistoryRole, NormalizedReply};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// A single user or agent turn. Immutable once appended to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
    /// Owning persona (agent turns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<PersonaSlug>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<Backend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CredentialSource>,
}

impl Interaction {
    fn base(conversation_id: &str, sender: Sender, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            timestamp: Utc::now(),
            sender,
            persona: None,
            content,
            tokens: None,
            backend: None,
            source: None,
        }
    }

    pub fn user(conversation_id: &str, content: impl Into<String>) -> Self {
        Self::base(conversation_id, Sender::User, content.into())
    }

    /// An agent turn without provider metadata (greetings, failure notices).
    pub fn agent(conversation_id: &str, persona: PersonaSlug, content: impl Into<String>) -> Self {
        let mut interaction = Self::base(conversation_id, Sender::Agent, content.into());
        interaction.persona = Some(persona);
        interaction
    }

    /// An agent turn carrying the reply's token total, backend and credential source.
    pub fn from_reply(conversation_id: &str, persona: PersonaSlug, reply: &NormalizedReply) -> Self {
        let mut interaction = Self::agent(conversation_id, persona, reply.text.clone());
        interaction.tokens = Some(reply.usage.total_tokens);
        interaction.backend = Some(reply.backend);
        interaction.source = Some(reply.source);
        interaction
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Maps this entry to the role vocabulary backends understand.
    pub fn to_chat_turn(&self) -> ChatTurn {
        let role = match self.sender {
            Sender::User => HistoryRole::User,
            Sender::Agent => HistoryRole::Model,
        };
        ChatTurn {
            role,
            text: self.content.clone(),
        }
    }
}
