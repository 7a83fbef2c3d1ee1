//! Application configuration types.
//!
//! `config.toml` maps onto [`AppConfig`]; `secret.json` maps onto
//! [`SecretConfig`]. Every field has a default so a missing or partial file
//! is valid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::persona::PersonaOverride;
use crate::provider::{Backend, ProviderSelection};
use crate::subscription::Tier;
use crate::user::User;
use crate::voice::VoiceSettings;

pub const DEFAULT_HISTORY_WINDOW: usize = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GREETING: &str =
    "Hello {name}, I am Nexus. How can I assist your operations today?";

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chat: ChatConfig,
    pub models: ModelConfig,
    pub http: HttpConfig,
    pub voice: VoiceSettings,
    pub subscription: SubscriptionConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(rename = "persona", skip_serializing_if = "Vec::is_empty")]
    pub personas: Vec<PersonaOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of prior transcript entries sent as context.
    pub history_window: usize,
    /// Seeds the transcript; `{name}` is replaced by the user's first name.
    /// An empty string disables the greeting.
    pub greeting: String,
    pub provider: ProviderSelection,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            greeting: DEFAULT_GREETING.to_string(),
            provider: ProviderSelection::Auto,
        }
    }
}

impl ChatConfig {
    pub fn render_greeting(&self, name: &str) -> Option<String> {
        let greeting = self.greeting.trim();
        if greeting.is_empty() {
            return None;
        }
        Some(greeting.replace("{name}", name))
    }
}

/// Model names per backend, and which backend classifies personas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub gemini: String,
    pub openai: String,
    pub anthropic: String,
    pub perplexity: String,
    pub classifier_backend: Backend,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            gemini: "gemini-3-pro-preview".to_string(),
            openai: "gpt-4o".to_string(),
            anthropic: "claude-3-5-sonnet-20240620".to_string(),
            perplexity: "llama-3.1-sonar-large-128k-online".to_string(),
            classifier_backend: Backend::Gemini,
        }
    }
}

impl ModelConfig {
    pub fn model_for(&self, backend: Backend) -> &str {
        match backend {
            Backend::Gemini => &self.gemini,
            Backend::OpenAI => &self.openai,
            Backend::Anthropic => &self.anthropic,
            Backend::Perplexity => &self.perplexity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionConfig {
    pub tier: Tier,
}

/// One provider entry in `secret.json`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSecret {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl fmt::Debug for ProviderSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSecret")
            .field("api_key", &"[REDACTED]")
            .field("model_name", &self.model_name)
            .finish()
    }
}

/// Root of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<ProviderSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<ProviderSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<ProviderSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perplexity: Option<ProviderSecret>,
}

impl SecretConfig {
    pub fn entry(&self, backend: Backend) -> Option<&ProviderSecret> {
        match backend {
            Backend::Gemini => self.gemini.as_ref(),
            Backend::OpenAI => self.openai.as_ref(),
            Backend::Anthropic => self.anthropic.as_ref(),
            Backend::Perplexity => self.perplexity.as_ref(),
        }
    }

    pub fn entry_mut(&mut self, backend: Backend) -> &mut Option<ProviderSecret> {
        match backend {
            Backend::Gemini => &mut self.gemini,
            Backend::OpenAI => &mut self.openai,
            Backend::Anthropic => &mut self.anthropic,
            Backend::Perplexity => &mut self.perplexity,
        }
    }

    /// Stores a key, keeping any model override already present.
    pub fn set_key(&mut self, backend: Backend, api_key: impl Into<String>) {
        let slot = self.entry_mut(backend);
        let model_name = slot.take().and_then(|s| s.model_name);
        *slot = Some(ProviderSecret {
            api_key: api_key.into(),
            model_name,
        });
    }
}
