//! Provider domain models.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Large-language-model backends the gateway can talk to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    /// Default backend; the only one with a platform-provisioned credential.
    Gemini,
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAI,
    /// Long-context / reasoning backend.
    Anthropic,
    /// Search-capable backend.
    Perplexity,
}

impl Backend {
    /// The backend used when nothing more specific applies.
    pub const DEFAULT: Backend = Backend::Gemini;
    /// The backend chosen for freshness / search intent.
    pub const SEARCH: Backend = Backend::Perplexity;
    /// The backend chosen for long inputs and code / analysis requests.
    pub const REASONING: Backend = Backend::Anthropic;

    /// Whether a platform credential can stand in when the user has none.
    pub fn has_platform_fallback(self) -> bool {
        matches!(self, Backend::Gemini)
    }

    /// Human-readable product name.
    pub fn display_name(self) -> &'static str {
        match self {
            Backend::Gemini => "Gemini",
            Backend::OpenAI => "GPT-4o",
            Backend::Anthropic => "Claude",
            Backend::Perplexity => "Perplexity",
        }
    }
}

/// Who pays for a request: the user's own key (BYOK) or the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CredentialSource {
    User,
    Platform,
}

/// A credential resolved for a single request.
///
/// Derived on demand from the credential store; never persisted.
#[derive(Debug)]
pub struct ProviderCredential {
    pub secret: SecretString,
    pub source: CredentialSource,
}

impl ProviderCredential {
    pub fn new(secret: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            source,
        }
    }

    /// The "nothing configured" result: empty secret attributed to the platform.
    pub fn missing() -> Self {
        Self::new(String::new(), CredentialSource::Platform)
    }

    pub fn is_empty(&self) -> bool {
        self.secret.expose_secret().trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }
}

/// Role of a history entry as seen by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Model,
}

/// One prior turn forwarded to a backend as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: HistoryRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Model,
            text: text.into(),
        }
    }
}

/// Per-request knobs. Backends ignore what they cannot honour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// Ask for retrieval / browsing augmentation.
    pub use_search: bool,
    /// JSON schema the reply must conform to (constrained output).
    pub response_schema: Option<serde_json::Value>,
}

impl ChatOptions {
    pub fn with_search(mut self, use_search: bool) -> Self {
        self.use_search = use_search;
        self
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Fully shaped request handed to a [`ChatBackend`](super::ChatBackend).
#[derive(Debug)]
pub struct ChatRequest {
    pub system_instruction: String,
    pub history: Vec<ChatTurn>,
    pub message: String,
    pub options: ChatOptions,
    pub credential: ProviderCredential,
}

/// Token accounting for one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    /// True when the backend reported nothing and the placeholder triple was used.
    #[serde(default)]
    pub estimated: bool,
}

impl TokenUsage {
    pub const PLACEHOLDER_PROMPT: u32 = 100;
    pub const PLACEHOLDER_COMPLETION: u32 = 200;
    pub const PLACEHOLDER_TOTAL: u32 = 300;

    pub fn exact(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
            estimated: false,
        }
    }

    /// Fixed approximate figures for backends whose reply carries no usage block.
    ///
    /// These are not measurements; `estimated` lets quota consumers tell them apart.
    pub fn placeholder() -> Self {
        Self {
            prompt_tokens: Self::PLACEHOLDER_PROMPT,
            completion_tokens: Self::PLACEHOLDER_COMPLETION,
            total_tokens: Self::PLACEHOLDER_TOTAL,
            estimated: true,
        }
    }
}

/// Canonical gateway output, whatever backend produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReply {
    pub text: String,
    pub usage: TokenUsage,
    pub backend: Backend,
    pub source: CredentialSource,
}

/// Whether the caller pinned a backend or lets the router pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProviderSelection {
    #[default]
    Auto,
    Pinned(Backend),
}

impl fmt::Display for ProviderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSelection::Auto => f.write_str("auto"),
            ProviderSelection::Pinned(backend) => write!(f, "{backend}"),
        }
    }
}

impl FromStr for ProviderSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(ProviderSelection::Auto);
        }
        trimmed
            .parse::<Backend>()
            .map(ProviderSelection::Pinned)
            .map_err(|_| format!("unknown provider '{trimmed}'"))
    }
}

impl TryFrom<String> for ProviderSelection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProviderSelection> for String {
    fn from(value: ProviderSelection) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_backend_string_round_trip() {
        for backend in Backend::iter() {
            let parsed: Backend = backend.to_string().parse().unwrap();
            assert_eq!(parsed, backend);
        }
        assert_eq!(Backend::OpenAI.to_string(), "openai");
        assert_eq!("OpenAI".parse::<Backend>().unwrap(), Backend::OpenAI);
    }

    #[test]
    fn test_only_gemini_has_platform_fallback() {
        let with_fallback: Vec<Backend> = Backend::iter()
            .filter(|b| b.has_platform_fallback())
            .collect();
        assert_eq!(with_fallback, vec![Backend::DEFAULT]);
    }

    #[test]
    fn test_missing_credential_is_empty_platform() {
        let credential = ProviderCredential::missing();
        assert!(credential.is_empty());
        assert_eq!(credential.source, CredentialSource::Platform);
    }

    #[test]
    fn test_credential_debug_redacts_secret() {
        let credential = ProviderCredential::new("sk-very-secret", CredentialSource::User);
        let debug = format!("{credential:?}");
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_placeholder_usage_is_flagged() {
        let usage = TokenUsage::placeholder();
        assert!(usage.estimated);
        assert_eq!(usage.total_tokens, 300);
        assert!(!TokenUsage::exact(1, 2, 3).estimated);
    }

    #[test]
    fn test_provider_selection_parse_and_serde() {
        assert_eq!(
            "auto".parse::<ProviderSelection>().unwrap(),
            ProviderSelection::Auto
        );
        assert_eq!(
            " Perplexity ".parse::<ProviderSelection>().unwrap(),
            ProviderSelection::Pinned(Backend::Perplexity)
        );
        assert!("bard".parse::<ProviderSelection>().is_err());

        let json = serde_json::to_string(&ProviderSelection::Pinned(Backend::OpenAI)).unwrap();
        assert_eq!(json, "\"openai\"");
        let back: ProviderSelection = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(back, ProviderSelection::Auto);
    }
}
