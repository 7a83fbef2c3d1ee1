//! GeminiApiAgent - `generateContent` adapter for Google Gemini.
//!
//! The only backend with grounding via `google_search` and schema-constrained
//! JSON output, which the persona classifier relies on.

use async_trait::async_trait;
use nexus_core::provider::{
    Backend, ChatBackend, ChatRequest, GatewayError, HistoryRole, NormalizedReply, TokenUsage,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http::send_json;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";
const BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODELS_PATH: &str = "/v1beta/models";
const EMPTY_REPLY: &str = "No response generated.";

#[derive(Clone, Debug)]
pub struct GeminiApiAgent {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiApiAgent {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}/{}:generateContent",
            self.base_url, MODELS_PATH, self.model
        )
    }

    fn build_body(request: &ChatRequest) -> GenerateContentRequest {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| {
                Content::text(
                    Some(match turn.role {
                        HistoryRole::User => "user",
                        HistoryRole::Model => "model",
                    }),
                    &turn.text,
                )
            })
            .collect();
        contents.push(Content::text(Some("user"), &request.message));

        let system_instruction = Some(request.system_instruction.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| Content::text(None, s));

        let tools = request
            .options
            .use_search
            .then(|| vec![Tool::default()]);

        let generation_config =
            request
                .options
                .response_schema
                .as_ref()
                .map(|schema| GenerationConfig {
                    response_mime_type: "application/json",
                    response_schema: schema.clone(),
                });

        GenerateContentRequest {
            contents,
            system_instruction,
            tools,
            generation_config,
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiApiAgent {
    fn backend(&self) -> Backend {
        Backend::Gemini
    }

    fn supports_search(&self) -> bool {
        true
    }

    async fn send(&self, request: ChatRequest) -> Result<NormalizedReply, GatewayError> {
        let body = Self::build_body(&request);

        let http = self
            .client
            .post(self.endpoint())
            .query(&[("key", request.credential.expose())])
            .json(&body);

        let response: GenerateContentResponse = send_json(Backend::Gemini, http).await?;

        let usage = match &response.usage_metadata {
            Some(meta) => TokenUsage::exact(
                meta.prompt_token_count,
                meta.candidates_token_count,
                if meta.total_token_count == 0 {
                    meta.prompt_token_count
                        .saturating_add(meta.candidates_token_count)
                } else {
                    meta.total_token_count
                },
            ),
            None => {
                tracing::warn!("Gemini reply carried no usageMetadata; recording placeholder usage");
                TokenUsage::placeholder()
            }
        };

        Ok(NormalizedReply {
            text: extract_text_response(&response),
            usage,
            backend: Backend::Gemini,
            source: request.credential.source,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: &str) -> Self {
        Self {
            role,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Default)]
struct Tool {
    #[serde(rename = "google_search")]
    google_search: GoogleSearchConfig,
}

#[derive(Serialize, Default)]
struct GoogleSearchConfig {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

/// Concatenated text parts of the first candidate, or the empty-reply notice.
fn extract_text_response(response: &GenerateContentResponse) -> String {
    let text: String = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        text
    }
}
