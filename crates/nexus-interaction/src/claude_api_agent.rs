//! ClaudeApiAgent - Anthropic Messages API adapter.

use async_trait::async_trait;
use nexus_core::provider::{
    Backend, ChatBackend, ChatRequest, GatewayError, HistoryRole, NormalizedReply, TokenUsage,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http::send_json;

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20240620";
const BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Clone, Debug)]
pub struct ClaudeApiAgent {
    client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeApiAgent {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            model: DEFAULT_CLAUDE_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_body(&self, request: &ChatRequest) -> CreateMessageRequest {
        let mut messages: Vec<Message> = request
            .history
            .iter()
            .map(|turn| Message {
                role: match turn.role {
                    HistoryRole::User => "user",
                    HistoryRole::Model => "assistant",
                },
                content: turn.text.clone(),
            })
            .collect();
        messages.push(Message {
            role: "user",
            content: request.message.clone(),
        });

        CreateMessageRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            system: Some(request.system_instruction.clone()).filter(|s| !s.is_empty()),
        }
    }
}

#[async_trait]
impl ChatBackend for ClaudeApiAgent {
    fn backend(&self) -> Backend {
        Backend::Anthropic
    }

    async fn send(&self, request: ChatRequest) -> Result<NormalizedReply, GatewayError> {
        let body = self.build_body(&request);

        let http = self
            .client
            .post(format!("{}{}", self.base_url, MESSAGES_PATH))
            .header("x-api-key", request.credential.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: CreateMessageResponse = send_json(Backend::Anthropic, http).await?;
        let text = extract_text_response(&response)?;

        let usage = match response.usage {
            Some(usage) => TokenUsage::exact(
                usage.input_tokens,
                usage.output_tokens,
                usage.input_tokens.saturating_add(usage.output_tokens),
            ),
            None => {
                tracing::warn!("Claude reply carried no usage block; recording placeholder usage");
                TokenUsage::placeholder()
            }
        };

        Ok(NormalizedReply {
            text,
            usage,
            backend: Backend::Anthropic,
            source: request.credential.source,
        })
    }
}

#[derive(Serialize)]
struct CreateMessageRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    #[serde(default)]
    content: Vec<ContentBlockResponse>,
    #[serde(default)]
    usage: Option<MessageUsage>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlockResponse {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct MessageUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

fn extract_text_response(response: &CreateMessageResponse) -> Result<String, GatewayError> {
    response
        .content
        .iter()
        .find_map(|block| match block {
            ContentBlockResponse::Text { text } => Some(text.clone()),
            ContentBlockResponse::Other => None,
        })
        .ok_or_else(|| {
            GatewayError::malformed(
                Backend::Anthropic,
                "Claude API returned no text in the response content",
            )
        })
}
