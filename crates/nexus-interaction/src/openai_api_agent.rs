//! OpenAiApiAgent - `chat/completions` adapter for OpenAI.

use async_trait::async_trait;
use nexus_core::provider::{Backend, ChatBackend, ChatRequest, GatewayError, NormalizedReply};
use reqwest::Client;

use crate::chat_completions::{self, ChatCompletionRequest, ChatCompletionResponse, ResponseFormat};
use crate::http::send_json;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Clone, Debug)]
pub struct OpenAiApiAgent {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenAiApiAgent {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the agent at another host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for OpenAiApiAgent {
    fn backend(&self) -> Backend {
        Backend::OpenAI
    }

    async fn send(&self, request: ChatRequest) -> Result<NormalizedReply, GatewayError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: chat_completions::build_messages(&request),
            response_format: request
                .options
                .response_schema
                .as_ref()
                .map(|_| ResponseFormat::json_object()),
        };

        let http = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .bearer_auth(request.credential.expose())
            .json(&body);

        let response: ChatCompletionResponse = send_json(Backend::OpenAI, http).await?;
        chat_completions::into_reply(Backend::OpenAI, request.credential.source, response)
    }
}
