//! PerplexityApiAgent - search-augmented, OpenAI-compatible `chat/completions`.
//!
//! Every Perplexity model browses, so `use_search` has nothing to toggle.

use async_trait::async_trait;
use nexus_core::provider::{Backend, ChatBackend, ChatRequest, GatewayError, NormalizedReply};
use reqwest::Client;

use crate::chat_completions::{self, ChatCompletionRequest, ChatCompletionResponse};
use crate::http::send_json;

pub const DEFAULT_PERPLEXITY_MODEL: &str = "llama-3.1-sonar-large-128k-online";
const BASE_URL: &str = "https://api.perplexity.ai";
const COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Clone, Debug)]
pub struct PerplexityApiAgent {
    client: Client,
    base_url: String,
    model: String,
}

impl PerplexityApiAgent {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            model: DEFAULT_PERPLEXITY_MODEL.to_string(),
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
}

#[async_trait]
impl ChatBackend for PerplexityApiAgent {
    fn backend(&self) -> Backend {
        Backend::Perplexity
    }

    fn supports_search(&self) -> bool {
        true
    }

    async fn send(&self, request: ChatRequest) -> Result<NormalizedReply, GatewayError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: chat_completions::build_messages(&request),
            response_format: None,
        };

        let http = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .bearer_auth(request.credential.expose())
            .json(&body);

        let response: ChatCompletionResponse = send_json(Backend::Perplexity, http).await?;
        chat_completions::into_reply(Backend::Perplexity, request.credential.source, response)
    }
}
