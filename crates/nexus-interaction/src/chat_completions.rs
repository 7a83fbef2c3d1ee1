//! Wire types for OpenAI-compatible `chat/completions` endpoints.
//!
//! Shared by the OpenAI and Perplexity adapters.

use nexus_core::provider::{
    Backend, ChatRequest, CredentialSource, GatewayError, HistoryRole, NormalizedReply, TokenUsage,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object",
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// System message first, then history, then the current message.
pub(crate) fn build_messages(request: &ChatRequest) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    if !request.system_instruction.is_empty() {
        messages.push(WireMessage {
            role: "system",
            content: request.system_instruction.clone(),
        });
    }
    messages.extend(request.history.iter().map(|turn| WireMessage {
        role: match turn.role {
            HistoryRole::User => "user",
            HistoryRole::Model => "assistant",
        },
        content: turn.text.clone(),
    }));
    messages.push(WireMessage {
        role: "user",
        content: request.message.clone(),
    });
    messages
}

pub(crate) fn into_reply(
    backend: Backend,
    source: CredentialSource,
    response: ChatCompletionResponse,
) -> Result<NormalizedReply, GatewayError> {
    let text = response
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .ok_or_else(|| GatewayError::malformed(backend, "no choices in response"))?;

    let usage = match response.usage {
        Some(usage) => {
            let total = if usage.total_tokens == 0 {
                usage.prompt_tokens.saturating_add(usage.completion_tokens)
            } else {
                usage.total_tokens
            };
            TokenUsage::exact(usage.prompt_tokens, usage.completion_tokens, total)
        }
        None => {
            tracing::warn!(%backend, "Reply carried no usage block; recording placeholder usage");
            TokenUsage::placeholder()
        }
    };

    Ok(NormalizedReply {
        text,
        usage,
        backend,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::provider::{ChatOptions, ChatTurn, ProviderCredential};

    fn request() -> ChatRequest {
        ChatRequest {
            system_instruction: "Be brief.".into(),
            history: vec![ChatTurn::user("hi"), ChatTurn::model("hello")],
            message: "what now?".into(),
            options: ChatOptions::default(),
            credential: ProviderCredential::new("k", CredentialSource::User),
        }
    }

    #[test]
    fn test_build_messages_order_and_roles() {
        let roles: Vec<&str> = build_messages(&request()).iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    }

    #[test]
    fn test_into_reply_computes_missing_total() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "ok"}}], "usage": {"prompt_tokens": 3, "completion_tokens": 4}}"#,
        )
        .unwrap();
        let reply = into_reply(Backend::Perplexity, CredentialSource::User, response).unwrap();
        assert_eq!(reply.usage, TokenUsage::exact(3, 4, 7));
    }

    #[test]
    fn test_into_reply_without_choices_is_malformed() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = into_reply(Backend::OpenAI, CredentialSource::User, response).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse { .. }));
    }
}
