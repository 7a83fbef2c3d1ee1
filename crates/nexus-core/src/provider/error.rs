use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Backend;

/// Failures surfaced by the provider gateway and its backend adapters.
///
/// None of these are retried inside the gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayError {
    /// No usable credential for the targeted backend. User-actionable.
    #[error(
        "API key for {backend} is missing. Add your own key in settings to unlock this provider"
    )]
    Authentication { backend: Backend },

    /// The backend rejected the request; `message` is the backend's own text.
    #[error("{message}")]
    Provider {
        backend: Backend,
        status: Option<u16>,
        message: String,
    },

    /// Network or transport failure before a reply could be read.
    #[error("{backend} request failed: {message}")]
    Transport { backend: Backend, message: String },

    /// A successful status whose body could not be mapped into a reply.
    #[error("{backend} returned an unreadable response: {message}")]
    MalformedResponse { backend: Backend, message: String },

    /// No adapter is registered for the backend.
    #[error("Provider {backend} not supported")]
    UnsupportedBackend { backend: Backend },
}

impl GatewayError {
    pub fn provider(backend: Backend, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            backend,
            status,
            message: message.into(),
        }
    }

    pub fn transport(backend: Backend, message: impl Into<String>) -> Self {
        Self::Transport {
            backend,
            message: message.into(),
        }
    }

    pub fn malformed(backend: Backend, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            backend,
            message: message.into(),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::Authentication { backend }
            | Self::Provider { backend, .. }
            | Self::Transport { backend, .. }
            | Self::MalformedResponse { backend, .. }
            | Self::UnsupportedBackend { backend } => *backend,
        }
    }

    /// Only transport failures are plausibly transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_is_verbatim() {
        let err = GatewayError::provider(Backend::OpenAI, Some(401), "Incorrect API key provided");
        assert_eq!(err.to_string(), "Incorrect API key provided");
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(GatewayError::transport(Backend::Anthropic, "timed out").is_retryable());
        assert!(!GatewayError::Authentication { backend: Backend::Anthropic }.is_retryable());
        assert!(!GatewayError::provider(Backend::Gemini, Some(500), "x").is_retryable());
    }

    #[test]
    fn test_backend_accessor() {
        let err = GatewayError::UnsupportedBackend {
            backend: Backend::Perplexity,
        };
        assert_eq!(err.backend(), Backend::Perplexity);
        assert_eq!(err.to_string(), "Provider perplexity not supported");
    }
}
