use async_trait::async_trait;

use super::{Backend, ChatRequest, GatewayError, NormalizedReply};

/// Capability interface implemented once per backend.
///
/// Adapters own request shaping (system-instruction placement, role
/// vocabulary, authentication) and squeeze the native reply into a
/// [`NormalizedReply`]. The gateway depends only on this trait.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Identity of the backend this adapter talks to.
    fn backend(&self) -> Backend;

    /// Whether `ChatOptions::use_search` has any effect.
    fn supports_search(&self) -> bool {
        false
    }

    async fn send(&self, request: ChatRequest) -> Result<NormalizedReply, GatewayError>;
}
