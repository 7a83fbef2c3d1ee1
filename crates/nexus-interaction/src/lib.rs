//! Backend adapters and the provider-facing orchestration pieces:
//! credential resolution, the gateway, provider routing and persona dispatch.

mod chat_completions;
pub mod claude_api_agent;
pub mod credential_resolver;
pub mod gateway;
pub mod gemini_api_agent;
pub mod http;
pub mod openai_api_agent;
pub mod perplexity_api_agent;
pub mod persona_dispatcher;
pub mod router;

pub use claude_api_agent::ClaudeApiAgent;
pub use credential_resolver::{CredentialResolver, PlatformCredentials};
pub use gateway::{ProviderGateway, ProviderGatewayBuilder};
pub use gemini_api_agent::GeminiApiAgent;
pub use openai_api_agent::OpenAiApiAgent;
pub use perplexity_api_agent::PerplexityApiAgent;
pub use persona_dispatcher::{
    ClassificationFallback, GatewayClassifier, PersonaClassifier, PersonaDispatcher,
    PersonaResolution,
};
pub use router::{route, select_provider};
