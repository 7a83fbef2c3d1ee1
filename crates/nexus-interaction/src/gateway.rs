//! Provider Gateway.
//!
//! Resolves the credential, shapes a [`ChatRequest`] and hands it to the
//! registered [`ChatBackend`] for the target backend. Backend-specific
//! behaviour lives entirely in the adapters.

use std::collections::HashMap;
use std::sync::Arc;

use nexus_core::config::DEFAULT_HISTORY_WINDOW;
use nexus_core::error::{NexusError, Result};
use nexus_core::persona::Persona;
use nexus_core::provider::{
    Backend, ChatBackend, ChatOptions, ChatRequest, ChatTurn, GatewayError, NormalizedReply,
};
use tracing::Instrument;

use crate::credential_resolver::CredentialResolver;

pub struct ProviderGateway {
    backends: HashMap<Backend, Arc<dyn ChatBackend>>,
    resolver: CredentialResolver,
    history_window: usize,
}

impl ProviderGateway {
    pub fn builder() -> ProviderGatewayBuilder {
        ProviderGatewayBuilder::default()
    }

    /// Sends one request. Attempted exactly once; no retries.
    ///
    /// Only the last `history_window` entries of `history` are forwarded.
    pub async fn chat(
        &self,
        backend: Backend,
        persona: &Persona,
        message: &str,
        history: &[ChatTurn],
        mut options: ChatOptions,
    ) -> std::result::Result<NormalizedReply, GatewayError> {
        let adapter = self
            .backends
            .get(&backend)
            .ok_or(GatewayError::UnsupportedBackend { backend })?;

        let credential = self.resolver.resolve_for_call(backend)?;

        if options.use_search && !adapter.supports_search() {
            tracing::debug!(%backend, "Backend has no search augmentation; ignoring use_search");
            options.use_search = false;
        }

        let start = history.len().saturating_sub(self.history_window);
        let span = tracing::info_span!(
            "gateway.chat",
            backend = %backend,
            persona = %persona.slug,
            source = %credential.source,
            history = history.len() - start,
        );

        let request = ChatRequest {
            system_instruction: persona.system_instruction.clone(),
            history: history[start..].to_vec(),
            message: message.to_string(),
            options,
            credential,
        };

        async move {
            let result = adapter.send(request).await;
            match &result {
                Ok(reply) => tracing::info!(
                    total_tokens = reply.usage.total_tokens,
                    estimated = reply.usage.estimated,
                    "Reply received"
                ),
                Err(err) => tracing::warn!(error = %err, "Backend call failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    pub fn is_registered(&self, backend: Backend) -> bool {
        self.backends.contains_key(&backend)
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }
}

pub struct ProviderGatewayBuilder {
    backends: HashMap<Backend, Arc<dyn ChatBackend>>,
    resolver: Option<CredentialResolver>,
    history_window: usize,
}

impl Default for ProviderGatewayBuilder {
    fn default() -> Self {
        Self {
            backends: HashMap::new(),
            resolver: None,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl ProviderGatewayBuilder {
    /// Registers an adapter under the backend it reports. Replaces any earlier one.
    pub fn with_backend(mut self, adapter: Arc<dyn ChatBackend>) -> Self {
        self.backends.insert(adapter.backend(), adapter);
        self
    }

    pub fn with_resolver(mut self, resolver: CredentialResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn build(self) -> Result<ProviderGateway> {
        let resolver = self
            .resolver
            .ok_or_else(|| NexusError::config("provider gateway requires a credential resolver"))?;
        if self.backends.is_empty() {
            return Err(NexusError::config("provider gateway has no backends"));
        }
        Ok(ProviderGateway {
            backends: self.backends,
            resolver,
            history_window: self.history_window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential_resolver::PlatformCredentials;
    use async_trait::async_trait;
    use nexus_core::persona::{PersonaCatalog, PersonaSlug};
    use nexus_core::provider::{CredentialSource, TokenUsage};
    use nexus_core::secret::CredentialStore;
    use std::sync::Mutex;

    /// Returns the same key for every backend.
    struct FixedKeys(Option<&'static str>);

    impl CredentialStore for FixedKeys {
        fn get(&self, _backend: Backend) -> Option<String> {
            self.0.map(str::to_string)
        }
        fn set(&self, _backend: Backend, _secret: &str) -> Result<()> {
            Ok(())
        }
        fn remove(&self, _backend: Backend) -> Result<()> {
            Ok(())
        }
    }

    /// Records the last request it saw.
    struct RecordingBackend {
        backend: Backend,
        search: bool,
        seen: Mutex<Vec<(String, usize, bool, CredentialSource)>>,
    }

    impl RecordingBackend {
        fn new(backend: Backend, search: bool) -> Arc<Self> {
            Arc::new(Self {
                backend,
                search,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for RecordingBackend {
        fn backend(&self) -> Backend {
            self.backend
        }

        fn supports_search(&self) -> bool {
            self.search
        }

        async fn send(
            &self,
            request: ChatRequest,
        ) -> std::result::Result<NormalizedReply, GatewayError> {
            self.seen.lock().unwrap().push((
                request.system_instruction.clone(),
                request.history.len(),
                request.options.use_search,
                request.credential.source,
            ));
            Ok(NormalizedReply {
                text: "ok".into(),
                usage: TokenUsage::exact(1, 1, 2),
                backend: self.backend,
                source: request.credential.source,
            })
        }
    }

    fn resolver(platform: Option<&str>) -> CredentialResolver {
        CredentialResolver::new(
            Arc::new(FixedKeys(None)),
            PlatformCredentials::new(platform.map(str::to_string)),
        )
    }

    #[tokio::test]
    async fn test_chat_trims_history_and_uses_persona_instruction() {
        let gemini = RecordingBackend::new(Backend::Gemini, true);
        let gateway = ProviderGateway::builder()
            .with_backend(gemini.clone())
            .with_resolver(resolver(Some("platform-key")))
            .build()
            .unwrap();
        let catalog = PersonaCatalog::presets();
        let persona = catalog.get(PersonaSlug::Calendar).unwrap();
        let history: Vec<ChatTurn> = (0..8).map(|i| ChatTurn::user(format!("m{i}"))).collect();

        let reply = gateway
            .chat(
                Backend::Gemini,
                persona,
                "hi",
                &history,
                ChatOptions::default().with_search(true),
            )
            .await
            .unwrap();

        assert_eq!(reply.source, CredentialSource::Platform);
        let seen = gemini.seen.lock().unwrap();
        assert_eq!(seen[0].0, persona.system_instruction);
        assert_eq!(seen[0].1, 5);
        assert!(seen[0].2);
    }

    #[tokio::test]
    async fn test_search_flag_dropped_for_backends_without_search() {
        let openai = RecordingBackend::new(Backend::OpenAI, false);
        let gateway = ProviderGateway::builder()
            .with_backend(openai.clone())
            .with_resolver(CredentialResolver::new(
                Arc::new(FixedKeys(Some("sk-user-123456"))),
                PlatformCredentials::default(),
            ))
            .build()
            .unwrap();

        let reply = gateway
            .chat(
                Backend::OpenAI,
                PersonaCatalog::presets().orchestrator(),
                "hi",
                &[],
                ChatOptions::default().with_search(true),
            )
            .await
            .unwrap();

        assert_eq!(reply.source, CredentialSource::User);
        assert!(!openai.seen.lock().unwrap()[0].2);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_adapter() {
        let openai = RecordingBackend::new(Backend::OpenAI, false);
        let gateway = ProviderGateway::builder()
            .with_backend(openai.clone())
            .with_resolver(resolver(Some("platform-key")))
            .build()
            .unwrap();

        let err = gateway
            .chat(
                Backend::OpenAI,
                PersonaCatalog::presets().orchestrator(),
                "hi",
                &[],
                ChatOptions::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::Authentication { backend: Backend::OpenAI });
        assert!(openai.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_backend() {
        let gateway = ProviderGateway::builder()
            .with_backend(RecordingBackend::new(Backend::Gemini, true))
            .with_resolver(resolver(Some("platform-key")))
            .build()
            .unwrap();
        let err = gateway
            .chat(
                Backend::Perplexity,
                PersonaCatalog::presets().orchestrator(),
                "hi",
                &[],
                ChatOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::UnsupportedBackend {
                backend: Backend::Perplexity
            }
        );
    }

    #[test]
    fn test_builder_requires_resolver_and_backend() {
        assert!(ProviderGateway::builder().build().is_err());
        assert!(
            ProviderGateway::builder()
                .with_resolver(resolver(None))
                .build()
                .is_err()
        );
    }
}
