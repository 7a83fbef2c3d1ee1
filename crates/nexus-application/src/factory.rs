//! Service wiring.
//!
//! Builds every long-lived service from the on-disk configuration once, so
//! front ends only deal with [`AppServices`].

use std::sync::Arc;
use std::time::Duration;

use nexus_core::config::AppConfig;
use nexus_core::error::{NexusError, Result};
use nexus_core::persona::PersonaCatalog;
use nexus_core::provider::{Backend, ChatBackend};
use nexus_core::subscription::{SubscriptionUsage, UsageRepository};
use nexus_core::task::TaskStore;
use nexus_core::user::{IdentityProvider, StaticIdentityProvider};
use nexus_infrastructure::storage::ConfigStorage;
use nexus_infrastructure::{FileCredentialStore, LocalTaskStore, NexusPaths, TomlUsageRepository};
use nexus_interaction::http::build_client;
use nexus_interaction::{
    ClaudeApiAgent, CredentialResolver, GatewayClassifier, GeminiApiAgent, OpenAiApiAgent,
    PerplexityApiAgent, PersonaDispatcher, PlatformCredentials, ProviderGateway,
};

use crate::conversation::ConversationController;
use crate::voice_controller::SharedVoice;

/// Name used in the greeting when no user is configured.
const ANONYMOUS_NAME: &str = "there";

pub struct AppServices {
    pub paths: NexusPaths,
    pub config: AppConfig,
    pub catalog: Arc<PersonaCatalog>,
    pub credentials: FileCredentialStore,
    pub gateway: Arc<ProviderGateway>,
    pub dispatcher: Arc<PersonaDispatcher>,
    pub usage_repository: Arc<dyn UsageRepository>,
    pub task_store: Arc<dyn TaskStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppServices {
    /// Loads configuration and secrets from `paths` and the platform
    /// credential from the environment.
    pub fn load(paths: NexusPaths) -> Result<Self> {
        let config = ConfigStorage::new(paths.config_file()).load()?;
        let credentials = FileCredentialStore::open(paths.secret_file())?;
        Self::assemble(paths, config, credentials, PlatformCredentials::from_env())
    }

    /// Wires services from already-loaded parts.
    pub fn assemble(
        paths: NexusPaths,
        config: AppConfig,
        credentials: FileCredentialStore,
        platform: PlatformCredentials,
    ) -> Result<Self> {
        let catalog = Arc::new(PersonaCatalog::with_overrides(&config.personas)?);

        let client = build_client(Duration::from_secs(config.http.timeout_secs))
            .map_err(|e| NexusError::config(format!("HTTP client: {e}")))?;
        let model = |backend: Backend| {
            credentials
                .model_override(backend)
                .unwrap_or_else(|| config.models.model_for(backend).to_string())
        };
        let adapters: [Arc<dyn ChatBackend>; 4] = [
            Arc::new(GeminiApiAgent::new(client.clone()).with_model(model(Backend::Gemini))),
            Arc::new(OpenAiApiAgent::new(client.clone()).with_model(model(Backend::OpenAI))),
            Arc::new(ClaudeApiAgent::new(client.clone()).with_model(model(Backend::Anthropic))),
            Arc::new(PerplexityApiAgent::new(client).with_model(model(Backend::Perplexity))),
        ];

        if !platform.is_provisioned(Backend::DEFAULT) {
            tracing::info!("No platform credential provisioned; only user keys will work");
        }
        let resolver = CredentialResolver::new(Arc::new(credentials.clone()), platform);
        let gateway = adapters
            .into_iter()
            .fold(ProviderGateway::builder(), |builder, adapter| {
                builder.with_backend(adapter)
            })
            .with_resolver(resolver)
            .with_history_window(config.chat.history_window)
            .build()?;
        let gateway = Arc::new(gateway);

        let classifier = GatewayClassifier::new(
            gateway.clone(),
            catalog.clone(),
            config.models.classifier_backend,
        );
        let dispatcher = Arc::new(PersonaDispatcher::new(catalog.clone(), Arc::new(classifier)));

        let usage_repository = Arc::new(TomlUsageRepository::new(paths.usage_file()));
        let task_store = Arc::new(LocalTaskStore::new(paths.tasks_file()));
        let identity = Arc::new(StaticIdentityProvider::new(config.user.clone()));

        tracing::debug!(
            config_dir = %paths.config_dir().display(),
            personas = catalog.len(),
            "Services assembled"
        );

        Ok(Self {
            paths,
            config,
            catalog,
            credentials,
            gateway,
            dispatcher,
            usage_repository,
            task_store,
            identity,
        })
    }

    /// Persisted usage, or a fresh ledger at the configured tier.
    pub async fn load_usage(&self) -> Result<SubscriptionUsage> {
        let tier = self.config.subscription.tier;
        let mut usage = self
            .usage_repository
            .load()
            .await?
            .unwrap_or_else(|| SubscriptionUsage::new(tier));
        usage.set_tier(tier);
        Ok(usage)
    }

    /// Starts a conversation with the configured provider selection and greeting.
    pub async fn conversation(&self, voice: Option<SharedVoice>) -> Result<ConversationController> {
        let usage = self.load_usage().await?;
        let mut controller = ConversationController::new(
            self.gateway.clone(),
            self.dispatcher.clone(),
            self.usage_repository.clone(),
            usage,
        )
        .with_provider_selection(self.config.chat.provider);

        let user = self.identity.current_user().await;
        let name = user.as_ref().map_or(ANONYMOUS_NAME, |u| u.first_name());
        if let Some(greeting) = self.config.chat.render_greeting(name) {
            controller = controller.with_greeting(greeting);
        }
        if let Some(voice) = voice {
            controller = controller.with_voice(voice);
        }
        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::persona::{PersonaOverride, PersonaSlug};
    use nexus_core::provider::{CredentialSource, ProviderSelection};
    use nexus_core::subscription::Tier;
    use nexus_core::user::{StorageProvider, User};
    use tempfile::TempDir;

    fn assemble(dir: &TempDir, config: AppConfig, platform: Option<&str>) -> AppServices {
        let paths = NexusPaths::new(Some(dir.path())).unwrap();
        let credentials = FileCredentialStore::open(paths.secret_file()).unwrap();
        AppServices::assemble(
            paths,
            config,
            credentials,
            PlatformCredentials::new(platform.map(str::to_string)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_defaults_greet_anonymous_user() {
        let dir = TempDir::new().unwrap();
        let services = assemble(&dir, AppConfig::default(), None);

        let conversation = services.conversation(None).await.unwrap();
        let transcript = conversation.transcript();

        assert_eq!(transcript.len(), 1);
        assert_eq!(
            transcript[0].content,
            "Hello there, I am Nexus. How can I assist your operations today?"
        );
        assert_eq!(transcript[0].persona, Some(PersonaSlug::Orchestrator));
        assert_eq!(conversation.provider_selection(), ProviderSelection::Auto);
        for backend in [
            Backend::Gemini,
            Backend::OpenAI,
            Backend::Anthropic,
            Backend::Perplexity,
        ] {
            assert!(services.gateway.is_registered(backend));
        }
    }

    #[tokio::test]
    async fn test_config_drives_greeting_tier_and_personas() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.user = Some(User {
            id: "u1".into(),
            email: "ada@example.com".into(),
            display_name: "Ada Lovelace".into(),
            primary_data_store: StorageProvider::Notion,
            task_storage_provider: StorageProvider::Local,
            data_store_root_ref: None,
        });
        config.subscription.tier = Tier::Pro;
        config.chat.provider = ProviderSelection::Pinned(Backend::Anthropic);
        config.personas = vec![PersonaOverride {
            slug: PersonaSlug::Tasks,
            name: Some("Chief of Staff".into()),
            ..Default::default()
        }];
        let services = assemble(&dir, config, Some("platform-key"));

        let conversation = services.conversation(None).await.unwrap();

        assert!(conversation.transcript()[0].content.starts_with("Hello Ada,"));
        assert_eq!(
            conversation.provider_selection(),
            ProviderSelection::Pinned(Backend::Anthropic)
        );
        assert_eq!(conversation.usage().tier, Tier::Pro);
        assert_eq!(conversation.usage().token_limit, 50_000);
        assert_eq!(
            services.catalog.get(PersonaSlug::Tasks).unwrap().name,
            "Chief of Staff"
        );
        let credential = services.gateway.resolver().resolve(Backend::Gemini);
        assert_eq!(credential.source, CredentialSource::Platform);
    }

    #[tokio::test]
    async fn test_empty_greeting_leaves_transcript_empty() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.chat.greeting = String::new();
        let services = assemble(&dir, config, None);

        let conversation = services.conversation(None).await.unwrap();

        assert!(conversation.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_persisted_usage_is_restored_at_configured_tier() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.subscription.tier = Tier::Business;
        let services = assemble(&dir, config, None);

        let mut saved = SubscriptionUsage::new(Tier::Free);
        saved.record(CredentialSource::Platform, 1_200);
        services.usage_repository.save(&saved).await.unwrap();

        let usage = services.load_usage().await.unwrap();
        assert_eq!(usage.tokens_used, 1_200);
        assert_eq!(usage.tier, Tier::Business);
        assert_eq!(usage.token_limit, 200_000);
    }
}
