//! Persona Dispatcher.
//!
//! When the orchestrator persona is active, asks a backend which specialized
//! persona should answer. Any classification problem resolves to the
//! orchestrator; a turn never fails here.

use std::sync::Arc;

use async_trait::async_trait;
use nexus_core::persona::{Persona, PersonaCatalog, PersonaSlug};
use nexus_core::provider::{Backend, ChatOptions, GatewayError};
use serde::Deserialize;
use serde_json::json;

use crate::gateway::ProviderGateway;

/// Classifies a message into raw slug text.
#[async_trait]
pub trait PersonaClassifier: Send + Sync {
    async fn classify(&self, message: &str) -> Result<String, GatewayError>;
}

/// Why classification resolved to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationFallback {
    CallFailed(GatewayError),
    /// Returned text is not a known slug.
    UnknownSlug(String),
    /// Known slug with no persona in the catalog.
    NoPreset(PersonaSlug),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaResolution {
    pub persona: Persona,
    pub fallback: Option<ClassificationFallback>,
}

pub struct PersonaDispatcher {
    catalog: Arc<PersonaCatalog>,
    classifier: Arc<dyn PersonaClassifier>,
}

impl PersonaDispatcher {
    pub fn new(catalog: Arc<PersonaCatalog>, classifier: Arc<dyn PersonaClassifier>) -> Self {
        Self {
            catalog,
            classifier,
        }
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    /// A specialized `active` persona is kept as is. The orchestrator
    /// triggers one classification call.
    pub async fn resolve(&self, active: PersonaSlug, message: &str) -> PersonaResolution {
        if !active.is_orchestrator() {
            if let Some(persona) = self.catalog.get(active) {
                return PersonaResolution {
                    persona: persona.clone(),
                    fallback: None,
                };
            }
            // Active slug without a catalog entry; classify instead.
            tracing::debug!(%active, "Active persona has no catalog entry");
        }

        let outcome = match self.classifier.classify(message).await {
            Ok(raw) => match PersonaSlug::parse_loose(&raw) {
                Some(slug) => match self.catalog.get(slug) {
                    Some(persona) => Ok(persona.clone()),
                    None => Err(ClassificationFallback::NoPreset(slug)),
                },
                None => Err(ClassificationFallback::UnknownSlug(raw)),
            },
            Err(err) => Err(ClassificationFallback::CallFailed(err)),
        };

        match outcome {
            Ok(persona) => {
                tracing::debug!(persona = %persona.slug, "Classified message");
                PersonaResolution {
                    persona,
                    fallback: None,
                }
            }
            Err(fallback) => {
                tracing::warn!(?fallback, "Persona classification fell back to orchestrator");
                PersonaResolution {
                    persona: self.catalog.orchestrator().clone(),
                    fallback: Some(fallback),
                }
            }
        }
    }
}

/// Classifies through the gateway with a constrained-output request.
///
/// Classification tokens are not counted against subscription usage.
pub struct GatewayClassifier {
    gateway: Arc<ProviderGateway>,
    catalog: Arc<PersonaCatalog>,
    backend: Backend,
}

#[derive(Deserialize)]
struct SlugReply {
    slug: String,
}

impl GatewayClassifier {
    pub fn new(gateway: Arc<ProviderGateway>, catalog: Arc<PersonaCatalog>, backend: Backend) -> Self {
        Self {
            gateway,
            catalog,
            backend,
        }
    }

    fn prompt(message: &str) -> String {
        format!(
            "Determine the best agent for this request: \"{message}\". \
             Available: executive, tasks, calendar, email, research, automation. \
             Respond ONLY with JSON of the form {{\"slug\": \"<agent>\"}}."
        )
    }

    fn schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "slug": {
                    "type": "STRING",
                    "enum": ["executive", "tasks", "calendar", "email", "research", "automation"],
                }
            },
            "required": ["slug"],
        })
    }
}

/// Pulls the slug out of a classification reply: `{"slug": ...}` JSON
/// (optionally fenced), or the bare text.
pub fn extract_slug(reply: &str) -> String {
    let trimmed = reply.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    match serde_json::from_str::<SlugReply>(unfenced) {
        Ok(parsed) => parsed.slug,
        Err(_) => unfenced.to_string(),
    }
}

#[async_trait]
impl PersonaClassifier for GatewayClassifier {
    async fn classify(&self, message: &str) -> Result<String, GatewayError> {
        let options = ChatOptions::default().with_response_schema(Self::schema());
        let reply = self
            .gateway
            .chat(
                self.backend,
                self.catalog.orchestrator(),
                &Self::prompt(message),
                &[],
                options,
            )
            .await?;
        Ok(extract_slug(&reply.text))
    }
}
