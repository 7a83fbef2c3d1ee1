use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use nexus_core::error::{NexusError, Result};
use nexus_core::persona::PersonaSlug;
use nexus_core::provider::{ChatOptions, ChatTurn, NormalizedReply, ProviderSelection};
use nexus_core::session::{Conversation, Interaction, RejectReason, TurnOutcome, TurnPhase};
use nexus_core::subscription::{SubscriptionUsage, UsageRepository};
use nexus_interaction::{PersonaDispatcher, ProviderGateway, router};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::voice_controller::{SharedVoice, lock_voice};

/// Substring that turns on search augmentation regardless of persona.
const SEARCH_TRIGGER: &str = "search";

#[derive(Debug)]
struct ConversationState {
    transcript: Vec<Interaction>,
    active_persona: PersonaSlug,
    selection: ProviderSelection,
    usage: SubscriptionUsage,
    phase: TurnPhase,
}

/// Drives one conversation: dispatch, routing, the gateway call, usage
/// accounting and optional speech, one turn at a time.
///
/// State sits behind a `std::sync::Mutex` that is never held across an
/// `.await`. A second submission while a turn is in flight is rejected
/// with [`RejectReason::Busy`] and leaves the transcript untouched.
pub struct ConversationController {
    id: String,
    started_at: DateTime<Utc>,
    state: Mutex<ConversationState>,
    gateway: Arc<ProviderGateway>,
    dispatcher: Arc<PersonaDispatcher>,
    usage_repository: Arc<dyn UsageRepository>,
    voice: Option<SharedVoice>,
}

impl ConversationController {
    pub fn new(
        gateway: Arc<ProviderGateway>,
        dispatcher: Arc<PersonaDispatcher>,
        usage_repository: Arc<dyn UsageRepository>,
        usage: SubscriptionUsage,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            state: Mutex::new(ConversationState {
                transcript: Vec::new(),
                active_persona: PersonaSlug::Orchestrator,
                selection: ProviderSelection::Auto,
                usage,
                phase: TurnPhase::Idle,
            }),
            gateway,
            dispatcher,
            usage_repository,
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: SharedVoice) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_provider_selection(self, selection: ProviderSelection) -> Self {
        self.set_provider_selection(selection);
        self
    }

    /// Seeds the transcript with an orchestrator greeting.
    pub fn with_greeting(self, greeting: impl Into<String>) -> Self {
        let interaction = Interaction::agent(&self.id, PersonaSlug::Orchestrator, greeting);
        self.state().transcript.push(interaction);
        self
    }

    /// Runs [`run_turn`](Self::run_turn) on the Tokio runtime.
    pub fn submit(self: &Arc<Self>, text: impl Into<String>) -> JoinHandle<TurnOutcome> {
        let controller = Arc::clone(self);
        let text = text.into();
        tokio::spawn(async move { controller.run_turn(&text).await })
    }

    /// Processes one user message to completion.
    ///
    /// Gateway failures become an orchestrator-owned notice in the transcript;
    /// they never escape as errors.
    pub async fn run_turn(&self, text: &str) -> TurnOutcome {
        let message = text.trim();
        if message.is_empty() {
            return TurnOutcome::Rejected(RejectReason::EmptyInput);
        }

        let (history, active) = {
            let mut state = self.state();
            if !state.phase.is_idle() {
                tracing::debug!(phase = %state.phase, "Turn already in flight; dropping submission");
                return TurnOutcome::Rejected(RejectReason::Busy);
            }
            let skip = state
                .transcript
                .len()
                .saturating_sub(self.gateway.history_window());
            let history: Vec<ChatTurn> = state.transcript[skip..]
                .iter()
                .map(Interaction::to_chat_turn)
                .collect();
            state.transcript.push(Interaction::user(&self.id, message));
            state.phase = TurnPhase::AwaitingPersona;
            (history, state.active_persona)
        };
        let _idle = IdleOnDrop(&self.state);

        if let Some(voice) = &self.voice {
            lock_voice(voice).clear_interim();
        }

        let persona = self.dispatcher.resolve(active, message).await.persona;
        let selection = {
            let mut state = self.state();
            state.active_persona = persona.slug;
            state.phase = TurnPhase::AwaitingProvider;
            state.selection
        };

        let backend = router::route(selection, message);
        let use_search = persona.slug == PersonaSlug::Research
            || message.to_lowercase().contains(SEARCH_TRIGGER);
        self.set_phase(TurnPhase::AwaitingReply);
        tracing::info!(
            conversation = %self.id,
            persona = %persona.slug,
            %backend,
            use_search,
            "Dispatching turn"
        );

        let options = ChatOptions::default().with_search(use_search);
        match self
            .gateway
            .chat(backend, &persona, message, &history, options)
            .await
        {
            Ok(reply) => {
                let interaction = self.record_reply(persona.slug, &reply).await;
                self.speak(&reply.text);
                TurnOutcome::Completed(interaction)
            }
            Err(err) => {
                let notice = Interaction::agent(
                    &self.id,
                    PersonaSlug::Orchestrator,
                    format!("Operational failure: {err}."),
                );
                self.state().transcript.push(notice.clone());
                self.resume_listening();
                TurnOutcome::Failed(notice)
            }
        }
    }

    async fn record_reply(&self, persona: PersonaSlug, reply: &NormalizedReply) -> Interaction {
        let interaction = Interaction::from_reply(&self.id, persona, reply);
        let usage = {
            let mut state = self.state();
            state.phase = TurnPhase::Accounting;
            state.transcript.push(interaction.clone());
            state.usage.record(reply.source, reply.usage.total_tokens);
            state.usage.clone()
        };

        if let Err(err) = self.usage_repository.save(&usage).await {
            tracing::error!(error = %err, "Failed to persist subscription usage");
        }
        interaction
    }

    fn speak(&self, text: &str) {
        let Some(voice) = &self.voice else {
            return;
        };
        if !lock_voice(voice).should_speak() {
            return;
        }
        self.set_phase(TurnPhase::Speaking);
        let spoken = lock_voice(voice).speak_reply(text);
        if let Err(err) = spoken {
            tracing::warn!(error = %err, "Could not speak reply");
            self.resume_listening();
        }
    }

    // Failure notices are not spoken, so nothing else would restart capture.
    fn resume_listening(&self) {
        let Some(voice) = &self.voice else {
            return;
        };
        if let Err(err) = lock_voice(voice).resume_capture() {
            tracing::warn!(error = %err, "Could not resume capture");
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transcript(&self) -> Vec<Interaction> {
        self.state().transcript.clone()
    }

    pub fn usage(&self) -> SubscriptionUsage {
        self.state().usage.clone()
    }

    pub fn phase(&self) -> TurnPhase {
        self.state().phase
    }

    pub fn active_persona(&self) -> PersonaSlug {
        self.state().active_persona
    }

    pub fn provider_selection(&self) -> ProviderSelection {
        self.state().selection
    }

    pub fn voice(&self) -> Option<&SharedVoice> {
        self.voice.as_ref()
    }

    /// Pins the persona for following turns. Pinning the orchestrator
    /// re-enables per-turn classification.
    pub fn set_active_persona(&self, slug: PersonaSlug) -> Result<()> {
        if !self.dispatcher.catalog().contains(slug) {
            return Err(NexusError::not_found("persona", slug.to_string()));
        }
        self.state().active_persona = slug;
        Ok(())
    }

    pub fn set_provider_selection(&self, selection: ProviderSelection) {
        self.state().selection = selection;
    }

    pub fn export_conversation(&self) -> Conversation {
        let state = self.state();
        Conversation {
            id: self.id.clone(),
            title: Conversation::title_from(&state.transcript),
            started_at: self.started_at,
            ended_at: None,
            provider: state.selection,
            interactions: state.transcript.clone(),
        }
    }

    fn set_phase(&self, phase: TurnPhase) {
        self.state().phase = phase;
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<ConversationState>) -> MutexGuard<'_, ConversationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the phase to Idle when a turn ends, including when its future is dropped.
struct IdleOnDrop<'a>(&'a Mutex<ConversationState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        lock_state(self.0).phase = TurnPhase::Idle;
    }
}
