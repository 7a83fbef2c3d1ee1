//! Hand-written doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nexus_application::ConversationController;
use nexus_core::config::DEFAULT_HISTORY_WINDOW;
use nexus_core::error::{NexusError, Result};
use nexus_core::persona::PersonaCatalog;
use nexus_core::provider::{
    Backend, ChatBackend, ChatRequest, GatewayError, NormalizedReply, TokenUsage,
};
use nexus_core::secret::CredentialStore;
use nexus_core::subscription::{SubscriptionUsage, Tier, UsageRepository};
use nexus_core::voice::{
    RecognitionId, SpeechEngine, SpeechEvent, UtteranceId, Voice, VoiceError, VoiceSettings,
};
use nexus_interaction::{
    CredentialResolver, PersonaClassifier, PersonaDispatcher, PlatformCredentials,
    ProviderGateway,
};
use tokio::sync::{Notify, mpsc};

pub const PLATFORM_KEY: &str = "platform-gemini-key";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct KeyStore {
    keys: Mutex<HashMap<Backend, String>>,
}

impl KeyStore {
    pub fn with(entries: &[(Backend, &str)]) -> Arc<Self> {
        let store = Self::default();
        for (backend, key) in entries {
            store.keys.lock().unwrap().insert(*backend, key.to_string());
        }
        Arc::new(store)
    }
}

impl CredentialStore for KeyStore {
    fn get(&self, backend: Backend) -> Option<String> {
        self.keys.lock().unwrap().get(&backend).cloned()
    }

    fn set(&self, backend: Backend, secret: &str) -> Result<()> {
        self.keys
            .lock()
            .unwrap()
            .insert(backend, secret.to_string());
        Ok(())
    }

    fn remove(&self, backend: Backend) -> Result<()> {
        self.keys.lock().unwrap().remove(&backend);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub message: String,
    pub history_len: usize,
    pub history: Vec<String>,
    pub use_search: bool,
    pub system_instruction: String,
}

/// Replies with fixed text and usage. Optionally waits on a gate first.
pub struct ScriptedBackend {
    backend: Backend,
    reply: std::result::Result<String, GatewayError>,
    usage: TokenUsage,
    gate: Option<Arc<Notify>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedBackend {
    pub fn replying(backend: Backend, text: &str) -> Arc<Self> {
        Arc::new(Self {
            backend,
            reply: Ok(text.to_string()),
            usage: TokenUsage::exact(10, 20, 30),
            gate: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(backend: Backend, err: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            backend,
            reply: Err(err),
            usage: TokenUsage::exact(0, 0, 0),
            gate: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Holds every call until `gate` is notified.
    pub fn gated(backend: Backend, text: &str, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            reply: Ok(text.to_string()),
            usage: TokenUsage::exact(10, 20, 30),
            gate: Some(gate),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn supports_search(&self) -> bool {
        true
    }

    async fn send(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<NormalizedReply, GatewayError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            message: request.message.clone(),
            history_len: request.history.len(),
            history: request.history.iter().map(|turn| turn.text.clone()).collect(),
            use_search: request.options.use_search,
            system_instruction: request.system_instruction.clone(),
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let text = self.reply.clone()?;
        Ok(NormalizedReply {
            text,
            usage: self.usage,
            backend: self.backend,
            source: request.credential.source,
        })
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub struct ScriptedClassifier {
    reply: std::result::Result<String, GatewayError>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn answering(slug: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(slug.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(err: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersonaClassifier for ScriptedClassifier {
    async fn classify(&self, _message: &str) -> std::result::Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryUsageRepository {
    saved: Mutex<Option<SubscriptionUsage>>,
    saves: AtomicUsize,
    fail: bool,
}

impl InMemoryUsageRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn saved(&self) -> Option<SubscriptionUsage> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn load(&self) -> Result<Option<SubscriptionUsage>> {
        Ok(self.saved())
    }

    async fn save(&self, usage: &SubscriptionUsage) -> Result<()> {
        if self.fail {
            return Err(NexusError::io("disk full"));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.saved.lock().unwrap() = Some(usage.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

#[derive(Default)]
struct EngineState {
    log: Vec<String>,
    recognizing: bool,
    speaking: bool,
    overlaps: usize,
}

/// Speech engine that answers recognition sessions from a phrase queue and,
/// when `auto_finish` is set, completes every utterance immediately.
pub struct ScriptedSpeechEngine {
    events: mpsc::UnboundedSender<SpeechEvent>,
    phrases: Mutex<VecDeque<String>>,
    auto_finish: bool,
    state: Mutex<EngineState>,
}

impl ScriptedSpeechEngine {
    pub fn new(
        events: mpsc::UnboundedSender<SpeechEvent>,
        phrases: &[&str],
        auto_finish: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            events,
            phrases: Mutex::new(phrases.iter().map(|p| p.to_string()).collect()),
            auto_finish,
            state: Mutex::new(EngineState::default()),
        })
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.log().iter().filter(|e| e.starts_with(prefix)).count()
    }

    /// Times recognition and playback were active together.
    pub fn overlaps(&self) -> usize {
        self.state.lock().unwrap().overlaps
    }

    pub fn is_recognizing(&self) -> bool {
        self.state.lock().unwrap().recognizing
    }

    pub fn is_speaking(&self) -> bool {
        self.state.lock().unwrap().speaking
    }
}

impl SpeechEngine for ScriptedSpeechEngine {
    fn start_recognition(
        &self,
        session: RecognitionId,
        _lang: &str,
    ) -> std::result::Result<(), VoiceError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("listen:{}", session.0));
        if state.speaking {
            state.overlaps += 1;
        }
        state.recognizing = true;

        if let Some(phrase) = self.phrases.lock().unwrap().pop_front() {
            let first_word = phrase.split_whitespace().next().unwrap_or_default().to_string();
            let _ = self.events.send(SpeechEvent::Recognized {
                session,
                text: first_word,
                is_final: false,
            });
            let _ = self.events.send(SpeechEvent::Recognized {
                session,
                text: phrase,
                is_final: true,
            });
            let _ = self.events.send(SpeechEvent::RecognitionEnded { session });
            state.recognizing = false;
        }
        Ok(())
    }

    fn stop_recognition(&self) {
        let mut state = self.state.lock().unwrap();
        state.log.push("stop".into());
        state.recognizing = false;
    }

    fn speak(
        &self,
        utterance: UtteranceId,
        text: &str,
        _settings: &VoiceSettings,
    ) -> std::result::Result<(), VoiceError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("speak:{text}"));
        if state.recognizing {
            state.overlaps += 1;
        }
        state.speaking = true;
        if self.auto_finish {
            let _ = self.events.send(SpeechEvent::SpeechFinished { utterance });
            state.speaking = false;
        }
        Ok(())
    }

    fn cancel_speech(&self) {
        let mut state = self.state.lock().unwrap();
        state.log.push("cancel".into());
        state.speaking = false;
    }

    fn list_voices(&self) -> Vec<Voice> {
        vec![Voice {
            name: "Test Voice".into(),
            lang: "en-US".into(),
        }]
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub fn gateway(
    backends: Vec<Arc<ScriptedBackend>>,
    keys: Arc<KeyStore>,
) -> Arc<ProviderGateway> {
    gateway_with_window(backends, keys, DEFAULT_HISTORY_WINDOW)
}

pub fn gateway_with_window(
    backends: Vec<Arc<ScriptedBackend>>,
    keys: Arc<KeyStore>,
    history_window: usize,
) -> Arc<ProviderGateway> {
    let resolver = CredentialResolver::new(
        keys,
        PlatformCredentials::new(Some(PLATFORM_KEY.to_string())),
    );
    let mut builder = ProviderGateway::builder()
        .with_resolver(resolver)
        .with_history_window(history_window);
    for backend in backends {
        builder = builder.with_backend(backend);
    }
    Arc::new(builder.build().expect("gateway"))
}

pub fn dispatcher(classifier: Arc<ScriptedClassifier>) -> Arc<PersonaDispatcher> {
    Arc::new(PersonaDispatcher::new(
        Arc::new(PersonaCatalog::presets()),
        classifier,
    ))
}

pub fn controller(
    gateway: Arc<ProviderGateway>,
    dispatcher: Arc<PersonaDispatcher>,
    usage_repository: Arc<InMemoryUsageRepository>,
) -> ConversationController {
    ConversationController::new(
        gateway,
        dispatcher,
        usage_repository,
        SubscriptionUsage::new(Tier::Free),
    )
}

/// Polls `condition` every few milliseconds for up to two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..400 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
