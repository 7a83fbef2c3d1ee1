//! Hands-free loop: speech events in, conversation turns out.

use std::sync::Arc;

use nexus_core::voice::SpeechEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::conversation::ConversationController;
use crate::voice_controller::{SharedVoice, lock_voice};

/// Drains a speech engine's event channel.
///
/// Final transcripts are run as turns inline, so events arriving mid-turn
/// (typically the reply's `SpeechFinished`) queue until the turn completes.
pub struct VoiceLoop {
    voice: SharedVoice,
    conversation: Arc<ConversationController>,
    events: mpsc::UnboundedReceiver<SpeechEvent>,
}

impl VoiceLoop {
    pub fn new(
        voice: SharedVoice,
        conversation: Arc<ConversationController>,
        events: mpsc::UnboundedReceiver<SpeechEvent>,
    ) -> Self {
        Self {
            voice,
            conversation,
            events,
        }
    }

    /// Runs until every event sender is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            let transcript = lock_voice(&self.voice).handle_event(event);
            let Some(text) = transcript else {
                continue;
            };
            let outcome = self.conversation.run_turn(&text).await;
            if outcome.is_rejected() {
                tracing::debug!(?outcome, "Voice transcript not submitted");
                if let Err(err) = lock_voice(&self.voice).resume_capture() {
                    tracing::warn!(error = %err, "Could not resume capture");
                }
            }
        }
        tracing::debug!("Speech event channel closed");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
