//! Console stand-in for a platform speech engine.

use colored::Colorize;
use nexus_core::voice::{
    RecognitionId, SpeechEngine, SpeechEvent, UtteranceId, Voice, VoiceError, VoiceSettings,
};
use tokio::sync::mpsc;

/// Prints utterances instead of synthesizing audio and completes them at once.
/// There is no microphone, so recognition is unavailable.
pub struct ConsoleSpeechEngine {
    events: mpsc::UnboundedSender<SpeechEvent>,
}

impl ConsoleSpeechEngine {
    pub fn new(events: mpsc::UnboundedSender<SpeechEvent>) -> Self {
        Self { events }
    }
}

impl SpeechEngine for ConsoleSpeechEngine {
    fn start_recognition(&self, _session: RecognitionId, _lang: &str) -> Result<(), VoiceError> {
        Err(VoiceError::Unavailable(
            "the console has no speech recognition".to_string(),
        ))
    }

    fn stop_recognition(&self) {}

    fn speak(
        &self,
        utterance: UtteranceId,
        text: &str,
        settings: &VoiceSettings,
    ) -> Result<(), VoiceError> {
        let voice = settings.voice_name.as_deref().unwrap_or("default voice");
        println!(
            "{}",
            format!(
                "🔊 ({voice}, rate {:.1}, pitch {:.1}) {text}",
                settings.effective_rate(),
                settings.effective_pitch()
            )
            .bright_black()
        );
        self.events
            .send(SpeechEvent::SpeechFinished { utterance })
            .map_err(|e| VoiceError::Tts(e.to_string()))
    }

    fn cancel_speech(&self) {}

    fn list_voices(&self) -> Vec<Voice> {
        vec![Voice {
            name: "console".to_string(),
            lang: "en-US".to_string(),
        }]
    }
}
