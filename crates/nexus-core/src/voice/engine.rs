use super::error::VoiceError;
use super::model::{RecognitionId, UtteranceId, Voice, VoiceSettings};

/// Platform speech engine.
///
/// Calls return once the request is issued. Results arrive later as
/// [`SpeechEvent`](super::SpeechEvent)s on the channel the engine was built
/// with, tagged with the session or utterance id passed here.
pub trait SpeechEngine: Send + Sync {
    /// Begins one recognition session (non-continuous, interim results on).
    fn start_recognition(&self, session: RecognitionId, lang: &str) -> Result<(), VoiceError>;

    fn stop_recognition(&self);

    fn speak(
        &self,
        utterance: UtteranceId,
        text: &str,
        settings: &VoiceSettings,
    ) -> Result<(), VoiceError>;

    fn cancel_speech(&self);

    fn list_voices(&self) -> Vec<Voice>;
}
