use thiserror::Error;

use super::model::VoiceMode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("STT error: {0}")]
    Stt(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("Invalid voice transition: cannot {action} while {mode}")]
    InvalidTransition {
        mode: VoiceMode,
        action: &'static str,
    },

    /// The platform has no speech engine.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),
}
