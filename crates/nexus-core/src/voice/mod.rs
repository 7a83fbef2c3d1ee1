//! Voice domain module.
//!
//! Speech engine seam, the events it emits, voice settings and errors.
//! The state machine driving these lives in `nexus-application`.

mod engine;
mod error;
mod model;

pub use engine::SpeechEngine;
pub use error::VoiceError;
pub use model::{RecognitionId, SpeechEvent, UtteranceId, Voice, VoiceMode, VoiceSettings};
