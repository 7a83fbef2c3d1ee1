use serde::{Deserialize, Serialize};
use strum::Display;

/// Voice I/O state. Capturing and speaking are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum VoiceMode {
    #[default]
    Idle,
    Capturing,
    Speaking,
}

/// Identifies one recognition session; events from older sessions are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RecognitionId(pub u64);

/// Identifies one speech utterance; completions of older utterances are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UtteranceId(pub u64);

impl RecognitionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl UtteranceId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Callback results from a speech engine, delivered as values.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Recognized {
        session: RecognitionId,
        text: String,
        is_final: bool,
    },
    RecognitionEnded {
        session: RecognitionId,
    },
    RecognitionFailed {
        session: RecognitionId,
        message: String,
    },
    SpeechFinished {
        utterance: UtteranceId,
    },
}

/// A synthesis voice offered by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

/// `[voice]` settings from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Speak replies even when voice mode is off.
    pub auto_speak: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    /// Recognition language tag.
    pub lang: String,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            auto_speak: false,
            voice_name: None,
            rate: 1.0,
            pitch: 1.0,
            lang: "en-US".to_string(),
        }
    }
}

impl VoiceSettings {
    /// Playback rate; an unset (zero or invalid) rate means 1.0.
    pub fn effective_rate(&self) -> f32 {
        positive_or_one(self.rate)
    }

    pub fn effective_pitch(&self) -> f32 {
        positive_or_one(self.pitch)
    }
}

fn positive_or_one(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_and_pitch_fall_back() {
        let settings = VoiceSettings {
            rate: 0.0,
            pitch: 0.0,
            ..Default::default()
        };
        assert_eq!(settings.effective_rate(), 1.0);
        assert_eq!(settings.effective_pitch(), 1.0);

        let fast = VoiceSettings {
            rate: 1.5,
            ..Default::default()
        };
        assert_eq!(fast.effective_rate(), 1.5);
    }

    #[test]
    fn test_settings_partial_toml() {
        let settings: VoiceSettings = toml::from_str("auto_speak = true").unwrap();
        assert!(settings.auto_speak);
        assert_eq!(settings.lang, "en-US");
        assert_eq!(settings.rate, 1.0);
    }

    #[test]
    fn test_ids_advance() {
        assert_eq!(RecognitionId(1).next(), RecognitionId(2));
        assert_eq!(UtteranceId(u64::MAX).next(), UtteranceId(0));
    }
}
