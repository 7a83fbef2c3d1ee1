//! Voice I/O Controller.
//!
//! A synchronous state machine over a [`SpeechEngine`]. Capturing and speaking
//! are mutually exclusive: entering one state always cancels the other first.
//!
//! Every recognition session and utterance gets a fresh id. Engine events
//! carrying an older id, or arriving in a mode that cannot produce them, are
//! dropped, so a cancelled session can never leak a transcript into a turn.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nexus_core::voice::{
    RecognitionId, SpeechEngine, SpeechEvent, UtteranceId, Voice, VoiceError, VoiceMode,
    VoiceSettings,
};

/// Voice controller shared between the conversation loop and the voice loop.
pub type SharedVoice = Arc<Mutex<VoiceController>>;

/// Locks a [`SharedVoice`], recovering the guard if a holder panicked.
pub fn lock_voice(voice: &SharedVoice) -> MutexGuard<'_, VoiceController> {
    voice.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct VoiceController {
    engine: Arc<dyn SpeechEngine>,
    settings: VoiceSettings,
    mode: VoiceMode,
    voice_mode_enabled: bool,
    interim: String,
    session: RecognitionId,
    utterance: UtteranceId,
}

impl VoiceController {
    pub fn new(engine: Arc<dyn SpeechEngine>, settings: VoiceSettings) -> Self {
        Self {
            engine,
            settings,
            mode: VoiceMode::Idle,
            voice_mode_enabled: false,
            interim: String::new(),
            session: RecognitionId::default(),
            utterance: UtteranceId::default(),
        }
    }

    pub fn into_shared(self) -> SharedVoice {
        Arc::new(Mutex::new(self))
    }

    pub fn mode(&self) -> VoiceMode {
        self.mode
    }

    pub fn is_voice_mode_enabled(&self) -> bool {
        self.voice_mode_enabled
    }

    /// Live recognition preview; the final transcript stays here until the
    /// next turn clears it.
    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn clear_interim(&mut self) {
        self.interim.clear();
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub fn current_session(&self) -> RecognitionId {
        self.session
    }

    pub fn current_utterance(&self) -> UtteranceId {
        self.utterance
    }

    pub fn list_voices(&self) -> Vec<Voice> {
        self.engine.list_voices()
    }

    /// Whether a completed reply should be read aloud.
    pub fn should_speak(&self) -> bool {
        self.voice_mode_enabled || self.settings.auto_speak
    }

    /// Idle -> Capturing. From Speaking, playback is cancelled first.
    pub fn start_capture(&mut self) -> Result<(), VoiceError> {
        match self.mode {
            VoiceMode::Capturing => {
                return Err(VoiceError::InvalidTransition {
                    mode: self.mode,
                    action: "start capture",
                });
            }
            VoiceMode::Speaking => self.cancel_speaking(),
            VoiceMode::Idle => {}
        }

        self.session = self.session.next();
        self.interim.clear();
        if let Err(err) = self.engine.start_recognition(self.session, &self.settings.lang) {
            self.mode = VoiceMode::Idle;
            return Err(err);
        }
        self.mode = VoiceMode::Capturing;
        tracing::debug!(session = self.session.0, "Capture started");
        Ok(())
    }

    /// Capturing -> Idle. No-op in any other mode.
    pub fn stop_capture(&mut self) {
        if self.mode == VoiceMode::Capturing {
            self.cancel_capturing();
            self.mode = VoiceMode::Idle;
        }
    }

    /// Flips hands-free mode and returns the new setting.
    ///
    /// Turning it off stops recognition and playback immediately.
    pub fn toggle_voice_mode(&mut self) -> Result<bool, VoiceError> {
        if self.voice_mode_enabled {
            self.voice_mode_enabled = false;
            self.cancel_capturing();
            self.cancel_speaking();
            self.mode = VoiceMode::Idle;
            self.interim.clear();
            tracing::info!("Voice mode off");
            return Ok(false);
        }

        self.voice_mode_enabled = true;
        if self.mode != VoiceMode::Capturing {
            if let Err(err) = self.start_capture() {
                self.voice_mode_enabled = false;
                return Err(err);
            }
        }
        tracing::info!("Voice mode on");
        Ok(true)
    }

    /// Listens again after a turn that left nothing to speak, so hands-free
    /// mode is never left on without a capture or playback in progress.
    /// Returns whether capture restarted; voice mode is switched off when it
    /// cannot.
    pub fn resume_capture(&mut self) -> Result<bool, VoiceError> {
        if !self.voice_mode_enabled || self.mode != VoiceMode::Idle {
            return Ok(false);
        }
        if let Err(err) = self.start_capture() {
            self.voice_mode_enabled = false;
            tracing::info!("Voice mode off: capture could not restart");
            return Err(err);
        }
        Ok(true)
    }

    /// Speaks `text` if voice mode or auto-speak is on. Returns whether
    /// playback was started. An active capture is cancelled first.
    pub fn speak_reply(&mut self, text: &str) -> Result<bool, VoiceError> {
        if !self.should_speak() {
            return Ok(false);
        }
        self.read_aloud(text)?;
        Ok(true)
    }

    /// Speaks `text` unconditionally, e.g. replaying a transcript entry on request.
    pub fn read_aloud(&mut self, text: &str) -> Result<(), VoiceError> {
        match self.mode {
            VoiceMode::Capturing => self.cancel_capturing(),
            VoiceMode::Speaking => self.cancel_speaking(),
            VoiceMode::Idle => {}
        }

        self.utterance = self.utterance.next();
        if let Err(err) = self.engine.speak(self.utterance, text, &self.settings) {
            self.mode = VoiceMode::Idle;
            return Err(err);
        }
        self.mode = VoiceMode::Speaking;
        tracing::debug!(utterance = self.utterance.0, "Speaking");
        Ok(())
    }

    /// Applies one engine event. Returns the final transcript when a capture
    /// completes with non-blank text.
    pub fn handle_event(&mut self, event: SpeechEvent) -> Option<String> {
        match event {
            SpeechEvent::Recognized {
                session,
                text,
                is_final,
            } => {
                if !self.is_live_session(session) {
                    tracing::debug!(session = session.0, "Dropping stale recognition result");
                    return None;
                }
                self.interim = text;
                if !is_final {
                    return None;
                }
                self.mode = VoiceMode::Idle;
                let transcript = self.interim.trim();
                if transcript.is_empty() {
                    self.end_voice_mode();
                    return None;
                }
                Some(transcript.to_string())
            }
            SpeechEvent::RecognitionEnded { session } => {
                if self.is_live_session(session) {
                    self.mode = VoiceMode::Idle;
                    self.end_voice_mode();
                }
                None
            }
            SpeechEvent::RecognitionFailed { session, message } => {
                if self.is_live_session(session) {
                    tracing::warn!(%message, "Speech recognition failed");
                    self.mode = VoiceMode::Idle;
                    self.end_voice_mode();
                }
                None
            }
            SpeechEvent::SpeechFinished { utterance } => {
                if utterance != self.utterance || self.mode != VoiceMode::Speaking {
                    tracing::debug!(utterance = utterance.0, "Dropping stale speech completion");
                    return None;
                }
                self.mode = VoiceMode::Idle;
                if let Err(err) = self.resume_capture() {
                    tracing::warn!(error = %err, "Could not resume capture after speaking");
                }
                None
            }
        }
    }

    // Capture ended without a transcript: hands-free mode stops with it.
    fn end_voice_mode(&mut self) {
        if self.voice_mode_enabled {
            self.voice_mode_enabled = false;
            tracing::info!("Voice mode off: capture ended without a transcript");
        }
    }

    fn is_live_session(&self, session: RecognitionId) -> bool {
        session == self.session && self.mode == VoiceMode::Capturing
    }

    // Retires the current session so its late events are ignored.
    fn cancel_capturing(&mut self) {
        self.engine.stop_recognition();
        self.session = self.session.next();
    }

    fn cancel_speaking(&mut self) {
        self.engine.cancel_speech();
        self.utterance = self.utterance.next();
    }
}
