//! Application layer for Nexus.
//!
//! Coordinates the domain, infrastructure and interaction layers: the
//! conversation loop, the voice state machine, the hands-free loop that
//! connects them, and the service factory front ends start from.

pub mod conversation;
pub mod factory;
pub mod voice_controller;
pub mod voice_loop;

pub use conversation::ConversationController;
pub use factory::AppServices;
pub use voice_controller::{SharedVoice, VoiceController, lock_voice};
pub use voice_loop::VoiceLoop;
