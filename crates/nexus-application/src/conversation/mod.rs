//! Conversation Loop Controller.
//!
//! One controller per conversation. It owns the transcript, the active
//! persona, the provider selection and the subscription counters, and runs
//! turns through this pipeline:
//!
//! ```text
//! user text -> PersonaDispatcher -> router -> ProviderGateway -> transcript
//!                                                            -> usage ledger
//!                                                            -> VoiceController
//! ```

mod controller;

pub use controller::ConversationController;
