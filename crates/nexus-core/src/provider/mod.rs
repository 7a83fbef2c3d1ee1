//! Provider domain module.
//!
//! Backend identities, credential types, the canonical reply shape every
//! backend adapter normalizes into, and the [`ChatBackend`] capability trait.

mod backend;
mod error;
mod model;

pub use backend::ChatBackend;
pub use error::GatewayError;
pub use model::{
    Backend, ChatOptions, ChatRequest, ChatTurn, CredentialSource, HistoryRole, NormalizedReply,
    ProviderCredential, ProviderSelection, TokenUsage,
};
