//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Transcript entries (`Interaction`, `Sender`)
//! - `model`: Exportable conversation snapshot (`Conversation`)
//! - `phase`: Turn state machine types (`TurnPhase`, `TurnOutcome`, `RejectReason`)

mod message;
mod model;
mod phase;

pub use message::{Interaction, Sender};
pub use model::Conversation;
pub use phase::{RejectReason, TurnOutcome, TurnPhase};
