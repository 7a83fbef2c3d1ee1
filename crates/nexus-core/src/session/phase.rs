//! Turn state machine types.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::message::Interaction;

/// Where the conversation loop is within a turn.
///
/// `Idle -> AwaitingPersona -> AwaitingProvider -> AwaitingReply -> Accounting -> (Speaking) -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum TurnPhase {
    #[default]
    Idle,
    AwaitingPersona,
    AwaitingProvider,
    AwaitingReply,
    Accounting,
    Speaking,
}

impl TurnPhase {
    pub fn is_idle(self) -> bool {
        self == TurnPhase::Idle
    }
}

/// Why a submission was dropped without touching the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RejectReason {
    /// A turn is already in flight.
    Busy,
    EmptyInput,
}

/// Result of one `run_turn` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The agent reply that was appended.
    Completed(Interaction),
    /// The failure notice that was appended.
    Failed(Interaction),
    Rejected(RejectReason),
}

impl TurnOutcome {
    pub fn interaction(&self) -> Option<&Interaction> {
        match self {
            TurnOutcome::Completed(i) | TurnOutcome::Failed(i) => Some(i),
            TurnOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, TurnOutcome::Rejected(_))
    }
}
