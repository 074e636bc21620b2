//! Event types for different topics.

use serde::{Deserialize, Serialize};
use war_core::RoundResult;

use crate::phase::GamePhase;

/// Phase machine notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// Published after exit and enter hooks have run.
    Changed {
        new: GamePhase,
        previous: GamePhase,
    },
}

/// Round lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A tie escalated into War. Published once per escalation level,
    /// starting at depth 1.
    WarStarted { depth: u32 },

    /// The round is fully resolved and the phase already reflects it.
    Completed(RoundResult),

    /// Follows [`RoundEvent::Completed`] for rounds that went to War.
    WarCompleted {
        depth: u32,
        cards_won: usize,
    },
}

/// Boundary failures that survived the retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEvent {
    pub operation: String,
    pub message: String,
}
