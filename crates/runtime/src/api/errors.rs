//! Unified error types surfaced by the runtime API.
//!
//! Expected boundary failures (timeouts, transient server errors) travel as
//! [`crate::ServerResponse`] envelopes. The variants here cover what the
//! session reports to its caller: failures that survived the retry policy,
//! cancellation, misuse and worker plumbing.
use thiserror::Error;
use tokio::sync::oneshot;

use war_core::TableError;

use crate::phase::GamePhase;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("a round is already being resolved")]
    RoundInProgress,

    #[error("transition {from} -> {to} is not allowed")]
    InvalidTransition { from: GamePhase, to: GamePhase },

    #[error("{operation} is not available in phase {phase}")]
    UnexpectedPhase {
        operation: &'static str,
        phase: GamePhase,
    },

    #[error("no game has been started on the server")]
    NoActiveGame,

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("{operation} failed: {message}")]
    Server {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} reported success without data")]
    MissingResponseData { operation: &'static str },

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RuntimeError::Cancelled)
    }
}
