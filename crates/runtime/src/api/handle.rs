//! Cloneable façade for issuing commands to a session.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for the
//! game triggers (start, round, pause, resume, return to menu) plus phase and
//! event access.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use war_core::{GameState, RoundResult};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::phase::GamePhase;
use crate::workers::Command;

/// Client-facing handle to interact with a session
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    phase_rx: watch::Receiver<GamePhase>,
    cancel: CancellationToken,
    round_in_flight: Arc<AtomicBool>,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        phase_rx: watch::Receiver<GamePhase>,
        cancel: CancellationToken,
        round_in_flight: Arc<AtomicBool>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            phase_rx,
            cancel,
            round_in_flight,
        }
    }

    /// Deal a new game. Valid from Idle; resolves once the session is Playing
    /// or has fallen back to Idle.
    pub async fn start_game(&self) -> Result<GameState> {
        self.request(|reply| Command::StartGame { reply }).await
    }

    /// Resolve the next round.
    ///
    /// Only one round may be in flight across all clones of the handle; a
    /// second request while one is being resolved fails immediately with
    /// [`RuntimeError::RoundInProgress`].
    pub async fn request_round(&self) -> Result<RoundResult> {
        if self
            .round_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RuntimeError::RoundInProgress);
        }

        let mut guard = InFlightGuard {
            flag: &self.round_in_flight,
            armed: true,
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::RequestRound { reply: reply_tx }).await?;
        // The worker clears the flag once the command is accepted.
        guard.armed = false;

        self.receive(reply_rx).await?
    }

    pub async fn pause(&self) -> Result<()> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.request(|reply| Command::Resume { reply }).await
    }

    /// Leave a finished game and go back to Idle.
    pub async fn return_to_menu(&self) -> Result<()> {
        self.request(|reply| Command::ReturnToMenu { reply }).await
    }

    /// Server-side snapshot of the current game.
    pub async fn game_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Current phase, without a round trip to the worker.
    pub fn phase(&self) -> GamePhase {
        *self.phase_rx.borrow()
    }

    pub fn is_round_in_flight(&self) -> bool {
        self.round_in_flight.load(Ordering::Acquire)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Phase` - Phase transitions
    /// - `Topic::Round` - Round results, War start and completion
    /// - `Topic::Server` - Failures that survived the retry policy
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Cancel the session: in-flight latency, backoff and settle waits end
    /// immediately with [`RuntimeError::Cancelled`] and the worker stops.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(command(reply_tx)).await?;
        self.receive(reply_rx).await?
    }

    async fn send(&self, command: Command) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(RuntimeError::Cancelled);
        }
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn receive<T>(&self, reply_rx: oneshot::Receiver<T>) -> Result<T> {
        reply_rx.await.map_err(|error| {
            if self.cancel.is_cancelled() {
                RuntimeError::Cancelled
            } else {
                RuntimeError::ReplyChannelClosed(error)
            }
        })
    }
}

/// Clears the in-flight flag if a round request is abandoned before the
/// worker accepted it.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(false, Ordering::Release);
        }
    }
}
