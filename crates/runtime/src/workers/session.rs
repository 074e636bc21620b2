//! Session worker that owns the [`PhaseMachine`].
//!
//! Receives commands from [`crate::SessionHandle`], drives the game server
//! through the [`RetryController`] and publishes phase, round and server events
//! to the [`EventBus`]. Commands are processed one at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use war_core::{GameState, RoundResult};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, RoundEvent, ServerEvent};
use crate::phase::{GamePhase, PhaseMachine};
use crate::retry::RetryController;
use crate::server::{GameServer, ServerResponse};

/// Commands that can be sent to the session worker
pub enum Command {
    /// Deal a new game: Idle → Initializing → Playing.
    StartGame {
        reply: oneshot::Sender<Result<GameState>>,
    },
    /// Resolve one round. Only valid while Playing.
    RequestRound {
        reply: oneshot::Sender<Result<RoundResult>>,
    },
    Pause {
        reply: oneshot::Sender<Result<()>>,
    },
    Resume {
        reply: oneshot::Sender<Result<()>>,
    },
    /// Leave a finished game: GameOver → Idle.
    ReturnToMenu {
        reply: oneshot::Sender<Result<()>>,
    },
    /// Fetch the server-side snapshot without changing phase.
    QueryState {
        reply: oneshot::Sender<Result<GameState>>,
    },
}

/// Pauses applied after a round before play resumes.
#[derive(Clone, Copy, Debug)]
pub struct SettleWindows {
    pub war: Duration,
    pub round: Duration,
}

/// Background task that processes session commands.
pub struct SessionWorker {
    server: Arc<dyn GameServer>,
    retry: RetryController,
    machine: PhaseMachine,
    event_bus: EventBus,
    command_rx: mpsc::Receiver<Command>,
    cancel: CancellationToken,
    round_in_flight: Arc<AtomicBool>,
    settle: SettleWindows,
}

impl SessionWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        server: Arc<dyn GameServer>,
        retry: RetryController,
        machine: PhaseMachine,
        event_bus: EventBus,
        command_rx: mpsc::Receiver<Command>,
        cancel: CancellationToken,
        round_in_flight: Arc<AtomicBool>,
        settle: SettleWindows,
    ) -> Self {
        Self {
            server,
            retry,
            machine,
            event_bus,
            command_rx,
            cancel,
            round_in_flight,
            settle,
        }
    }

    /// Main worker loop. Ends when every handle is dropped or the session is
    /// cancelled.
    pub async fn run(mut self) {
        debug!(target: "runtime::session", "Session worker started");
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(target: "runtime::session", "Session cancelled");
                    break;
                }
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                else => break,
            }
        }
        // Later requests must see the closed channel, not RoundInProgress.
        self.round_in_flight.store(false, Ordering::Release);
        debug!(target: "runtime::session", phase = %self.machine.current(), "Session worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::StartGame { reply } => {
                let result = self.start_game().await;
                if reply.send(result).is_err() {
                    debug!(target: "runtime::session", "StartGame reply channel closed (caller dropped)");
                }
            }
            Command::RequestRound { reply } => {
                let result = self.play_round().await;
                self.round_in_flight.store(false, Ordering::Release);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::session", "RequestRound reply channel closed (caller dropped)");
                }
            }
            Command::Pause { reply } => {
                let result = self.change_phase("pause", GamePhase::Playing, GamePhase::Paused);
                let _ = reply.send(result);
            }
            Command::Resume { reply } => {
                let result = self.change_phase("resume", GamePhase::Paused, GamePhase::Playing);
                let _ = reply.send(result);
            }
            Command::ReturnToMenu { reply } => {
                let result =
                    self.change_phase("return_to_menu", GamePhase::GameOver, GamePhase::Idle);
                let _ = reply.send(result);
            }
            Command::QueryState { reply } => {
                let result = self.query_state().await;
                if reply.send(result).is_err() {
                    debug!(target: "runtime::session", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Moves `from → to` on request. Asking for the phase the session is
    /// already in is accepted as a no-op.
    fn change_phase(
        &mut self,
        operation: &'static str,
        from: GamePhase,
        to: GamePhase,
    ) -> Result<()> {
        let phase = self.machine.current();
        if phase != from && phase != to {
            return Err(RuntimeError::UnexpectedPhase { operation, phase });
        }
        self.machine.transition_to(to)?;
        Ok(())
    }

    async fn start_game(&mut self) -> Result<GameState> {
        let phase = self.machine.current();
        if phase != GamePhase::Idle {
            return Err(RuntimeError::UnexpectedPhase {
                operation: "start_game",
                phase,
            });
        }

        self.machine.transition_to(GamePhase::Initializing)?;

        let response = self
            .retry
            .execute_with_retry("start_new_game", &self.cancel, || {
                self.server.start_new_game()
            })
            .await;

        match response.and_then(|response| into_data("start_new_game", response)) {
            Ok(state) => {
                self.machine.transition_to(GamePhase::Playing)?;
                info!(
                    target: "runtime::session",
                    player_cards = state.player_card_count,
                    opponent_cards = state.opponent_card_count,
                    "Game started"
                );
                Ok(state)
            }
            Err(error) => Err(self.fail("start_new_game", error)),
        }
    }

    async fn play_round(&mut self) -> Result<RoundResult> {
        let phase = self.machine.current();
        if phase != GamePhase::Playing {
            return Err(RuntimeError::UnexpectedPhase {
                operation: "request_round",
                phase,
            });
        }

        let response = self
            .retry
            .execute_with_retry("resolve_next_round", &self.cancel, || {
                self.server.resolve_next_round()
            })
            .await;

        let result = match response.and_then(|r| into_data("resolve_next_round", r)) {
            Ok(result) => result,
            Err(error) => return Err(self.fail("resolve_next_round", error)),
        };

        // Phase first, so subscribers reacting to the round see the new phase.
        if result.is_war() {
            self.machine.transition_to(GamePhase::War)?;
        } else if !result.is_game_ended {
            self.machine.transition_to(GamePhase::RoundComplete)?;
        }
        if result.is_game_ended {
            self.machine.transition_to(GamePhase::GameOver)?;
        }

        self.publish_round(&result);

        debug!(
            target: "runtime::session",
            outcome = ?result.outcome,
            cards_won = result.cards_won,
            war_depth = result.war_depth,
            game_ended = result.is_game_ended,
            "Round resolved"
        );

        if !result.is_game_ended {
            let window = if result.is_war() {
                self.settle.war
            } else {
                self.settle.round
            };
            self.wait_settle(window).await?;
            self.machine.transition_to(GamePhase::Playing)?;
        } else {
            info!(
                target: "runtime::session",
                winner = ?result.game_winner,
                "Game over"
            );
        }

        Ok(result)
    }

    fn publish_round(&self, result: &RoundResult) {
        for depth in 1..=result.war_depth {
            self.event_bus
                .publish(Event::Round(RoundEvent::WarStarted { depth }));
        }

        self.event_bus
            .publish(Event::Round(RoundEvent::Completed(*result)));

        if result.war_depth > 0 {
            self.event_bus
                .publish(Event::Round(RoundEvent::WarCompleted {
                    depth: result.war_depth,
                    cards_won: result.cards_won,
                }));
        }
    }

    async fn wait_settle(&self, window: Duration) -> Result<()> {
        if window.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RuntimeError::Cancelled),
            _ = sleep(window) => Ok(()),
        }
    }

    async fn query_state(&self) -> Result<GameState> {
        let response = self
            .retry
            .execute_with_retry("get_game_state", &self.cancel, || {
                self.server.get_game_state()
            })
            .await?;

        into_data("get_game_state", response).inspect_err(|error| {
            warn!(target: "runtime::session", %error, "Game state query failed");
        })
    }

    /// Reports a failed server operation and falls back to Idle.
    ///
    /// Cancellation is passed through untouched: it aborts, it does not roll
    /// the phase back.
    fn fail(&mut self, operation: &'static str, error: RuntimeError) -> RuntimeError {
        if error.is_cancelled() {
            return error;
        }

        warn!(
            target: "runtime::session",
            operation,
            phase = %self.machine.current(),
            %error,
            "Server operation failed, returning to idle"
        );

        let message = match &error {
            RuntimeError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        };
        self.event_bus.publish(Event::Server(ServerEvent {
            operation: operation.to_string(),
            message,
        }));

        if let Err(transition_error) = self.machine.transition_to(GamePhase::Idle) {
            warn!(target: "runtime::session", error = %transition_error, "Could not return to idle");
        }

        error
    }
}

/// Unwraps a response envelope, turning a failure into [`RuntimeError::Server`].
fn into_data<T>(operation: &'static str, response: ServerResponse<T>) -> Result<T> {
    if !response.success {
        return Err(RuntimeError::Server {
            operation,
            message: response.error_message().to_string(),
        });
    }
    response
        .data
        .ok_or(RuntimeError::MissingResponseData { operation })
}
