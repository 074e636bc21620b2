//! High-level session orchestrator.
//!
//! The session owns the worker task, wires up command and event channels, and
//! exposes a builder-based API for clients to drive a game.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use war_core::RoundResult;

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::config::SessionConfig;
use crate::events::{Event, EventBus, Topic};
use crate::phase::{GamePhase, PhaseHook, PhaseHookRegistry, PhaseMachine};
use crate::retry::RetryController;
use crate::server::{GameServer, SimulatedServer};
use crate::workers::{Command, SessionWorker, SettleWindows};

/// A running game session.
///
/// [`SessionHandle`] provides a cloneable façade for clients; the session
/// itself keeps the worker task so it can be shut down.
pub struct Session {
    handle: SessionHandle,
    worker_handle: JoinHandle<()>,
}

impl Session {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Get a cloneable handle to this session
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    pub fn phase(&self) -> GamePhase {
        self.handle.phase()
    }

    /// Starts a game and requests rounds until it is over.
    ///
    /// Returns the final round. A paused session is resumed first, and a
    /// finished one goes back to the menu before a new game is dealt.
    pub async fn run_game(&self) -> Result<RoundResult> {
        match self.handle.phase() {
            GamePhase::GameOver => {
                self.handle.return_to_menu().await?;
                self.handle.start_game().await?;
            }
            GamePhase::Idle => {
                self.handle.start_game().await?;
            }
            _ => {}
        }

        loop {
            if self.handle.phase() == GamePhase::Paused {
                self.handle.resume().await?;
            }
            let result = self.handle.request_round().await?;
            if result.is_game_ended {
                return Ok(result);
            }
        }
    }

    /// Cancel outstanding work and wait for the worker to stop.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.cancel();
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        info!(target: "runtime::session", "Session shut down");
        Ok(())
    }
}

/// Builder for [`Session`] with flexible configuration.
pub struct SessionBuilder {
    config: SessionConfig,
    server: Option<Arc<dyn GameServer>>,
    hooks: Vec<Arc<dyn PhaseHook>>,
    cancel: Option<CancellationToken>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            server: None,
            hooks: Vec::new(),
            cancel: None,
        }
    }

    /// Override session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom game server instead of a [`SimulatedServer`] built from
    /// the configuration.
    pub fn server(mut self, server: Arc<dyn GameServer>) -> Self {
        self.server = Some(server);
        self
    }

    /// Register a phase hook. Hooks run in priority order.
    pub fn hook(mut self, hook: Arc<dyn PhaseHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Tie the session to an outer cancellation token. The session cancels a
    /// child of it, so cancelling the session never cancels the parent.
    pub fn cancellation(mut self, parent: &CancellationToken) -> Self {
        self.cancel = Some(parent.child_token());
        self
    }

    /// Build the session and spawn its worker. Must be called inside a tokio
    /// runtime.
    pub fn build(self) -> Session {
        let SessionBuilder {
            config,
            server,
            hooks,
            cancel,
        } = self;

        let server = server.unwrap_or_else(|| {
            Arc::new(SimulatedServer::new(
                config.network.clone(),
                config.game.clone(),
            ))
        });
        let cancel = cancel.unwrap_or_default();
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let machine = PhaseMachine::new(PhaseHookRegistry::new(hooks), event_bus.clone());
        let round_in_flight = Arc::new(AtomicBool::new(false));

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(config.command_buffer_size.max(1));

        let handle = SessionHandle::new(
            command_tx,
            event_bus.clone(),
            machine.watch(),
            cancel.clone(),
            Arc::clone(&round_in_flight),
        );

        let worker = SessionWorker::new(
            server,
            RetryController::new(config.retry.clone()),
            machine,
            event_bus,
            command_rx,
            cancel,
            round_in_flight,
            SettleWindows {
                war: config.war_settle,
                round: config.round_settle,
            },
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        info!(
            target: "runtime::session",
            seed = config.game.seed,
            max_attempts = config.retry.max_attempts,
            "Session started"
        );

        Session {
            handle,
            worker_handle,
        }
    }
}
