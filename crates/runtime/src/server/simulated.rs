//! In-process server that injects latency, timeouts and transient errors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use war_core::{GameConfig, GameState, RoundResult, Table};

use super::{GameServer, ServerFailure, ServerResponse};
use crate::api::{Result, RuntimeError};
use crate::config::NetworkConfig;

/// What a call is going to do, decided before the latency wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Roll {
    Complete,
    TimeOut,
    Fail,
}

/// Simulated remote game server.
///
/// Owns the only [`Table`]. Each call holds the table lock for the whole
/// synchronous operation, so "draw, compare, award" is never interleaved even
/// if several callers share the server.
pub struct SimulatedServer {
    network: NetworkConfig,
    game: GameConfig,
    /// Latency and fault rolls. Separate from the shuffle seed so injected
    /// failures never change the cards dealt.
    rng: Mutex<ChaCha8Rng>,
    table: Mutex<Option<Table>>,
    games_started: AtomicU64,
}

impl SimulatedServer {
    pub fn new(network: NetworkConfig, game: GameConfig) -> Self {
        let network = network.normalized();
        let rng = match network.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            network,
            game,
            rng: Mutex::new(rng),
            table: Mutex::new(None),
            games_started: AtomicU64::new(0),
        }
    }

    async fn roll(&self) -> (Duration, Roll) {
        let mut rng = self.rng.lock().await;

        let delay = if self.network.max_delay > self.network.min_delay {
            rng.gen_range(self.network.min_delay..=self.network.max_delay)
        } else {
            self.network.min_delay
        };

        let roll = if rng.gen_bool(self.network.timeout_chance) {
            Roll::TimeOut
        } else if rng.gen_bool(self.network.error_chance) {
            Roll::Fail
        } else {
            Roll::Complete
        };

        (delay, roll)
    }

    /// Waits out the simulated latency, then either reports an injected
    /// failure or runs `operation` against the table.
    async fn call<T, F>(&self, operation: &'static str, run: F) -> Result<ServerResponse<T>>
    where
        T: Send,
        F: FnOnce(&mut Option<Table>) -> Result<T> + Send,
    {
        let started = Instant::now();
        let (delay, roll) = self.roll().await;

        sleep(delay).await;

        match roll {
            Roll::TimeOut => {
                sleep(self.network.timeout_duration).await;
                debug!(target: "runtime::server", operation, "Simulated timeout");
                return Ok(ServerResponse::from_failure(
                    ServerFailure::TimedOut,
                    started.elapsed(),
                ));
            }
            Roll::Fail => {
                debug!(target: "runtime::server", operation, "Simulated server error");
                return Ok(ServerResponse::from_failure(
                    ServerFailure::ServerError,
                    started.elapsed(),
                ));
            }
            Roll::Complete => {}
        }

        let data = {
            let mut table = self.table.lock().await;
            run(&mut table)?
        };

        debug!(
            target: "runtime::server",
            operation,
            delay_ms = started.elapsed().as_millis() as u64,
            "Call completed"
        );
        Ok(ServerResponse::ok(data, started.elapsed()))
    }
}

#[async_trait]
impl GameServer for SimulatedServer {
    async fn start_new_game(&self) -> Result<ServerResponse<GameState>> {
        self.call("start_new_game", |table| {
            let index = self.games_started.fetch_add(1, Ordering::Relaxed);
            let config = GameConfig {
                seed: self.game.seed.wrapping_add(index),
                ..self.game.clone()
            };
            info!(target: "runtime::server", seed = config.seed, "Dealing new game");

            let dealt = Table::deal(config);
            let snapshot = dealt.snapshot();
            *table = Some(dealt);
            Ok(snapshot)
        })
        .await
    }

    async fn resolve_next_round(&self) -> Result<ServerResponse<RoundResult>> {
        self.call("resolve_next_round", |table| {
            let table = table.as_mut().ok_or(RuntimeError::NoActiveGame)?;
            Ok(table.play_round()?)
        })
        .await
    }

    async fn get_game_state(&self) -> Result<ServerResponse<GameState>> {
        self.call("get_game_state", |table| {
            Ok(table.as_ref().map(Table::snapshot).unwrap_or_default())
        })
        .await
    }
}
