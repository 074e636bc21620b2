//! Asynchronous game server boundary.
//!
//! The session talks to the game only through [`GameServer`]. The bundled
//! [`SimulatedServer`] runs the rules in-process and behaves like a remote
//! peer: every call waits a random latency and may time out or fail.
mod response;
mod simulated;

pub use response::{ServerFailure, ServerResponse};
pub use simulated::SimulatedServer;

use async_trait::async_trait;
use war_core::{GameState, RoundResult};

use crate::api::Result;

/// Request/response surface of the game server.
///
/// Expected failures come back as unsuccessful [`ServerResponse`]s. `Err` is
/// reserved for misuse and broken invariants, which retrying cannot fix.
#[async_trait]
pub trait GameServer: Send + Sync {
    /// Deals a fresh game and returns its initial snapshot.
    async fn start_new_game(&self) -> Result<ServerResponse<GameState>>;

    /// Resolves the next round of the current game.
    async fn resolve_next_round(&self) -> Result<ServerResponse<RoundResult>>;

    /// Snapshot of the current game. Inactive default state if none started.
    async fn get_game_state(&self) -> Result<ServerResponse<GameState>>;
}
