//! Headless War client.
//!
//! Loads configuration from the environment (and `.env`), plays one game
//! against the simulated server, logs every event and prints a JSON summary.
//!
//! ```bash
//! WAR_SEED=7 WAR_ERROR_CHANCE=0.2 RUST_LOG=debug cargo run -p war-client
//! ```

mod config;
mod logging;
mod summary;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use war_runtime::{Event, GamePhase, RoundEvent, Session, SessionHandle, Topic};

use crate::config::ClientConfig;
use crate::summary::GameSummary;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    info!(
        seed = config.session.game.seed,
        max_rounds = config.session.game.max_rounds,
        error_chance = config.session.network.error_chance,
        timeout_chance = config.session.network.timeout_chance,
        "Starting War client"
    );

    let shutdown = CancellationToken::new();
    spawn_ctrl_c(shutdown.clone());

    let session = Session::builder()
        .config(config.session.clone())
        .cancellation(&shutdown)
        .build();
    let handle = session.handle();
    spawn_event_logger(&handle);

    let mut summary = GameSummary::new(config.session.game.seed);
    let outcome = play(&handle, &config, &mut summary).await;

    if !handle.is_cancelled() {
        match handle.game_state().await {
            Ok(state) => summary.final_state = Some(state),
            Err(error) => warn!(%error, "Could not fetch final game state"),
        }
    }

    session.shutdown().await?;

    let json = if config.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");

    match outcome {
        Err(error) if error.is_cancelled() => {
            info!("Interrupted");
            Ok(())
        }
        other => other.context("game aborted"),
    }
}

async fn play(
    handle: &SessionHandle,
    config: &ClientConfig,
    summary: &mut GameSummary,
) -> war_runtime::Result<()> {
    let state = handle.start_game().await?;
    info!(
        player_cards = state.player_card_count,
        opponent_cards = state.opponent_card_count,
        "Cards dealt"
    );

    loop {
        if config
            .round_limit
            .is_some_and(|limit| summary.rounds >= limit)
        {
            info!(rounds = summary.rounds, "Round limit reached");
            return Ok(());
        }

        let result = handle.request_round().await?;
        summary.record(&result);

        if result.is_game_ended {
            debug_assert_eq!(handle.phase(), GamePhase::GameOver);
            info!(
                rounds = summary.rounds,
                wars = summary.wars,
                winner = ?result.game_winner,
                "Game over"
            );
            return handle.return_to_menu().await;
        }
    }
}

fn spawn_ctrl_c(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, cancelling");
            shutdown.cancel();
        }
    });
}

fn spawn_event_logger(handle: &SessionHandle) {
    for (topic, mut rx) in handle.subscribe_multiple(&Topic::ALL) {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => log_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(?topic, skipped, "Event logger lagging");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Phase(change) => debug!(target: "client::events", ?change, "Phase"),
        Event::Round(RoundEvent::Completed(result)) => {
            let cards = match (result.player_card, result.opponent_card) {
                (Some(player), Some(opponent)) => format!("{player} vs {opponent}"),
                _ => "no cards".to_string(),
            };
            info!(
                target: "client::events",
                %cards,
                outcome = ?result.outcome,
                cards_won = result.cards_won,
                "Round"
            );
        }
        Event::Round(RoundEvent::WarStarted { depth }) => {
            info!(target: "client::events", depth, "War!");
        }
        Event::Round(RoundEvent::WarCompleted { depth, cards_won }) => {
            debug!(target: "client::events", depth, cards_won, "War settled");
        }
        Event::Server(failure) => {
            warn!(
                target: "client::events",
                operation = %failure.operation,
                message = %failure.message,
                "Server error"
            );
        }
    }
}
