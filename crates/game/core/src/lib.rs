//! Deterministic rules for the card game War.
//!
//! `war-core` defines cards, decks and the round resolution algorithm, and
//! exposes pure APIs that the runtime wraps behind its simulated server. All
//! card movement flows through [`engine::resolve_round`], normally driven by
//! [`Table::play_round`].
pub mod card;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod round;
pub mod state;

pub use card::{Card, Rank, Suit};
pub use config::GameConfig;
pub use deck::{Deck, STANDARD_DECK_SIZE};
pub use engine::{WarPot, resolve_round};
pub use error::{EmptyDeckError, TableError};
pub use round::{GameWinner, RoundOutcome, RoundResult, Side};
pub use state::{GameState, Table};
