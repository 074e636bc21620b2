//! Authoritative table state.
//!
//! [`Table`] owns both decks for the lifetime of one game and is the only
//! place cards move. Everything above it sees [`GameState`] snapshots and
//! [`RoundResult`] values, never the decks themselves.

use crate::card::Card;
use crate::config::GameConfig;
use crate::deck::Deck;
use crate::engine;
use crate::error::TableError;
use crate::round::{GameWinner, RoundResult};

/// Read-only snapshot of a game in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub player_card_count: usize,
    pub opponent_card_count: usize,
    pub last_player_card: Option<Card>,
    pub last_opponent_card: Option<Card>,
    pub rounds_played: u32,
    pub is_active: bool,
    /// Set once the game has ended.
    pub winner: Option<GameWinner>,
}

impl GameState {
    pub fn total_cards(&self) -> usize {
        self.player_card_count + self.opponent_card_count
    }
}

/// Two decks plus round bookkeeping for a single game.
#[derive(Clone, Debug)]
pub struct Table {
    player: Deck,
    opponent: Deck,
    config: GameConfig,
    /// Cards on the table at the deal; conserved for the whole game.
    card_total: usize,
    rounds_played: u32,
    last_player_card: Option<Card>,
    last_opponent_card: Option<Card>,
    winner: Option<GameWinner>,
}

impl Table {
    /// Shuffles a standard deck with `config.seed` and deals 26 cards per side.
    pub fn deal(config: GameConfig) -> Self {
        let (player, opponent) = Deck::shuffled(config.seed).deal();
        Self::from_decks(player, opponent, config)
    }

    /// Starts a game from prepared decks.
    pub fn from_decks(player: Deck, opponent: Deck, config: GameConfig) -> Self {
        Self {
            card_total: player.len() + opponent.len(),
            player,
            opponent,
            config,
            rounds_played: 0,
            last_player_card: None,
            last_opponent_card: None,
            winner: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.winner.is_none()
    }

    /// Resolves the next round and records it.
    ///
    /// Reaching `max_rounds` ends the game by card count.
    ///
    /// # Errors
    ///
    /// [`TableError::GameNotActive`] once the game is over. The remaining
    /// variants indicate broken invariants.
    pub fn play_round(&mut self) -> Result<RoundResult, TableError> {
        if !self.is_active() {
            return Err(TableError::GameNotActive);
        }

        let mut result = engine::resolve_round(&mut self.player, &mut self.opponent)?;

        if result.player_card.is_some() {
            self.rounds_played += 1;
            self.last_player_card = result.player_card;
            self.last_opponent_card = result.opponent_card;
        }

        if !result.is_game_ended && self.rounds_played >= self.config.max_rounds {
            result.is_game_ended = true;
            result.game_winner = Some(GameWinner::by_count(
                self.player.len(),
                self.opponent.len(),
            ));
        }

        self.check_conservation()?;
        self.winner = result.game_winner;
        Ok(result)
    }

    /// Verifies that no card has been created or lost since the deal.
    pub fn check_conservation(&self) -> Result<(), TableError> {
        let total = self.player.len() + self.opponent.len();
        if total == self.card_total {
            Ok(())
        } else {
            Err(TableError::CardCountMismatch {
                total,
                expected: self.card_total,
            })
        }
    }

    pub fn snapshot(&self) -> GameState {
        GameState {
            player_card_count: self.player.len(),
            opponent_card_count: self.opponent.len(),
            last_player_card: self.last_player_card,
            last_opponent_card: self.last_opponent_card,
            rounds_played: self.rounds_played,
            is_active: self.is_active(),
            winner: self.winner,
        }
    }
}
