//! Round resolution.
//!
//! [`resolve_round`] is the single entry point that moves cards between the
//! two decks. It is pure over its arguments: the same two card sequences always
//! produce the same result and the same resulting decks.

mod war;

pub use war::WarPot;

use crate::deck::Deck;
use crate::error::EmptyDeckError;
use crate::round::{GameWinner, RoundOutcome, RoundResult, Side};

/// Resolves one round between the two decks.
///
/// Draws one card per side. The higher card takes both; a tie escalates into a
/// War (see [`WarPot`]) that keeps committing cards until a face-up comparison
/// is decisive or a side runs out.
///
/// If either deck is empty on entry the game is already decided and a terminal
/// result is returned without drawing.
///
/// # Errors
///
/// Returns [`EmptyDeckError`] only if a draw is attempted on an empty deck,
/// which the size checks rule out.
pub fn resolve_round(
    player: &mut Deck,
    opponent: &mut Deck,
) -> Result<RoundResult, EmptyDeckError> {
    if player.is_empty() || opponent.is_empty() {
        return Ok(RoundResult::terminal(player.len(), opponent.len()));
    }

    let player_card = player.draw()?;
    let opponent_card = opponent.draw()?;
    let mut pot = WarPot::new(player_card, opponent_card);

    let (outcome, resolution) = match Side::higher(&player_card, &opponent_card) {
        Some(side) => (RoundOutcome::from(side), pot.award(side, player, opponent)),
        None => (RoundOutcome::War, war::escalate(player, opponent, &mut pot, 1)?),
    };

    let game_winner = resolution
        .game_winner
        .or_else(|| GameWinner::if_exhausted(player.len(), opponent.len()));

    Ok(RoundResult {
        player_card: Some(player_card),
        opponent_card: Some(opponent_card),
        outcome,
        winner: resolution.winner,
        cards_won: resolution.cards_won,
        war_depth: resolution.depth,
        is_game_ended: game_winner.is_some(),
        game_winner,
    })
}

/// How a pot was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub winner: Option<Side>,
    pub cards_won: usize,
    pub depth: u32,
    /// Set when settling the pot itself decided the game (a side could not
    /// continue a War).
    pub game_winner: Option<GameWinner>,
}
