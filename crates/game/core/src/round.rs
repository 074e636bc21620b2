//! Round outcome types produced by the engine.

use core::cmp::Ordering;

use crate::card::Card;

/// One side of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// Side whose card ranks higher, `None` on a tie. Suits are ignored.
    pub fn higher(player: &Card, opponent: &Card) -> Option<Side> {
        match player.value().cmp(&opponent.value()) {
            Ordering::Greater => Some(Side::Player),
            Ordering::Less => Some(Side::Opponent),
            Ordering::Equal => None,
        }
    }

    /// Side holding strictly more cards, `None` when equal.
    pub fn with_more(player_count: usize, opponent_count: usize) -> Option<Side> {
        match player_count.cmp(&opponent_count) {
            Ordering::Greater => Some(Side::Player),
            Ordering::Less => Some(Side::Opponent),
            Ordering::Equal => None,
        }
    }
}

/// Outcome of the initial face-up comparison of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundOutcome {
    PlayerWins,
    OpponentWins,
    /// The first cards tied; see [`RoundResult::winner`] for who took the pot.
    War,
    /// Neither side had a card to play.
    Draw,
}

impl From<Side> for RoundOutcome {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => RoundOutcome::PlayerWins,
            Side::Opponent => RoundOutcome::OpponentWins,
        }
    }
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameWinner {
    Player,
    Opponent,
    /// Both sides ran out together, or the round cap hit with equal counts.
    Draw,
}

impl GameWinner {
    /// Winner by remaining card count.
    pub fn by_count(player_count: usize, opponent_count: usize) -> Self {
        Side::with_more(player_count, opponent_count).map_or(GameWinner::Draw, Self::from)
    }

    /// Winner if the game is over, i.e. at least one side has no cards.
    pub fn if_exhausted(player_count: usize, opponent_count: usize) -> Option<Self> {
        (player_count == 0 || opponent_count == 0)
            .then(|| Self::by_count(player_count, opponent_count))
    }
}

impl From<Side> for GameWinner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => GameWinner::Player,
            Side::Opponent => GameWinner::Opponent,
        }
    }
}

/// Output of one resolution call.
///
/// Created once per round and handed up by value; holds no reference into the
/// decks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    /// First card drawn by the player. `None` when the round ended the game
    /// before any card was drawn.
    pub player_card: Option<Card>,
    pub opponent_card: Option<Card>,
    pub outcome: RoundOutcome,
    /// Side that collected the pot. `None` for a terminal no-draw result or a
    /// drawn War.
    pub winner: Option<Side>,
    /// Number of cards moved to the winner's deck.
    pub cards_won: usize,
    /// Number of chained War escalations, 0 for a decisive first comparison.
    pub war_depth: u32,
    pub is_game_ended: bool,
    pub game_winner: Option<GameWinner>,
}

impl RoundResult {
    /// Result for a round requested when a deck is already empty.
    pub(crate) fn terminal(player_count: usize, opponent_count: usize) -> Self {
        let game_winner = GameWinner::by_count(player_count, opponent_count);
        Self {
            player_card: None,
            opponent_card: None,
            outcome: match game_winner {
                GameWinner::Player => RoundOutcome::PlayerWins,
                GameWinner::Opponent => RoundOutcome::OpponentWins,
                GameWinner::Draw => RoundOutcome::Draw,
            },
            winner: None,
            cards_won: 0,
            war_depth: 0,
            is_game_ended: true,
            game_winner: Some(game_winner),
        }
    }

    pub fn is_war(&self) -> bool {
        self.outcome == RoundOutcome::War
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    #[test]
    fn higher_ignores_suit() {
        let king = Card::new(Suit::Clubs, Rank::King);
        let seven = Card::new(Suit::Spades, Rank::Seven);
        let other_king = Card::new(Suit::Hearts, Rank::King);

        assert_eq!(Side::higher(&king, &seven), Some(Side::Player));
        assert_eq!(Side::higher(&seven, &king), Some(Side::Opponent));
        assert_eq!(Side::higher(&king, &other_king), None);
    }

    #[test]
    fn exhausted_winner_only_when_a_side_is_empty() {
        assert_eq!(GameWinner::if_exhausted(10, 42), None);
        assert_eq!(GameWinner::if_exhausted(52, 0), Some(GameWinner::Player));
        assert_eq!(GameWinner::if_exhausted(0, 52), Some(GameWinner::Opponent));
        assert_eq!(GameWinner::if_exhausted(0, 0), Some(GameWinner::Draw));
    }
}
