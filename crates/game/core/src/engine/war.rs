//! War escalation.
//!
//! A tie commits more cards from both sides into a shared pot: up to three
//! face-down and one face-up each, capped by what each side still holds. The
//! face-up pair decides the pot; another tie recurses with the larger pot.

use crate::card::Card;
use crate::config::GameConfig;
use crate::deck::Deck;
use crate::error::EmptyDeckError;
use crate::round::{GameWinner, Side};

use super::Resolution;

/// Cards at stake during a round, in the order they were drawn.
///
/// Each card remembers which side committed it so a drawn War can hand stakes
/// back to their owners.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarPot {
    stakes: Vec<(Side, Card)>,
}

impl WarPot {
    /// Starts a pot from the first pair of cards.
    pub fn new(player_card: Card, opponent_card: Card) -> Self {
        let mut stakes = Vec::with_capacity(crate::deck::STANDARD_DECK_SIZE);
        stakes.push((Side::Player, player_card));
        stakes.push((Side::Opponent, opponent_card));
        Self { stakes }
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    fn commit(&mut self, side: Side, card: Card) {
        self.stakes.push((side, card));
    }

    /// Moves the whole pot, in draw order, to the back of `side`'s deck.
    pub(crate) fn award(
        &mut self,
        side: Side,
        player: &mut Deck,
        opponent: &mut Deck,
    ) -> Resolution {
        let cards_won = self.stakes.len();
        let target = match side {
            Side::Player => player,
            Side::Opponent => opponent,
        };
        target.extend(self.stakes.drain(..).map(|(_, card)| card));

        Resolution {
            winner: Some(side),
            cards_won,
            depth: 0,
            game_winner: None,
        }
    }

    /// Returns every staked card to the deck of the side that committed it.
    fn return_stakes(&mut self, player: &mut Deck, opponent: &mut Deck) {
        for (side, card) in self.stakes.drain(..) {
            match side {
                Side::Player => player.push_back(card),
                Side::Opponent => opponent.push_back(card),
            }
        }
    }
}

/// Runs one War level at `depth` (1 for the first tie of a round).
pub(super) fn escalate(
    player: &mut Deck,
    opponent: &mut Deck,
    pot: &mut WarPot,
    depth: u32,
) -> Result<Resolution, EmptyDeckError> {
    // Every level draws at least one card per side, so 26 levels empty a deck.
    debug_assert!(depth <= GameConfig::MAX_WAR_DEPTH, "war depth {depth} exceeds bound");

    let war_card_count = GameConfig::WAR_CARDS_PER_SIDE.min(player.len().min(opponent.len()));

    if war_card_count == 0 {
        return Ok(settle_exhausted(player, opponent, pot, depth));
    }

    for _ in 0..war_card_count - 1 {
        pot.commit(Side::Player, player.draw()?);
        pot.commit(Side::Opponent, opponent.draw()?);
    }

    let player_up = player.draw()?;
    let opponent_up = opponent.draw()?;
    pot.commit(Side::Player, player_up);
    pot.commit(Side::Opponent, opponent_up);

    match Side::higher(&player_up, &opponent_up) {
        Some(side) => Ok(Resolution {
            depth,
            ..pot.award(side, player, opponent)
        }),
        None => escalate(player, opponent, pot, depth + 1),
    }
}

/// A side cannot continue the War. The side with more cards takes the pot and
/// the game; with both sides empty the War is drawn and stakes go home.
fn settle_exhausted(
    player: &mut Deck,
    opponent: &mut Deck,
    pot: &mut WarPot,
    depth: u32,
) -> Resolution {
    match Side::with_more(player.len(), opponent.len()) {
        Some(side) => Resolution {
            depth,
            game_winner: Some(GameWinner::from(side)),
            ..pot.award(side, player, opponent)
        },
        None => {
            pot.return_stakes(player, opponent);
            Resolution {
                winner: None,
                cards_won: 0,
                depth,
                game_winner: Some(GameWinner::Draw),
            }
        }
    }
}
