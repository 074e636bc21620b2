//! FIFO card queues.
//!
//! Each side of the table holds one [`Deck`]. Cards leave from the front and
//! return to the back; the deck is only ever shuffled once, before the deal.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::card::Card;
use crate::error::EmptyDeckError;

/// Number of cards in a standard deck.
pub const STANDARD_DECK_SIZE: usize = 52;

/// Ordered queue of cards belonging to one side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a deck whose front is the first card yielded.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Unshuffled 52-card deck in suit-major order.
    pub fn standard() -> Self {
        Self::from_cards(Card::all())
    }

    /// Standard deck shuffled with a ChaCha stream seeded from `seed`.
    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Self::standard();
        deck.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
        deck
    }

    /// Uniform in-place permutation (Fisher–Yates).
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Deals the deck alternately into two halves, first card to the player.
    pub fn deal(self) -> (Deck, Deck) {
        let mut player = Deck::new();
        let mut opponent = Deck::new();
        for (index, card) in self.cards.into_iter().enumerate() {
            if index % 2 == 0 {
                player.push_back(card);
            } else {
                opponent.push_back(card);
            }
        }
        (player, opponent)
    }

    /// Removes the front card.
    ///
    /// Callers are expected to check [`Deck::len`] first; an empty draw is a
    /// logic error.
    pub fn draw(&mut self) -> Result<Card, EmptyDeckError> {
        self.cards.pop_front().ok_or(EmptyDeckError)
    }

    /// Appends a card to the back.
    #[inline]
    pub fn push_back(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Front card without removing it.
    pub fn peek(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Iterates front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }
}

impl Extend<Card> for Deck {
    fn extend<I: IntoIterator<Item = Card>>(&mut self, iter: I) {
        self.cards.extend(iter);
    }
}
