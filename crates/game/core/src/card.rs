//! Playing card value types.
//!
//! A [`Card`] is an immutable `(suit, rank)` pair. Only the rank takes part in
//! comparisons; the suit is carried for presentation.

use core::fmt;

use strum::{EnumIter, IntoEnumIterator};

/// Card suit. Cosmetic only: never consulted when comparing cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    const fn symbol(&self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

/// Card rank, ordered from Two (lowest) to Ace (highest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Numeric comparison value: 2 through 14, Ace high.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    const fn label(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

/// A single playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Comparison value of this card (see [`Rank::value`]).
    #[inline]
    pub const fn value(&self) -> u8 {
        self.rank.value()
    }

    /// Iterates all 52 distinct cards, suit-major.
    pub fn all() -> impl Iterator<Item = Card> {
        Suit::iter().flat_map(|suit| Rank::iter().map(move |rank| Card::new(suit, rank)))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_is_highest_and_two_lowest() {
        assert_eq!(Rank::Two.value(), 2);
        assert_eq!(Rank::Ten.value(), 10);
        assert_eq!(Rank::King.value(), 13);
        assert_eq!(Rank::Ace.value(), 14);
    }

    #[test]
    fn suit_does_not_affect_value() {
        let hearts = Card::new(Suit::Hearts, Rank::Nine);
        let spades = Card::new(Suit::Spades, Rank::Nine);
        assert_eq!(hearts.value(), spades.value());
        assert_ne!(hearts, spades);
    }

    #[test]
    fn all_yields_52_unique_cards() {
        let cards: Vec<Card> = Card::all().collect();
        assert_eq!(cards.len(), 52);

        let unique: std::collections::HashSet<Card> = cards.iter().copied().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn display_uses_rank_label_and_suit_symbol() {
        assert_eq!(Card::new(Suit::Spades, Rank::Ace).to_string(), "A♠");
        assert_eq!(Card::new(Suit::Hearts, Rank::Ten).to_string(), "10♥");
    }
}
