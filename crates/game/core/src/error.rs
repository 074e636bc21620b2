//! Error types for war-core.
//!
//! Ordinary play never produces an error: ties and natural game end are
//! reported as data in [`crate::RoundResult`]. The types here describe misuse
//! or broken invariants.

/// Attempted to draw from a deck with no cards left.
///
/// The engine checks deck sizes before every draw, so this surfacing at runtime
/// indicates a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("attempted to draw from an empty deck")]
pub struct EmptyDeckError;

/// Errors surfaced by [`crate::Table`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("no active game: the game has not started or is already over")]
    GameNotActive,

    #[error("card conservation violated: {total} cards on the table, expected {expected}")]
    CardCountMismatch { total: usize, expected: usize },

    #[error(transparent)]
    EmptyDeck(#[from] EmptyDeckError),
}
