//! Aggregate statistics printed when a run ends.
use serde::Serialize;
use war_core::{GameState, GameWinner, RoundResult, Side};

/// Per-run tally of round results.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub rounds: u32,
    pub player_rounds: u32,
    pub opponent_rounds: u32,
    pub wars: u32,
    pub deepest_war: u32,
    pub largest_pot: usize,
    pub winner: Option<GameWinner>,
    pub finished: bool,
    pub final_state: Option<GameState>,
}

impl GameSummary {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: &RoundResult) {
        if result.player_card.is_some() {
            self.rounds += 1;
        }
        match result.winner {
            Some(Side::Player) => self.player_rounds += 1,
            Some(Side::Opponent) => self.opponent_rounds += 1,
            None => {}
        }
        if result.is_war() {
            self.wars += 1;
            self.deepest_war = self.deepest_war.max(result.war_depth);
        }
        self.largest_pot = self.largest_pot.max(result.cards_won);

        if result.is_game_ended {
            self.finished = true;
            self.winner = result.game_winner;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use war_core::{Card, Rank, RoundOutcome, Suit};

    fn round(
        outcome: RoundOutcome,
        winner: Option<Side>,
        cards_won: usize,
        depth: u32,
    ) -> RoundResult {
        RoundResult {
            player_card: Some(Card::new(Suit::Hearts, Rank::Five)),
            opponent_card: Some(Card::new(Suit::Spades, Rank::Five)),
            outcome,
            winner,
            cards_won,
            war_depth: depth,
            is_game_ended: false,
            game_winner: None,
        }
    }

    #[test]
    fn tallies_rounds_and_wars() {
        let mut summary = GameSummary::new(3);
        summary.record(&round(RoundOutcome::PlayerWins, Some(Side::Player), 2, 0));
        summary.record(&round(RoundOutcome::War, Some(Side::Opponent), 18, 2));

        let mut last = round(RoundOutcome::War, Some(Side::Player), 10, 1);
        last.is_game_ended = true;
        last.game_winner = Some(GameWinner::Player);
        summary.record(&last);

        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.player_rounds, 2);
        assert_eq!(summary.opponent_rounds, 1);
        assert_eq!(summary.wars, 2);
        assert_eq!(summary.deepest_war, 2);
        assert_eq!(summary.largest_pot, 18);
        assert!(summary.finished);
        assert_eq!(summary.winner, Some(GameWinner::Player));
    }

    #[test]
    fn serializes_to_json() {
        let summary = GameSummary::new(1);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["seed"], 1);
        assert_eq!(json["finished"], false);
        assert!(json["winner"].is_null());
    }
}
