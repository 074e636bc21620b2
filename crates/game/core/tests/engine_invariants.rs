use proptest::prelude::*;
use war_core::{
    Card, Deck, GameConfig, GameWinner, Rank, RoundOutcome, STANDARD_DECK_SIZE, Side, Suit, Table,
    resolve_round,
};

/// A shuffled standard deck cut at `split`: the first `split` cards go to the
/// player, the rest to the opponent.
fn split_decks(seed: u64, split: usize) -> (Deck, Deck) {
    let cards: Vec<Card> = Deck::shuffled(seed).iter().copied().collect();
    let (player, opponent) = cards.split_at(split);
    (
        Deck::from_cards(player.iter().copied()),
        Deck::from_cards(opponent.iter().copied()),
    )
}

fn play_out(seed: u64) -> (Vec<war_core::RoundResult>, Option<GameWinner>) {
    let mut table = Table::deal(GameConfig::with_seed(seed));
    let mut results = Vec::new();
    while table.is_active() {
        results.push(table.play_round().expect("active table resolves"));
    }
    (results, table.snapshot().winner)
}

proptest! {
    #[test]
    fn resolve_round_conserves_cards(seed in any::<u64>(), split in 0usize..=52) {
        let (mut player, mut opponent) = split_decks(seed, split);

        let result = resolve_round(&mut player, &mut opponent).unwrap();

        prop_assert_eq!(player.len() + opponent.len(), STANDARD_DECK_SIZE);
        prop_assert!(result.cards_won <= STANDARD_DECK_SIZE);
        prop_assert!(result.war_depth <= GameConfig::MAX_WAR_DEPTH);
    }

    #[test]
    fn resolve_round_is_deterministic(seed in any::<u64>(), split in 1usize..52) {
        let (mut player_a, mut opponent_a) = split_decks(seed, split);
        let (mut player_b, mut opponent_b) = (player_a.clone(), opponent_a.clone());

        let first = resolve_round(&mut player_a, &mut opponent_a).unwrap();
        let second = resolve_round(&mut player_b, &mut opponent_b).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(player_a, player_b);
        prop_assert_eq!(opponent_a, opponent_b);
    }

    #[test]
    fn every_round_of_a_game_conserves_cards(seed in any::<u64>()) {
        let mut table = Table::deal(GameConfig::with_seed(seed).max_rounds(2_000));
        while table.is_active() {
            table.play_round().unwrap();
            prop_assert_eq!(table.snapshot().total_cards(), STANDARD_DECK_SIZE);
        }
    }
}

#[test]
fn king_beats_seven() {
    let mut player = Deck::from_cards([
        Card::new(Suit::Spades, Rank::King),
        Card::new(Suit::Spades, Rank::Four),
    ]);
    let mut opponent = Deck::from_cards([
        Card::new(Suit::Hearts, Rank::Seven),
        Card::new(Suit::Hearts, Rank::Four),
    ]);

    let result = resolve_round(&mut player, &mut opponent).unwrap();

    assert_eq!(result.outcome, RoundOutcome::PlayerWins);
    assert_eq!(result.cards_won, 2);
    assert_eq!(player.len(), 3);
    assert_eq!(opponent.len(), 1);
}

#[test]
fn war_with_capped_side_stakes_six_cards() {
    let mut player = Deck::from_cards([
        Card::new(Suit::Spades, Rank::Nine),
        Card::new(Suit::Spades, Rank::Three),
        Card::new(Suit::Spades, Rank::Two),
    ]);
    let mut opponent = Deck::from_cards(
        [Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King]
            .into_iter()
            .map(|rank| Card::new(Suit::Hearts, rank)),
    );

    let result = resolve_round(&mut player, &mut opponent).unwrap();

    assert_eq!(result.outcome, RoundOutcome::War);
    assert_eq!(result.winner, Some(Side::Opponent));
    assert_eq!(result.cards_won, 6);
    assert!(player.is_empty());
    assert!(result.is_game_ended);
    assert_eq!(result.game_winner, Some(GameWinner::Opponent));
}

#[test]
fn seeded_game_replays_identically() {
    let (first_results, first_winner) = play_out(2024);
    let (second_results, second_winner) = play_out(2024);

    assert!(!first_results.is_empty());
    assert_eq!(first_results, second_results);
    assert_eq!(first_winner, second_winner);
    assert!(first_winner.is_some());
}
