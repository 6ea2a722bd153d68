//! Integration tests for the DICEWAR engine
//!
//! Drives the public API the way a host does: new game, list moves, apply
//! moves, ask the AI, read the outcome.

use std::rc::Rc;
use std::time::Instant;

use dicewar_core::{
    choose_move, choose_move_with_stats, limit_depth, new_game, new_game_seeded, rate, winners_of,
    AiPlayer, Board, GameConfig, Hex, MoveLabel, Outcome, Player, Position, SearchConfig,
    SearchStats,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn board(config: &GameConfig, cells: &[(u8, u8)]) -> Board {
    Board::from_cells(
        config,
        cells.iter().map(|&(p, d)| Hex::new(Player(p), d)).collect(),
    )
}

/// `[{A,3},{B,1},{A,2},{B,1}]` on the classic 2x2 board
fn sample_game() -> Rc<Position> {
    let config = GameConfig::default();
    Rc::new(Position::root(
        config,
        board(&config, &[(0, 3), (1, 1), (0, 2), (1, 1)]),
    ))
}

/// Apply AI moves until the game ends
fn play_out(root: Rc<Position>, depth: usize) -> (Rc<Position>, usize) {
    let search = SearchConfig { depth };
    let mut position = root;
    let mut moves = 0;
    while !position.moves().is_empty() {
        let next = choose_move(&position, &search).apply();
        position = next;
        moves += 1;
    }
    (position, moves)
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_opening_moves_on_sample_board() {
    let game = sample_game();
    let labels: Vec<MoveLabel> = game.moves().iter().map(|m| m.label()).collect();

    assert!(labels.iter().all(|l| !l.is_pass()), "no pass on first move");
    let from_zero: Vec<MoveLabel> = labels
        .iter()
        .copied()
        .filter(|l| l.source == Some(0))
        .collect();
    assert_eq!(from_zero, vec![MoveLabel::attack(0, 1), MoveLabel::attack(0, 3)]);
    assert!(!labels.contains(&MoveLabel::attack(0, 2)), "0 -> 2 is friendly");
}

#[test]
fn test_single_legal_move_is_taken() {
    let config = GameConfig::default();
    let game = Position::root(config, board(&config, &[(0, 2), (1, 1), (1, 3), (1, 3)]));
    let chosen = choose_move(&game, &SearchConfig { depth: 1 });
    assert_eq!(chosen.label(), MoveLabel::attack(0, 1));
}

#[test]
fn test_single_owner_board() {
    let config = GameConfig::new(3, 2, 2, 3).unwrap();
    let game = Position::root(config, board(&config, &[(0, 1), (0, 2), (0, 3), (0, 1), (0, 2), (0, 3)]));
    assert!(game.moves().is_empty());
    assert_eq!(winners_of(&game), vec![Player(0)]);
    assert_eq!(Outcome::of(&game).to_string(), "The winner is A");
}

// ============================================================================
// LAZY TREE
// ============================================================================

#[test]
fn test_applying_twice_returns_same_position() {
    let game = sample_game();
    let mv = &game.moves()[1];
    assert!(!mv.is_applied());

    let first = mv.apply();
    let second = mv.apply();
    assert!(Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(&first, &game.apply(1)));
}

#[test]
fn test_ancestor_boards_stay_valid() {
    let game = sample_game();
    let before = game.board().clone();
    let (end, _) = play_out(Rc::clone(&game), 3);
    assert_eq!(game.board(), &before);
    assert!(end.moves().is_empty());
}

// ============================================================================
// SEARCH
// ============================================================================

#[test]
fn test_pruned_rating_matches_exhaustive_on_random_games() {
    fn minimax(position: &Position, player: Player) -> i32 {
        if position.moves().is_empty() {
            return dicewar_core::evaluate(position, player);
        }
        let ratings = position.moves().iter().map(|m| minimax(&m.apply(), player));
        if position.player() == player {
            ratings.max().unwrap()
        } else {
            ratings.min().unwrap()
        }
    }

    let config = GameConfig::new(2, 2, 2, 3).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..50 {
        let game = new_game(config, &mut rng);
        let depth = rng.gen_range(1..=5);
        let view = limit_depth(&game, depth);
        let mut stats = SearchStats::default();
        let player = game.player();
        assert_eq!(
            rate(&view, player, i32::MIN, i32::MAX, &mut stats),
            minimax(&view, player)
        );
    }
}

#[test]
fn test_search_stats_reported() {
    let config = GameConfig::new(3, 3, 2, 3).unwrap();
    let game = new_game_seeded(config, 17);
    if game.moves().is_empty() {
        return;
    }
    let (chosen, stats) = choose_move_with_stats(&game, &SearchConfig { depth: 3 });
    assert!(stats.rated > game.moves().len() as u64);
    assert!(game.moves().iter().any(|m| std::ptr::eq(m, chosen)));
}

#[test]
fn test_search_performance() {
    let config = GameConfig::new(3, 3, 2, 3).unwrap();
    let game = new_game_seeded(config, 3);
    if game.moves().is_empty() {
        return;
    }

    let start = Instant::now();
    let _ = choose_move(&game, &SearchConfig { depth: 2 });
    let d2_time = start.elapsed();

    let start = Instant::now();
    let _ = choose_move(&game, &SearchConfig { depth: 4 });
    let d4_time = start.elapsed();

    println!("Alpha-Beta Performance:");
    println!("  Depth 2: {:?}", d2_time);
    println!("  Depth 4: {:?}", d4_time);

    assert!(d4_time.as_millis() < 30000, "Depth 4 took too long");
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_full_games_end_with_a_winner() {
    let config = GameConfig::new(3, 3, 2, 3).unwrap();
    for seed in 0..10 {
        let (end, moves) = play_out(new_game_seeded(config, seed), 2);
        let winners = winners_of(&end);
        assert!(!winners.is_empty());
        assert!(winners.windows(2).all(|w| w[0] < w[1]));
        println!("Seed {}: {} after {} moves", seed, Outcome::from_winners(winners), moves);
    }
}

#[test]
fn test_three_player_self_play() {
    let config = GameConfig::new(3, 2, 3, 3).unwrap();
    let mut ai = AiPlayer::with_depth(3);
    let (end, history) = ai.play_game(new_game_seeded(config, 77), 1000);

    assert!(end.moves().is_empty());
    assert!(history.len() < 1000);
    let outcome = Outcome::of(&end);
    let best = outcome
        .winners()
        .iter()
        .map(|&p| end.board().hex_count(p))
        .max()
        .unwrap();
    for id in 0..config.players {
        assert!(end.board().hex_count(Player(id)) <= best);
    }
}
