//! Minimax AI with alpha-beta pruning

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::board::Player;
use crate::config::SearchConfig;
use crate::eval::evaluate;
use crate::game::{Move, MoveLabel, Position};
use crate::tree::limit_depth;

// ============================================================================
// STATISTICS
// ============================================================================

/// Work done by one or more searches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Positions rated (interior nodes and leaves)
    pub rated: u64,
    /// Times the remaining siblings of a node were skipped
    pub cutoffs: u64,
}

impl SearchStats {
    fn add(&mut self, other: SearchStats) {
        self.rated += other.rated;
        self.cutoffs += other.cutoffs;
    }
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

/// Rating of `position` from `player`'s point of view.
///
/// Maximizes on `player`'s moves and minimizes on everyone else's. Children
/// are visited in move order; a maximizing node stops at the first child
/// rated `>= beta`, a minimizing node at the first child rated `<= alpha`.
/// Leaves (finished or cut off) are scored by [`evaluate`].
pub fn rate(position: &Position, player: Player, alpha: i32, beta: i32, stats: &mut SearchStats) -> i32 {
    stats.rated += 1;

    if position.moves().is_empty() {
        return evaluate(position, player);
    }

    let maximizing = position.player() == player;
    let mut alpha = alpha;
    let mut beta = beta;

    if maximizing {
        let mut best = i32::MIN;
        for mv in position.moves() {
            let rating = rate(&mv.apply(), player, alpha, beta, stats);
            best = best.max(rating);
            if rating >= beta {
                stats.cutoffs += 1;
                break;
            }
            alpha = alpha.max(rating);
        }
        best
    } else {
        let mut best = i32::MAX;
        for mv in position.moves() {
            let rating = rate(&mv.apply(), player, alpha, beta, stats);
            best = best.min(rating);
            if rating <= alpha {
                stats.cutoffs += 1;
                break;
            }
            beta = beta.min(rating);
        }
        best
    }
}

/// Best move for the player to move, searching `config.depth` moves ahead.
///
/// Ties go to the earliest move in generation order.
/// Panics if the position has no moves.
pub fn choose_move<'a>(position: &'a Position, config: &SearchConfig) -> &'a Move {
    choose_move_with_stats(position, config).0
}

/// [`choose_move`] plus the work it took
pub fn choose_move_with_stats<'a>(position: &'a Position, config: &SearchConfig) -> (&'a Move, SearchStats) {
    assert!(
        !position.moves().is_empty(),
        "choose_move called on a position with no moves"
    );
    assert!(config.depth >= 1, "search depth must be at least 1");

    let player = position.player();
    let view = limit_depth(position, config.depth);
    let mut stats = SearchStats {
        rated: 1,
        cutoffs: 0,
    };

    // The root maximizes with beta = +inf, so it never prunes. Raising alpha
    // only makes later siblings report an upper bound <= the best so far,
    // which can't beat it under strict comparison.
    let mut alpha = i32::MIN;
    let mut best_index = 0;
    let mut best_rating = i32::MIN;
    for (index, mv) in view.moves().iter().enumerate() {
        let rating = rate(&mv.apply(), player, alpha, i32::MAX, &mut stats);
        tracing::trace!("Move {} rated {}", mv, rating);
        if index == 0 || rating > best_rating {
            best_index = index;
            best_rating = rating;
        }
        alpha = alpha.max(rating);
    }

    let chosen = &position.moves()[best_index];
    tracing::debug!(
        "Player {} chose {} (rating {}, {} positions rated, {} cutoffs)",
        player,
        chosen,
        best_rating,
        stats.rated,
        stats.cutoffs
    );

    (chosen, stats)
}

// ============================================================================
// AI PLAYER
// ============================================================================

/// Computer player with a fixed lookahead
#[derive(Clone, Debug)]
pub struct AiPlayer {
    pub config: SearchConfig,
    stats: SearchStats,
}

impl AiPlayer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
        }
    }

    pub fn with_depth(depth: usize) -> Self {
        Self::new(SearchConfig { depth })
    }

    /// Best move, or `None` if the game is over
    pub fn best_move<'a>(&mut self, position: &'a Position) -> Option<&'a Move> {
        if position.moves().is_empty() {
            return None;
        }
        let (mv, stats) = choose_move_with_stats(position, &self.config);
        self.stats.add(stats);
        Some(mv)
    }

    /// Play every side until the game ends or `max_moves` moves were made
    pub fn play_game(&mut self, root: Rc<Position>, max_moves: usize) -> (Rc<Position>, Vec<MoveLabel>) {
        let mut position = root;
        let mut history = Vec::new();

        while history.len() < max_moves {
            let next = match self.best_move(&position) {
                Some(mv) => {
                    history.push(mv.label());
                    mv.apply()
                }
                None => break,
            };
            position = next;
        }

        (position, history)
    }

    /// Totals over every search this player has run
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

// ============================================================================
// TESTS
// ============================================================================
