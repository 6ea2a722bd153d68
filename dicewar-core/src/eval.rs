//! Position evaluation

use crate::board::{neighbors, Board, Player};
use crate::config::GameConfig;
use crate::game::Position;
use crate::winner::winners;

/// Own hex with no stronger enemy neighbor
pub const SAFE_HEX: i32 = 2;
/// Own hex next to an enemy stack with more dice
pub const THREATENED_HEX: i32 = 1;
/// Hex owned by anyone else
pub const ENEMY_HEX: i32 = -1;

/// Score for finishing among the winners (ties included)
pub const WIN_SCORE: i32 = 1;
pub const LOSS_SCORE: i32 = 0;

/// Heuristic score of `board` for `player`: each own hex counts
/// [`SAFE_HEX`] or [`THREATENED_HEX`], each other hex [`ENEMY_HEX`].
pub fn score_board(config: &GameConfig, board: &Board, player: Player) -> i32 {
    board
        .iter()
        .enumerate()
        .map(|(index, hex)| {
            if hex.owner != player {
                return ENEMY_HEX;
            }
            let threatened = neighbors(config, index).into_iter().any(|n| {
                let other = board[n];
                other.owner != player && other.dice > hex.dice
            });
            if threatened {
                THREATENED_HEX
            } else {
                SAFE_HEX
            }
        })
        .sum()
}

/// Score of a finished game for `player`
pub fn score_outcome(config: &GameConfig, board: &Board, player: Player) -> i32 {
    if winners(config, board).contains(&player) {
        WIN_SCORE
    } else {
        LOSS_SCORE
    }
}

/// Evaluate a leaf of the search for `player`.
///
/// Finished games are scored by outcome. Everything else, including
/// positions whose moves were cut off by a depth limit, gets the board
/// heuristic.
pub fn evaluate(position: &Position, player: Player) -> i32 {
    if position.is_terminal() {
        score_outcome(position.config(), position.board(), player)
    } else {
        score_board(position.config(), position.board(), player)
    }
}
