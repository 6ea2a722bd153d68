//! DICEWAR Core - Game engine and AI
//!
//! This crate provides the core game logic for a two-or-more player dice
//! battle on a small hex board:
//! - Board model (parallelogram hex grid, immutable boards)
//! - Move generation (attacks and the end-of-turn pass)
//! - Lazy game tree (successor positions computed on demand)
//! - Static evaluation and outcome resolution
//! - Minimax AI with alpha-beta pruning
//!
//! A host drives a game with [`new_game`], [`Position::moves`],
//! [`Move::label`], [`Move::apply`], [`choose_move`] for computer players
//! and [`winners_of`] once a position has no moves left.

pub mod board;
pub mod config;
pub mod game;
pub mod tree;
pub mod eval;
pub mod ai;
pub mod winner;

// Re-exports for convenient access
pub use board::{neighbors, Board, Hex, HexIndex, Player};
pub use config::{ConfigError, GameConfig, SearchConfig, DEFAULT_SEARCH_DEPTH, MAX_PLAYERS};
pub use game::{new_game, new_game_seeded, Move, MoveLabel, Position};
pub use tree::{limit_depth, Lazy, Subtree};
pub use eval::{evaluate, score_board, score_outcome};
pub use ai::{choose_move, choose_move_with_stats, rate, AiPlayer, SearchStats};
pub use winner::{winners, winners_of, Outcome};
