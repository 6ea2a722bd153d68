//! Positions, moves and move generation
//!
//! A [`Position`] owns its full move list, built eagerly from a board scan.
//! The position each move leads to is a [`Subtree`] that is only computed
//! when the move is applied (see [`crate::tree`]).

use std::fmt;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{neighbors, Board, HexIndex, Player};
use crate::config::GameConfig;
use crate::tree::{Lazy, Subtree};

// ============================================================================
// MOVES
// ============================================================================

/// Source and destination of a move, for display.
/// Both are `None` for the passing move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveLabel {
    pub source: Option<HexIndex>,
    pub destination: Option<HexIndex>,
}

impl MoveLabel {
    pub const PASS: MoveLabel = MoveLabel {
        source: None,
        destination: None,
    };

    pub fn attack(source: HexIndex, destination: HexIndex) -> Self {
        Self {
            source: Some(source),
            destination: Some(destination),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.source.is_none() && self.destination.is_none()
    }
}

impl fmt::Display for MoveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source, self.destination) {
            (Some(s), Some(d)) => write!(f, "{} \u{2192} {}", s, d),
            _ => write!(f, "Pass"),
        }
    }
}

/// A legal move and the (lazily computed) position it leads to
pub struct Move {
    pub(crate) label: MoveLabel,
    pub(crate) next: Subtree,
}

impl Move {
    pub(crate) fn new(label: MoveLabel, next: Subtree) -> Self {
        Self { label, next }
    }

    pub fn label(&self) -> MoveLabel {
        self.label
    }

    pub fn source(&self) -> Option<HexIndex> {
        self.label.source
    }

    pub fn destination(&self) -> Option<HexIndex> {
        self.label.destination
    }

    pub fn is_pass(&self) -> bool {
        self.label.is_pass()
    }

    /// Position after this move. Computed on the first call, then cached:
    /// later calls return the same `Rc`.
    pub fn apply(&self) -> Rc<Position> {
        self.next.force()
    }

    /// Whether the resulting position has been computed yet
    pub fn is_applied(&self) -> bool {
        self.next.is_forced()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("source", &self.label.source)
            .field("destination", &self.label.destination)
            .field("applied", &self.is_applied())
            .finish()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label.fmt(f)
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// A node of the game tree: whose turn it is, the board, and every legal move.
///
/// Never mutated after construction.
#[derive(Debug)]
pub struct Position {
    pub(crate) config: GameConfig,
    pub(crate) player: Player,
    pub(crate) board: Board,
    pub(crate) moves: Vec<Move>,
    /// Moves were hidden by a depth-limited view, so an empty move list does
    /// not mean the game is over.
    pub(crate) cut_off: bool,
}

impl Position {
    /// Start of `player`'s turn on `board`
    pub fn with_player(config: GameConfig, board: Board, player: Player) -> Self {
        config.assert_valid();
        assert!(player.0 < config.players, "unknown player {}", player.0);
        Self::build(config, board, player, 0, true)
    }

    /// Start of player 0's turn on `board`
    pub fn root(config: GameConfig, board: Board) -> Self {
        Self::with_player(config, board, Player(0))
    }

    /// Middle of `player`'s turn, after attacks that captured `spare_dice`.
    /// Passing is allowed.
    pub fn continuing(config: GameConfig, board: Board, player: Player, spare_dice: u32) -> Self {
        config.assert_valid();
        assert!(player.0 < config.players, "unknown player {}", player.0);
        Self::build(config, board, player, spare_dice, false)
    }

    pub(crate) fn build(
        config: GameConfig,
        board: Board,
        player: Player,
        spare_dice: u32,
        first_move: bool,
    ) -> Self {
        let attacks = attacking_moves(config, &board, player, spare_dice);
        let moves = if first_move {
            attacks
        } else {
            let mut moves = Vec::with_capacity(attacks.len() + 1);
            moves.push(passing_move(config, &board, player, spare_dice));
            moves.extend(attacks);
            moves
        };

        Self {
            config,
            player,
            board,
            moves,
            cut_off: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Player to move
    pub fn player(&self) -> Player {
        self.player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Legal moves, in generation order: the passing move (if allowed) first,
    /// then attacks by ascending source and neighbor order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Apply the move at `index` in [`Position::moves`].
    ///
    /// Panics if `index` is out of range.
    pub fn apply(&self, index: usize) -> Rc<Position> {
        assert!(
            index < self.moves.len(),
            "move {} out of range ({} moves)",
            index,
            self.moves.len()
        );
        self.moves[index].apply()
    }

    /// No legal moves: the game is over
    pub fn is_terminal(&self) -> bool {
        self.moves.is_empty() && !self.cut_off
    }

    /// Moves hidden by a depth limit
    pub fn is_cut_off(&self) -> bool {
        self.cut_off
    }
}

// ============================================================================
// MOVE GENERATION
// ============================================================================

/// Every attack available to `player`: from an owned hex into an adjacent
/// enemy hex with strictly fewer dice.
///
/// The attacker keeps the turn and banks the captured dice.
fn attacking_moves(config: GameConfig, board: &Board, player: Player, spare_dice: u32) -> Vec<Move> {
    let mut moves = Vec::new();

    for (source, hex) in board.iter().enumerate() {
        if hex.owner != player {
            continue;
        }
        for destination in neighbors(&config, source) {
            let target = board[destination];
            if target.owner == player || target.dice >= hex.dice {
                continue;
            }

            let snapshot = board.clone();
            let spare = spare_dice + target.dice as u32;
            let next = Lazy::new(move || {
                Position::build(
                    config,
                    snapshot.resolve_attack(player, source, destination),
                    player,
                    spare,
                    false,
                )
            });
            moves.push(Move::new(MoveLabel::attack(source, destination), Rc::new(next)));
        }
    }

    moves
}

/// End of turn: replenish `player`'s hexes with one die fewer than were
/// captured this turn, then hand over to the next player.
fn passing_move(config: GameConfig, board: &Board, player: Player, spare_dice: u32) -> Move {
    let snapshot = board.clone();
    let budget = spare_dice as i32 - 1;
    let next = Lazy::new(move || {
        Position::build(
            config,
            snapshot.replenish(&config, player, budget),
            player.next(config.players),
            0,
            true,
        )
    });
    Move::new(MoveLabel::PASS, Rc::new(next))
}

// ============================================================================
// NEW GAME
// ============================================================================

/// New game on a random board, player 0 to move.
///
/// Panics on an invalid config; validate host input with
/// [`GameConfig::new`] first.
pub fn new_game<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Rc<Position> {
    config.assert_valid();
    let board = Board::random(&config, rng);
    tracing::debug!(
        "New {}x{} game: {} players, max {} dice",
        config.width,
        config.height,
        config.players,
        config.max_dice
    );
    Rc::new(Position::root(config, board))
}

/// New game from a reproducible seed
pub fn new_game_seeded(config: GameConfig, seed: u64) -> Rc<Position> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    new_game(config, &mut rng)
}

// ============================================================================
// TESTS
// ============================================================================
