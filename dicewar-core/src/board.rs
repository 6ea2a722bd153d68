//! Board model: hex cells in a parallelogram layout
//!
//! Hexes are indexed row-major. Each row is shifted half a hex to the right
//! relative to the row below it:
//!
//! ```text
//!       _   _   _
//!      / \ / \ / \
//!     | 0 | 1 | 2 |
//!    / \ / \ / \ /
//!   | 3 | 4 | 5 |
//!  / \ / \ / \ /
//! | 6 | 7 | 8 |
//!  \_/ \_/ \_/
//! ```
//!
//! Boards are immutable. Attacks and replenishment build a new board and
//! leave the old one untouched, so every position in the game tree keeps a
//! valid board no matter what happens downstream.

use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Row-major index into a board
pub type HexIndex = usize;

// ============================================================================
// PLAYER
// ============================================================================

/// Player id in `[0, players)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Player(pub u8);

impl Player {
    pub fn id(self) -> usize {
        self.0 as usize
    }

    /// Next player in round-robin order
    pub fn next(self, players: u8) -> Player {
        Player((self.0 + 1) % players)
    }

    /// Display name: A, B, C, ...
    pub fn name(self) -> char {
        (b'A' + self.0) as char
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// HEX
// ============================================================================

/// One cell: an owner and a stack of dice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub owner: Player,
    pub dice: u8,
}

impl Hex {
    pub const fn new(owner: Player, dice: u8) -> Self {
        Self { owner, dice }
    }
}

// ============================================================================
// TOPOLOGY
// ============================================================================

/// Indices adjacent to `index`, in fixed candidate order:
/// up, down, then up-left and left (unless in the leftmost column), then
/// right and down-right (unless in the rightmost column).
///
/// Candidates outside the board are dropped.
pub fn neighbors(config: &GameConfig, index: HexIndex) -> Vec<HexIndex> {
    let width = config.width as isize;
    let count = config.hex_count() as isize;
    let pos = index as isize;

    let up = pos - width;
    let down = pos + width;

    let mut candidates = Vec::with_capacity(6);
    candidates.push(up);
    candidates.push(down);

    if pos % width != 0 {
        candidates.push(up - 1);
        candidates.push(pos - 1);
    }

    if (pos + 1) % width != 0 {
        candidates.push(pos + 1);
        candidates.push(down + 1);
    }

    candidates
        .into_iter()
        .filter(|&p| 0 <= p && p < count)
        .map(|p| p as HexIndex)
        .collect()
}

// ============================================================================
// BOARD
// ============================================================================

/// Immutable board snapshot. Cloning is cheap (shared cells).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: Rc<[Hex]>,
}

impl Board {
    /// Build a board from explicit cells.
    ///
    /// Panics if the cell count does not match the config or a cell breaks
    /// the owner/dice ranges.
    pub fn from_cells(config: &GameConfig, cells: Vec<Hex>) -> Self {
        assert_eq!(
            cells.len(),
            config.hex_count(),
            "board needs {}x{} hexes",
            config.width,
            config.height
        );
        for (i, hex) in cells.iter().enumerate() {
            assert!(
                hex.owner.0 < config.players,
                "hex {} owned by unknown player {}",
                i,
                hex.owner.0
            );
            assert!(
                (1..=config.max_dice).contains(&hex.dice),
                "hex {} holds {} dice, expected 1..={}",
                i,
                hex.dice,
                config.max_dice
            );
        }
        Self { cells: cells.into() }
    }

    /// Random board: owner uniform over players, dice uniform over
    /// `1..=max_dice`, drawn cell by cell in index order.
    pub fn random<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let cells: Vec<Hex> = (0..config.hex_count())
            .map(|_| {
                let owner = Player(rng.gen_range(0..config.players));
                let dice = rng.gen_range(1..=config.max_dice);
                Hex::new(owner, dice)
            })
            .collect();
        Self { cells: cells.into() }
    }

    pub fn cells(&self) -> &[Hex] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hex> + '_ {
        self.cells.iter()
    }

    /// Sum of dice over all hexes
    pub fn total_dice(&self) -> u32 {
        self.cells.iter().map(|h| h.dice as u32).sum()
    }

    /// Number of hexes owned by `player`
    pub fn hex_count(&self, player: Player) -> usize {
        self.cells.iter().filter(|h| h.owner == player).count()
    }

    /// Board after `attacker` moves all but one die from `source` into
    /// `destination`, capturing it.
    ///
    /// Legality (adjacency, ownership, dice comparison) is the move
    /// generator's job and is not re-checked here.
    pub fn resolve_attack(&self, attacker: Player, source: HexIndex, destination: HexIndex) -> Board {
        let moving = self.cells[source].dice;
        debug_assert!(moving >= 2, "attack from hex {} with {} dice", source, moving);

        let mut cells = self.cells.to_vec();
        cells[source] = Hex::new(attacker, 1);
        cells[destination] = Hex::new(attacker, moving - 1);
        Board { cells: cells.into() }
    }

    /// Board after adding one die to each of up to `budget` hexes owned by
    /// `player` that are below `max_dice`, scanning in index order.
    ///
    /// A zero or negative budget leaves the board unchanged.
    pub fn replenish(&self, config: &GameConfig, player: Player, budget: i32) -> Board {
        let mut remaining = budget;
        let cells: Vec<Hex> = self
            .cells
            .iter()
            .map(|&hex| {
                if remaining > 0 && hex.owner == player && hex.dice < config.max_dice {
                    remaining -= 1;
                    Hex::new(hex.owner, hex.dice + 1)
                } else {
                    hex
                }
            })
            .collect();
        Board { cells: cells.into() }
    }
}

impl Index<HexIndex> for Board {
    type Output = Hex;

    fn index(&self, index: HexIndex) -> &Hex {
        &self.cells[index]
    }
}
