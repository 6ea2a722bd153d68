//! Game and search configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player ids are `u8` and named with a single letter.
pub const MAX_PLAYERS: u8 = 26;

/// Default AI lookahead (in moves, not turns)
pub const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Rejected host-supplied configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least 2 players are required, got {0}")]
    TooFewPlayers(u8),

    #[error("At most {max} players are supported, got {got}")]
    TooManyPlayers { got: u8, max: u8 },

    #[error("Maximum dice per hex must be at least 1")]
    NoDice,

    #[error("Board must have at least one hex, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    #[error("Search depth must be at least 1")]
    ZeroDepth,
}

/// Board dimensions and rule constants for one game.
///
/// Passed by value into every board and move-generation routine, so games
/// with different sizes can coexist in one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub players: u8,
    pub max_dice: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 2,
            height: 2,
            players: 2,
            max_dice: 3,
        }
    }
}

impl GameConfig {
    pub fn new(width: usize, height: usize, players: u8, max_dice: u8) -> Result<Self, ConfigError> {
        let config = Self {
            width,
            height,
            players,
            max_dice,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players < 2 {
            return Err(ConfigError::TooFewPlayers(self.players));
        }
        if self.players > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                got: self.players,
                max: MAX_PLAYERS,
            });
        }
        if self.max_dice < 1 {
            return Err(ConfigError::NoDice);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Load from a JSON file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse game config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Number of hexes on the board
    pub fn hex_count(&self) -> usize {
        self.width * self.height
    }

    /// Panic on an invalid configuration. Core entry points call this since
    /// an invalid config there is a host bug, not a user error.
    pub(crate) fn assert_valid(&self) {
        if let Err(e) = self.validate() {
            panic!("invalid game configuration {:?}: {}", self, e);
        }
    }
}

/// Search engine settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of moves to look ahead before falling back to the heuristic
    pub depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl SearchConfig {
    pub fn new(depth: usize) -> Result<Self, ConfigError> {
        if depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(Self { depth })
    }
}
