//! Game outcome

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player};
use crate::config::GameConfig;
use crate::game::Position;

/// Players owning the most hexes, ascending. Never empty.
pub fn winners(config: &GameConfig, board: &Board) -> Vec<Player> {
    let mut tally = vec![0usize; config.players as usize];
    for hex in board.iter() {
        tally[hex.owner.id()] += 1;
    }

    let best = tally.iter().copied().max().unwrap_or(0);
    tally
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count == best)
        .map(|(id, _)| Player(id as u8))
        .collect()
}

/// Winners of a finished game.
///
/// Panics if the position still has moves.
pub fn winners_of(position: &Position) -> Vec<Player> {
    assert!(
        position.moves().is_empty(),
        "winners requested for a game still in progress"
    );
    winners(position.config(), position.board())
}

/// How a game ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Player),
    Tie(Vec<Player>),
}

impl Outcome {
    pub fn from_winners(winners: Vec<Player>) -> Self {
        match winners.as_slice() {
            [single] => Outcome::Winner(*single),
            _ => Outcome::Tie(winners),
        }
    }

    pub fn of(position: &Position) -> Self {
        Self::from_winners(winners_of(position))
    }

    pub fn winners(&self) -> &[Player] {
        match self {
            Outcome::Winner(player) => std::slice::from_ref(player),
            Outcome::Tie(players) => players,
        }
    }

    pub fn is_winner(&self, player: Player) -> bool {
        self.winners().contains(&player)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "The winner is {}", player),
            Outcome::Tie(players) => {
                let names: Vec<String> = players.iter().map(Player::to_string).collect();
                write!(f, "The game is a tie between {}", names.join(" and "))
            }
        }
    }
}
