//! Plain-text board rendering

use dicewar_core::{Board, GameConfig};

/// Draw the board as a parallelogram, one `[A3]` cell per hex.
///
/// Upper rows are indented further so each hex sits between the two it
/// touches in the row below.
pub fn render_board(config: &GameConfig, board: &Board) -> String {
    let mut out = String::new();
    for y in 0..config.height {
        out.push_str(&"  ".repeat(config.height - (y + 1)));
        for x in 0..config.width {
            let hex = board[y * config.width + x];
            out.push_str(&format!("[{}{}]", hex.owner, hex.dice));
        }
        out.push('\n');
    }
    out
}
