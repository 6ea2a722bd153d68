//! Play command - one game at the terminal
//!
//! Human players pick moves by number from stdin; everyone else is played
//! by the alpha-beta AI.

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Args;

use dicewar_core::{choose_move, new_game, Outcome, Player, Position, SearchConfig};

use crate::render::render_board;
use crate::{create_rng, BoardArgs};

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// AI search depth, in moves
    #[arg(long, default_value = "4")]
    pub depth: usize,

    /// Player id controlled from the terminal (repeatable)
    #[arg(long, default_value = "0")]
    pub human: Vec<u8>,

    /// Let the AI play every side
    #[arg(long)]
    pub watch: bool,
}

/// Who picks moves for a player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    Human,
    Computer,
}

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = args.board.game_config()?;
    let search = SearchConfig::new(args.depth).context("Invalid --depth")?;

    for &id in &args.human {
        if id >= config.players {
            bail!("--human {} is not a player in a {}-player game", id, config.players);
        }
    }
    let controllers: Vec<Controller> = (0..config.players)
        .map(|id| {
            if !args.watch && args.human.contains(&id) {
                Controller::Human
            } else {
                Controller::Computer
            }
        })
        .collect();

    tracing::info!(
        "Starting {}x{} game: {} players, max {} dice, AI depth {}",
        config.width,
        config.height,
        config.players,
        config.max_dice,
        search.depth
    );

    let mut rng = create_rng(seed);
    let root = new_game(config, &mut rng);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    run_game(root, &controllers, &search, &mut input, &mut output)?;

    Ok(())
}

/// Drive a game from `root` until no moves remain
pub fn run_game<R: BufRead, W: Write>(
    root: Rc<Position>,
    controllers: &[Controller],
    search: &SearchConfig,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    let mut position = root;

    loop {
        writeln!(out, "{}", render_board(position.config(), position.board()))?;
        writeln!(out, "Current player: {}", position.player())?;

        if position.moves().is_empty() {
            let outcome = Outcome::of(&position);
            writeln!(out, "{}", outcome)?;
            return Ok(outcome);
        }

        let next = match controller_for(controllers, position.player()) {
            Controller::Human => {
                let index = prompt_move(&position, input, out)?;
                position.apply(index)
            }
            Controller::Computer => {
                let mv = choose_move(&position, search);
                writeln!(out, "Player {} plays {}", position.player(), mv)?;
                mv.apply()
            }
        };
        position = next;
    }
}

fn controller_for(controllers: &[Controller], player: Player) -> Controller {
    controllers
        .get(player.id())
        .copied()
        .unwrap_or(Controller::Computer)
}

/// List the moves and read a choice, re-prompting on bad input
fn prompt_move<R: BufRead, W: Write>(position: &Position, input: &mut R, out: &mut W) -> Result<usize> {
    let count = position.moves().len();
    writeln!(out, "Choose your move:")?;
    for (i, mv) in position.moves().iter().enumerate() {
        writeln!(out, "{}: {}", i + 1, mv)?;
    }

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read move")?;
        if read == 0 {
            bail!("Input closed before the game ended");
        }

        match parse_choice(&line, count) {
            Some(index) => return Ok(index),
            None => writeln!(out, "Enter a number from 1 to {}", count)?,
        }
    }
}

/// 1-based menu choice to move index
fn parse_choice(line: &str, count: usize) -> Option<usize> {
    let n: usize = line.trim().parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}
