//! DICEWAR CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game at the terminal against the AI (or watch it)
//! - match: Run AI-vs-AI games and report results

mod match_cmd;
mod play;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use dicewar_core::GameConfig;

#[derive(Parser)]
#[command(name = "dicewar")]
#[command(about = "Dice battles on a hex board against an alpha-beta AI")]
struct Cli {
    /// Random seed for board generation (default: entropy)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log search details
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play::PlayArgs),
    /// Play AI-vs-AI games and report results
    Match(match_cmd::MatchArgs),
}

/// Board settings shared by every command
#[derive(Args, Clone, Debug)]
pub struct BoardArgs {
    /// Board width in hexes
    #[arg(long, default_value = "2")]
    pub width: usize,

    /// Board height in hexes
    #[arg(long, default_value = "2")]
    pub height: usize,

    /// Number of players
    #[arg(long, default_value = "2")]
    pub players: u8,

    /// Maximum dice per hex
    #[arg(long, default_value = "3")]
    pub max_dice: u8,

    /// JSON game config (overrides the flags above)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl BoardArgs {
    pub fn game_config(&self) -> Result<GameConfig> {
        match &self.config {
            Some(path) => GameConfig::load(path),
            None => GameConfig::new(self.width, self.height, self.players, self.max_dice)
                .context("Invalid board settings"),
        }
    }
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_cli_parses_match() {
        let cli = Cli::try_parse_from([
            "dicewar", "--seed", "3", "match", "--width", "3", "--games", "4", "--depths", "1,2",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(3));
        match cli.command {
            Commands::Match(args) => {
                assert_eq!(args.board.width, 3);
                assert_eq!(args.games, 4);
                assert_eq!(args.depths, Some(vec![1, 2]));
            }
            Commands::Play(_) => panic!("expected match"),
        }
    }

    #[test]
    fn test_board_args_validate() {
        let args = BoardArgs {
            width: 2,
            height: 2,
            players: 1,
            max_dice: 3,
            config: None,
        };
        assert!(args.game_config().is_err());
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
