//! Match command - AI-vs-AI games on random boards
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: search_configs(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

use dicewar_core::{new_game, winners_of, AiPlayer, GameConfig, Player, SearchConfig, SearchStats};

use crate::{create_rng, BoardArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// AI search depth for every player
    #[arg(long, default_value = "3")]
    pub depth: usize,

    /// Per-player search depths, comma separated (overrides --depth)
    #[arg(long, value_delimiter = ',')]
    pub depths: Option<Vec<usize>>,

    /// Stop a game after this many moves
    #[arg(long, default_value = "1000")]
    pub max_moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    /// `None` if the move cap ended the game
    winners: Option<Vec<Player>>,
    moves: usize,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    /// Games won per player; a tie counts for every tied player
    wins: Vec<usize>,
    ties: usize,
    unfinished: usize,
    avg_moves: f32,
    /// How often each winner set occurred
    outcomes: FxHashMap<Vec<Player>, usize>,
    search: Vec<SearchStats>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve board and per-player search settings
/// 2. Play the games
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = args.board.game_config()?;
    let searches = search_configs(&args, config.players)?;

    tracing::info!(
        "Starting match: {} games on {}x{}, depths {:?}",
        args.games,
        config.width,
        config.height,
        searches.iter().map(|s| s.depth).collect::<Vec<_>>()
    );

    let results = play_match(config, &searches, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// One search config per player
fn search_configs(args: &MatchArgs, players: u8) -> Result<Vec<SearchConfig>> {
    let depths = match &args.depths {
        Some(depths) => {
            if depths.len() != players as usize {
                bail!(
                    "--depths lists {} values for {} players",
                    depths.len(),
                    players
                );
            }
            depths.clone()
        }
        None => vec![args.depth; players as usize],
    };

    depths
        .into_iter()
        .enumerate()
        .map(|(id, depth)| {
            SearchConfig::new(depth).with_context(|| format!("Invalid depth for player {}", id))
        })
        .collect()
}

/// Play all games in the match
fn play_match(
    config: GameConfig,
    searches: &[SearchConfig],
    args: &MatchArgs,
    seed: Option<u64>,
) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut ais: Vec<AiPlayer> = searches.iter().map(|&s| AiPlayer::new(s)).collect();
    let mut games = Vec::with_capacity(args.games);

    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(args.games as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} games")
                .context("Invalid progress template")?,
        );
        bar
    };

    for game_num in 0..args.games {
        let record = play_single_game(config, &mut ais, game_num + 1, args.max_moves, &mut rng);

        tracing::info!(
            "Game {}: {} ({} moves)",
            record.game_number,
            format_winners(record.winners.as_deref()),
            record.moves
        );

        games.push(record);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let search = ais.iter().map(AiPlayer::stats).collect();
    Ok(compute_match_statistics(games, config.players, search))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game on a fresh random board
fn play_single_game(
    config: GameConfig,
    ais: &mut [AiPlayer],
    game_number: usize,
    max_moves: usize,
    rng: &mut ChaCha8Rng,
) -> GameRecord {
    let mut position = new_game(config, rng);
    let mut moves = 0;

    while moves < max_moves {
        let ai = &mut ais[position.player().id()];
        let next = match ai.best_move(&position) {
            Some(mv) => mv.apply(),
            None => break,
        };
        position = next;
        moves += 1;
    }

    let winners = if position.moves().is_empty() {
        Some(winners_of(&position))
    } else {
        tracing::warn!("Game {} stopped after {} moves", game_number, moves);
        None
    };

    GameRecord {
        game_number,
        winners,
        moves,
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>, players: u8, search: Vec<SearchStats>) -> MatchResults {
    let mut wins = vec![0; players as usize];
    let mut ties = 0;
    let mut unfinished = 0;
    let mut outcomes: FxHashMap<Vec<Player>, usize> = FxHashMap::default();

    for game in &games {
        match &game.winners {
            Some(winners) => {
                for player in winners {
                    wins[player.id()] += 1;
                }
                if winners.len() > 1 {
                    ties += 1;
                }
                *outcomes.entry(winners.clone()).or_insert(0) += 1;
            }
            None => unfinished += 1,
        }
    }

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        wins,
        ties,
        unfinished,
        avg_moves,
        outcomes,
        search,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_winners(winners: Option<&[Player]>) -> String {
    match winners {
        None => "unfinished".to_string(),
        Some([single]) => format!("{} wins", single),
        Some(players) => {
            let names: Vec<String> = players.iter().map(Player::to_string).collect();
            format!("tie {}", names.join("+"))
        }
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Outcome counts, most frequent first
fn sorted_outcomes(results: &MatchResults) -> Vec<(String, usize)> {
    let mut outcomes: Vec<(String, usize)> = results
        .outcomes
        .iter()
        .map(|(winners, &count)| {
            let names: Vec<String> = winners.iter().map(Player::to_string).collect();
            (names.join("+"), count)
        })
        .collect();
    outcomes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    outcomes
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winners: Option<Vec<String>>,
        moves: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonPlayer {
        player: String,
        wins: usize,
        win_rate: f32,
        search: SearchStats,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        ties: usize,
        unfinished: usize,
        avg_moves: f32,
        players: Vec<JsonPlayer>,
        outcomes: Vec<(String, usize)>,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        ties: results.ties,
        unfinished: results.unfinished,
        avg_moves: results.avg_moves,
        players: results
            .wins
            .iter()
            .enumerate()
            .map(|(id, &wins)| JsonPlayer {
                player: Player(id as u8).to_string(),
                wins,
                win_rate: percent(wins, total) / 100.0,
                search: results.search.get(id).copied().unwrap_or_default(),
            })
            .collect(),
        outcomes: sorted_outcomes(results),
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winners: g
                    .winners
                    .as_ref()
                    .map(|w| w.iter().map(Player::to_string).collect()),
                moves: g.moves,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    for (id, &wins) in results.wins.iter().enumerate() {
        println!(
            "Player {} wins: {} ({:.1}%)",
            Player(id as u8),
            wins,
            percent(wins, total)
        );
    }
    println!("Ties:        {} ({:.1}%)", results.ties, percent(results.ties, total));
    if results.unfinished > 0 {
        println!("Unfinished:  {}", results.unfinished);
    }
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nOutcomes:");
    for (label, count) in sorted_outcomes(results) {
        println!("  {}: {}", label, count);
    }

    println!("\nSearch effort:");
    for (id, stats) in results.search.iter().enumerate() {
        println!(
            "  Player {}: {} positions rated, {} cutoffs",
            Player(id as u8),
            stats.rated,
            stats.cutoffs
        );
    }

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} moves",
            game.game_number,
            format_winners(game.winners.as_deref()),
            game.moves
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
