use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use tracing::{debug, warn};
use ultangber::board::BoardSize;
use ultangber::cli::{
    StatisticsAccumulator, create_player, game_seed, parse_accuracy, player_name,
    print_player_help,
};
use ultangber::game::{Game, GameConfig, Pacing};
use ultangber::quiz::{QuestionBank, QuestionProvider, QuestionSetId};
use ultangber::types::Side;

#[derive(Debug, Parser, Clone)]
#[command(name = "ultangber-sim")]
#[command(about = "Simulate many games between a simulated player and the robot")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Player code, with ':' for params (e.g. S or A:0.75)
    #[arg(long, default_value = "R")]
    player: String,

    /// Board size: 8, 10 or 12
    #[arg(long, default_value = "10")]
    size: BoardSize,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Question bank JSON file; built-in sets are used when omitted
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Probability that the robot answers correctly
    #[arg(long, default_value_t = 0.7, value_parser = parse_accuracy)]
    robot_accuracy: f64,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let parts: Vec<&str> = args.player.split(':').collect();
    let code = parts[0];
    let params = parts[1..].to_vec();
    if create_player(code, args.seed, params.clone()).is_none() {
        eprintln!("Error: Unknown player code '{}'", args.player);
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    }

    let bank = match &args.bank {
        Some(path) => QuestionBank::open(path, args.seed).unwrap_or_else(|err| {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }),
        None => QuestionBank::with_starter_sets(args.seed),
    };

    let set_id = bank
        .list_question_sets()
        .ok()
        .and_then(|sets| sets.into_iter().find(|set| set.question_count > 0))
        .map(|set| set.id)
        .unwrap_or_else(|| {
            eprintln!("Error: the question bank has no usable question set");
            std::process::exit(1);
        });

    let mut stats = StatisticsAccumulator::new();
    let setup = Setup {
        code: code.to_string(),
        params: params.iter().map(|s| s.to_string()).collect(),
        set_id,
        bank,
    };

    if args.workers > 1 {
        run_parallel_simulations(&args, &setup, &mut stats);
    } else {
        run_sequential_simulations(&args, &setup, &mut stats);
    }

    if !args.quiet {
        print_summary(&stats, code);
    }
}

#[derive(Clone)]
struct Setup {
    code: String,
    params: Vec<String>,
    set_id: QuestionSetId,
    bank: QuestionBank,
}

impl Setup {
    fn game_config(&self, args: &Args, game_idx: u64) -> GameConfig {
        GameConfig {
            board_size: args.size,
            question_set_id: self.set_id,
            seed: game_seed(args.seed, game_idx),
            robot_accuracy: args.robot_accuracy,
            pacing: Pacing::instant(),
        }
    }

    /// Plays one game to completion and returns it with its wall time.
    fn run_game(
        &self,
        args: &Args,
        game_idx: u64,
    ) -> Option<(Game<QuestionBank>, std::time::Duration)> {
        let params: Vec<&str> = self.params.iter().map(String::as_str).collect();
        let mut player = create_player(&self.code, game_seed(args.seed, game_idx), params)?;
        let config = self.game_config(args, game_idx);

        let start = Instant::now();
        let mut game = match Game::new(config, self.bank.clone()) {
            Ok(game) => game,
            Err(err) => {
                warn!(%err, game_idx, "game could not start");
                return None;
            }
        };
        game.play(&mut player);
        let duration = start.elapsed();
        debug!(game_idx, winner = ?game.winner(), turns = game.state.turn, "game finished");
        Some((game, duration))
    }
}

fn run_sequential_simulations(args: &Args, setup: &Setup, stats: &mut StatisticsAccumulator) {
    for game_idx in 0..args.num {
        let Some((game, duration)) = setup.run_game(args, game_idx as u64) else {
            continue;
        };
        stats.after(&game, duration);

        if !args.quiet {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                let winner_str = match game.winner() {
                    Some(Side::Player) => "Player",
                    Some(Side::Robot) => "Robot",
                    None => "None",
                };
                println!(
                    "Game {:>4}: Winner={:>6}, Player={:>3}, Robot={:>3}, Turns={:>4}, Duration={:?}",
                    game_idx + 1,
                    winner_str,
                    game.state.player.position,
                    game.state.robot.position,
                    game.state.turn,
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn run_parallel_simulations(args: &Args, setup: &Setup, stats: &mut StatisticsAccumulator) {
    let setup = Arc::new(setup.clone());
    let args = Arc::new(args.clone());

    let mut handles = Vec::new();
    let games_per_worker = args.num as usize / args.workers;
    let remainder = args.num as usize % args.workers;

    for worker_id in 0..args.workers {
        let setup = Arc::clone(&setup);
        let args = Arc::clone(&args);
        let num_games = if worker_id < remainder {
            games_per_worker + 1
        } else {
            games_per_worker
        };

        let handle = thread::spawn(move || {
            let mut local_stats = StatisticsAccumulator::new();
            let start_idx = worker_id * games_per_worker + worker_id.min(remainder);

            for local_idx in 0..num_games {
                let game_idx = (start_idx + local_idx) as u64;
                if let Some((game, duration)) = setup.run_game(&args, game_idx) {
                    local_stats.after(&game, duration);
                }
            }

            local_stats
        });

        handles.push(handle);
    }

    for handle in handles {
        match handle.join() {
            Ok(worker_stats) => stats.stats.merge(worker_stats.stats),
            Err(_) => warn!("simulation worker panicked; its games are missing from the summary"),
        }
    }
}

fn print_summary(stats: &StatisticsAccumulator, code: &str) {
    let stats = &stats.stats;
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nSide Summary:");
    println!(
        "{:<25} {:<10} {:<12} {:<12} {:<12}",
        "Side", "Wins", "Win Rate", "Accuracy", "Avg Final"
    );
    println!("{}", "-".repeat(75));

    for side in Side::ORDERED {
        let label = match side {
            Side::Player => format!("Player ({})", player_name(code)),
            Side::Robot => "Robot".to_string(),
        };
        let wins = stats.wins.get(&side).copied().unwrap_or(0);
        let accuracy = stats
            .accuracy(side)
            .map(|acc| format!("{:.1}%", acc * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let avg_final = stats
            .final_positions
            .get(&side)
            .filter(|positions| !positions.is_empty())
            .map(|positions| {
                positions.iter().map(|&p| p as f64).sum::<f64>() / positions.len() as f64
            })
            .unwrap_or(0.0);

        println!(
            "{:<25} {:<10} {:<11.1}% {:<12} {:<12.2}",
            label,
            wins,
            stats.win_rate(side) * 100.0,
            accuracy,
            avg_final
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Unfinished: {}", stats.unfinished);
    println!("  Avg Turns: {:.2}", stats.get_avg_turns());
    println!("  Avg Duration: {:.2?}", stats.get_avg_duration());
}
