use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use ultangber::cli::{TuiApp, display_board, parse_accuracy};
use ultangber::game::{Game, GameConfig};
use ultangber::quiz::{QuestionBank, QuestionProvider, QuestionSetSummary};
use ultangber::settings::{GameSettings, parse_hex_color};
use ultangber::board::BoardSize;
use ultangber::types::Side;

#[derive(Debug, Parser, Clone)]
#[command(name = "ultangber-play")]
#[command(about = "Play snakes and ladders with quiz questions against the robot")]
struct Args {
    /// Saved game settings (JSON with size, questionSetId, playerColor)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Board size: 8, 10 or 12
    #[arg(long)]
    size: Option<BoardSize>,

    /// Question set id or title
    #[arg(long)]
    set: Option<String>,

    /// Token colour as #rrggbb
    #[arg(long)]
    color: Option<String>,

    /// Random seed for the board, dice and robot
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Question bank JSON file; built-in sets are used when omitted
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Probability that the robot answers correctly
    #[arg(long, default_value_t = 0.7, value_parser = parse_accuracy)]
    robot_accuracy: f64,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// List question sets and exit
    #[arg(long)]
    list_sets: bool,
}

fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(err) = init_logging(path) {
            eprintln!("Error: cannot open log file {}: {err}", path.display());
            std::process::exit(1);
        }
    }

    let bank = match &args.bank {
        Some(path) => QuestionBank::open(path, args.seed).unwrap_or_else(|err| {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }),
        None => QuestionBank::with_starter_sets(args.seed),
    };

    let sets = bank.list_question_sets().unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });

    if args.list_sets {
        print_sets(&sets);
        return;
    }

    let mut settings = match &args.settings {
        Some(path) => GameSettings::load(path).unwrap_or_else(|err| {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }),
        None => GameSettings::default(),
    };
    if let Some(size) = args.size {
        settings.size = size;
    }
    if let Some(color) = &args.color {
        settings.player_color = color.clone();
    }

    let question_set = match resolve_set(&sets, args.set.as_deref(), &settings) {
        Some(set) => set,
        None => {
            eprintln!("Error: no usable question set. Create one with ultangber-quiz or pass --set.");
            eprintln!("Use --list-sets to see available sets");
            std::process::exit(1);
        }
    };

    let player_rgb = parse_hex_color(&settings.player_color).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });

    let config = GameConfig {
        board_size: settings.size,
        question_set_id: question_set.id,
        seed: args.seed,
        robot_accuracy: args.robot_accuracy,
        ..GameConfig::default()
    };

    let game = Game::new(config, bank).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });
    info!(game = %game.id, set = %question_set.title, "game created");

    let mut app = TuiApp::new(game, player_rgb);
    let result = app.run();
    let game = app.into_game();

    match result {
        Ok(winner) => {
            println!("{}", "=".repeat(80));
            match winner {
                Some(Side::Player) => println!("🎉 YOU WIN! 🎉"),
                Some(Side::Robot) => println!("🤖 Robot wins. Better luck next time!"),
                None => println!("Game abandoned after {} turns.", game.state.turn),
            }
            println!("{}", "=".repeat(80));
            display_board(&game.state);
            println!(
                "You: {}  Robot: {}  Turns: {}",
                game.state.player.position, game.state.robot.position, game.state.turn
            );
        }
        Err(err) => {
            eprintln!("Error: terminal failure: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let log_file = std::fs::File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Picks the set named on the command line, then the saved one, then the
/// first non-empty set.
fn resolve_set<'a>(
    sets: &'a [QuestionSetSummary],
    requested: Option<&str>,
    settings: &GameSettings,
) -> Option<&'a QuestionSetSummary> {
    if let Some(requested) = requested {
        return sets.iter().find(|set| {
            set.id.to_string() == requested || set.title.eq_ignore_ascii_case(requested)
        });
    }
    if let Some(id) = settings.question_set_id {
        return sets.iter().find(|set| set.id == id);
    }
    sets.iter().find(|set| set.question_count > 0)
}

fn print_sets(sets: &[QuestionSetSummary]) {
    if sets.is_empty() {
        println!("No question sets yet.");
        return;
    }
    println!("{:<38} {:<30} {:<15} {}", "ID", "TITLE", "SUBJECT", "QUESTIONS");
    println!("{}", "-".repeat(95));
    for set in sets {
        println!(
            "{:<38} {:<30} {:<15} {}",
            set.id, set.title, set.subject, set.question_count
        );
    }
}
