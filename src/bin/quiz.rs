use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ultangber::quiz::starter::STARTER_SETS;
use ultangber::quiz::{
    NewQuestionSet, NewReport, QuestionBank, QuestionProvider, QuestionSetId, QuizError,
};

#[derive(Debug, Parser)]
#[command(name = "ultangber-quiz")]
#[command(about = "Manage the question sets used by the game")]
struct Args {
    /// Question bank JSON file
    #[arg(long, default_value = "question_bank.json")]
    bank: PathBuf,

    /// Seed for random question draws
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all question sets
    List,
    /// Print every question of a set
    Show {
        #[arg(long)]
        set: QuestionSetId,
    },
    /// Create a question set from a JSON file ({ title, subject, questions })
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Draw a random question from a set
    Random {
        #[arg(long)]
        set: QuestionSetId,
    },
    /// Report a problem with a question
    Report {
        #[arg(long)]
        set: QuestionSetId,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        reason: String,
    },
    /// Add the built-in starter sets to the bank
    Seed,
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
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), QuizError> {
    let mut bank = QuestionBank::open(&args.bank, args.seed)?;

    match args.command {
        Command::List => {
            let sets = bank.list_question_sets()?;
            if sets.is_empty() {
                println!("No question sets yet. Run `ultangber-quiz seed` to add the starter sets.");
            }
            for set in sets {
                println!(
                    "{}  {:<30} {:<15} {:>3} questions  (created {})",
                    set.id,
                    set.title,
                    set.subject,
                    set.question_count,
                    set.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Show { set } => {
            let record = bank.question_set(set).ok_or(QuizError::NotFound(set))?;
            println!("{} ({})", record.title, record.subject);
            for (idx, question) in record.questions.iter().enumerate() {
                println!(
                    "{:>3}. [{}] {} -> {}",
                    idx, question.difficulty, question.question, question.answer
                );
            }
        }
        Command::Create { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let input: NewQuestionSet = serde_json::from_str(&raw)?;
            let created = bank.create_question_set(input)?;
            println!(
                "Created \"{}\" with {} questions: {}",
                created.title,
                created.questions.len(),
                created.id
            );
        }
        Command::Random { set } => {
            let draw = bank.random_question(set)?;
            println!("#{} [{}] {}", draw.question_index, draw.difficulty, draw.question);
            println!("Answer: {}", draw.answer);
        }
        Command::Report { set, index, reason } => {
            let ack = bank.submit_report(NewReport {
                question_set_id: set,
                question_index: index,
                reason,
            })?;
            println!("{} ({})", ack.message, ack.report_id);
        }
        Command::Seed => {
            for input in STARTER_SETS.iter().cloned() {
                let created = bank.create_question_set(input)?;
                println!("Added \"{}\": {}", created.title, created.id);
            }
        }
    }

    Ok(())
}
