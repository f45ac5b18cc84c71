#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod game;
pub mod players;
pub mod quiz;
pub mod settings;
pub mod types;

pub use board::{Board, BoardSize, Square};
pub use game::{Game, GameConfig, GameEvent, GamePhase, GameState, Intent, StepOutcome};
pub use quiz::{QuestionBank, QuestionProvider, QuizError};
pub use settings::GameSettings;
pub use types::{Side, SquareKind};
