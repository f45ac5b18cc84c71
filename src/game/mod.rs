pub mod effects;
pub mod game;
pub mod movement;
pub mod state;
pub mod token;
pub mod view;

pub use effects::{FREEZE_TURNS_CORRECT, FREEZE_TURNS_WRONG, apply_correct, apply_wrong};
pub use game::{Game, Intent};
pub use movement::move_token;
pub use state::{
    DIE_FACES, GameConfig, GameError, GameEvent, GamePhase, GameState, Pacing, PendingQuestion,
    Scheduled, StepOutcome, Transition,
};
pub use token::TokenState;
pub use view::{GameView, QuestionPrompt};
