use serde::Serialize;

use crate::board::Square;
use crate::quiz::Difficulty;
use crate::types::Side;

use super::state::{GamePhase, GameState};

/// The part of a pending question the surface may show. The answer stays in
/// the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionPrompt {
    pub side: Side,
    pub square_kind: String,
    pub prompt: String,
    pub difficulty: Difficulty,
    pub question_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub position: u16,
    pub frozen_turns: u8,
}

/// Everything a render surface needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub side: u16,
    pub total_squares: u16,
    pub squares: Vec<Square>,
    pub player: TokenView,
    pub robot: TokenView,
    pub current_turn: Side,
    pub turn_label: String,
    pub dice: Option<u8>,
    pub status: String,
    pub question: Option<QuestionPrompt>,
    pub awaiting_answer: bool,
    pub winner: Option<Side>,
    pub turn: u32,
}

impl GameView {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            side: state.board.side(),
            total_squares: state.total_squares(),
            squares: state.board.squares().to_vec(),
            player: TokenView {
                position: state.player.position,
                frozen_turns: state.player.frozen_turns,
            },
            robot: TokenView {
                position: state.robot.position,
                frozen_turns: state.robot.frozen_turns,
            },
            current_turn: state.current_turn,
            turn_label: turn_label(state.phase).to_string(),
            dice: state.last_roll,
            status: state.status.clone(),
            question: state.pending_question.as_ref().map(|question| QuestionPrompt {
                side: question.side,
                square_kind: question.square.kind.label().to_string(),
                prompt: question.prompt.clone(),
                difficulty: question.difficulty,
                question_index: question.question_index,
            }),
            awaiting_answer: state.awaiting_answer,
            winner: state.winner(),
            turn: state.turn,
        }
    }
}

pub fn turn_label(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::PlayerTurn => "🎯 Your turn! Roll the dice.",
        GamePhase::PlayerAwaitingAnswer => "❓ Answer the question.",
        GamePhase::RobotTurn => "🤖 Robot's turn...",
        GamePhase::RobotAnswering => "🤖 Robot is answering...",
        GamePhase::GameOver {
            winner: Side::Player,
        } => "🏆 You won!",
        GamePhase::GameOver {
            winner: Side::Robot,
        } => "🤖 Robot won.",
    }
}
