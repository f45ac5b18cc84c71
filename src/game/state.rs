use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::board::{Board, BoardSize, Square};
use crate::players::{DEFAULT_ROBOT_ACCURACY, RobotBrain};
use crate::quiz::{Difficulty, NewReport, QuestionProvider, QuestionSetId, RandomQuestion};
use crate::types::{Side, SquareKind};

use super::effects::{apply_correct, apply_wrong};
use super::movement::move_token;
use super::token::TokenState;

pub const DIE_FACES: u8 = 6;
const ROBOT_PREVIEW_CHARS: usize = 40;

/// Presentation delays between transitions. The state machine never waits on
/// these itself; it only tells the caller how long to hold off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub turn_switch_ms: u64,
    pub after_answer_ms: u64,
    pub skip_notice_ms: u64,
    pub robot_think_ms: u64,
    pub robot_answer_ms: u64,
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            turn_switch_ms: 0,
            after_answer_ms: 0,
            skip_notice_ms: 0,
            robot_think_ms: 0,
            robot_answer_ms: 0,
        }
    }

    pub fn turn_switch(&self) -> Duration {
        Duration::from_millis(self.turn_switch_ms)
    }

    pub fn after_answer(&self) -> Duration {
        Duration::from_millis(self.after_answer_ms)
    }

    pub fn skip_notice(&self) -> Duration {
        Duration::from_millis(self.skip_notice_ms)
    }

    pub fn robot_think(&self) -> Duration {
        Duration::from_millis(self.robot_think_ms)
    }

    pub fn robot_answer(&self) -> Duration {
        Duration::from_millis(self.robot_answer_ms)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            turn_switch_ms: 500,
            after_answer_ms: 1200,
            skip_notice_ms: 1500,
            robot_think_ms: 900,
            robot_answer_ms: 1200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub board_size: BoardSize,
    pub question_set_id: QuestionSetId,
    pub seed: u64,
    pub robot_accuracy: f64,
    pub pacing: Pacing,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BoardSize::Ten,
            question_set_id: Uuid::nil(),
            seed: 42,
            robot_accuracy: DEFAULT_ROBOT_ACCURACY,
            pacing: Pacing::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    PlayerTurn,
    PlayerAwaitingAnswer,
    RobotTurn,
    RobotAnswering,
    GameOver { winner: Side },
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::GameOver { .. })
    }

    /// Whether the next transition needs no outside input.
    pub fn is_autonomous(&self) -> bool {
        matches!(self, GamePhase::RobotTurn | GamePhase::RobotAnswering)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::PlayerTurn => write!(f, "waiting for the player's roll"),
            GamePhase::PlayerAwaitingAnswer => write!(f, "waiting for the player's answer"),
            GamePhase::RobotTurn => write!(f, "the robot is playing"),
            GamePhase::RobotAnswering => write!(f, "the robot is answering"),
            GamePhase::GameOver { winner } => write!(f, "the game is over ({winner} won)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingQuestion {
    pub side: Side,
    pub square: Square,
    pub question_set_id: QuestionSetId,
    pub question_index: usize,
    pub prompt: String,
    pub correct_answer: String,
    pub difficulty: Difficulty,
}

impl PendingQuestion {
    fn from_draw(side: Side, square: Square, draw: RandomQuestion) -> Self {
        Self {
            side,
            square,
            question_set_id: draw.question_set_id,
            question_index: draw.question_index,
            prompt: draw.question,
            correct_answer: draw.answer,
            difficulty: draw.difficulty,
        }
    }

    /// Case-insensitive comparison after trimming both sides.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim().to_lowercase() == self.correct_answer.trim().to_lowercase()
    }

    fn preview(&self) -> String {
        match self.side {
            Side::Player => self.prompt.clone(),
            Side::Robot => self.prompt.chars().take(ROBOT_PREVIEW_CHARS).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transition {
    RobotTurn,
    RobotAnswer,
}

/// The next autonomous transition and how long the caller should wait
/// before triggering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scheduled {
    pub transition: Transition,
    pub after: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    DiceRolled {
        side: Side,
        value: u8,
    },
    Moved {
        side: Side,
        from: u16,
        to: u16,
    },
    Overshot {
        side: Side,
        roll: u8,
        position: u16,
    },
    TurnSkipped {
        side: Side,
        frozen_turns_left: u8,
    },
    LandedOnSpecial {
        side: Side,
        kind: SquareKind,
        number: u16,
        value: i16,
    },
    QuestionAsked {
        side: Side,
        preview: String,
        difficulty: Difficulty,
    },
    QuestionUnavailable {
        side: Side,
        reason: String,
    },
    Answered {
        side: Side,
        correct: bool,
    },
    EffectApplied {
        side: Side,
        kind: SquareKind,
        correct: bool,
        from: u16,
        to: u16,
    },
    Frozen {
        side: Side,
        turns: u8,
    },
    ReportSubmitted {
        message: String,
    },
    ReportRejected {
        reason: String,
    },
    TurnPassed {
        next: Side,
    },
    GameWon {
        winner: Side,
    },
}

fn who(side: Side) -> &'static str {
    match side {
        Side::Player => "You",
        Side::Robot => "Robot",
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::DiceRolled { side, value } => match side {
                Side::Player => write!(f, "You rolled a {value}!"),
                Side::Robot => write!(f, "Robot rolled a {value}!"),
            },
            GameEvent::Moved { side, from, to } => {
                write!(f, "{} moved from {from} to {to}.", who(*side))
            }
            GameEvent::Overshot {
                side,
                roll,
                position,
            } => write!(
                f,
                "{} rolled {roll} but must land exactly on the last square. Staying on {position}.",
                who(*side)
            ),
            GameEvent::TurnSkipped { side, .. } => match side {
                Side::Player => write!(f, "🧊 You are frozen! Turn skipped."),
                Side::Robot => write!(f, "🧊 Robot is frozen! Turn skipped."),
            },
            GameEvent::LandedOnSpecial { side, kind, .. } => match side {
                Side::Player => write!(f, "You landed on a {} square!", kind.label()),
                Side::Robot => write!(f, "🤖 Robot landed on a {} square!", kind.label()),
            },
            GameEvent::QuestionAsked {
                side,
                preview,
                difficulty,
            } => match side {
                Side::Player => write!(f, "❓ {preview} ({difficulty})"),
                Side::Robot => write!(f, "🤖 Robot is answering: \"{preview}...\""),
            },
            GameEvent::QuestionUnavailable { side, .. } => match side {
                Side::Player => write!(f, "⚠️ Could not load question. Skip."),
                Side::Robot => write!(f, "⚠️ Robot skipped due to error."),
            },
            GameEvent::Answered { side, correct } => match (side, correct) {
                (Side::Player, true) => write!(f, "✅ Correct! Square effect applied."),
                (Side::Player, false) => write!(f, "❌ Wrong answer."),
                (Side::Robot, true) => write!(f, "🤖 Robot answered correctly!"),
                (Side::Robot, false) => write!(f, "🤖 Robot answered wrong."),
            },
            GameEvent::EffectApplied {
                side,
                kind,
                correct,
                from,
                to,
            } => {
                if *correct {
                    let delta = *to as i32 - *from as i32;
                    return write!(f, "{} moved {delta:+} squares to {to}.", who(*side));
                }
                match kind {
                    SquareKind::Snake => write!(f, "❌ Wrong! The snake spares you... for now."),
                    SquareKind::Ladder => write!(f, "❌ Wrong! The ladder collapsed. Move back."),
                    SquareKind::Bonus => write!(f, "❌ Wrong! No bonus for you."),
                    SquareKind::Penalty => write!(f, "❌ Wrong! Double penalty applied."),
                    SquareKind::Freeze | SquareKind::Normal => {
                        write!(f, "{} stays on {to}.", who(*side))
                    }
                }
            }
            GameEvent::Frozen { side, turns } => match (side, turns) {
                (Side::Player, 1) => write!(f, "🧊 You are frozen! Skip next turn."),
                (Side::Robot, 1) => write!(f, "🧊 Robot is frozen next turn."),
                (Side::Player, n) => write!(f, "❌ Wrong! Frozen for {n} turns!"),
                (Side::Robot, n) => write!(f, "❌ Wrong! Robot is frozen for {n} turns!"),
            },
            GameEvent::ReportSubmitted { message } => write!(f, "✅ {message}"),
            GameEvent::ReportRejected { reason } => {
                write!(f, "❌ Failed to submit report: {reason}")
            }
            GameEvent::TurnPassed { next } => match next {
                Side::Player => write!(f, "🎯 Your turn! Roll the dice."),
                Side::Robot => write!(f, "🤖 Robot's turn..."),
            },
            GameEvent::GameWon { winner } => match winner {
                Side::Player => write!(f, "🎉 You win!"),
                Side::Robot => write!(f, "🤖 Robot wins. Better luck next time!"),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
    pub next: Option<Scheduled>,
    pub done: bool,
}

impl StepOutcome {
    pub fn contains(&self, predicate: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game already completed")]
    GameFinished,
    #[error("action not allowed while {phase}")]
    OutOfTurn { phase: GamePhase },
    #[error("answer cannot be empty")]
    EmptyAnswer,
    #[error("no question is waiting for an answer")]
    NoPendingQuestion,
    #[error("the robot cannot move while the player is up")]
    AwaitingPlayer,
    #[error("cannot start game: {0}")]
    Setup(String),
}

/// Turn controller for one session. Every transition goes through a method on
/// this type; nothing else mutates it.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub board: Board,
    pub player: TokenState,
    pub robot: TokenState,
    pub phase: GamePhase,
    pub current_turn: Side,
    pub pending_question: Option<PendingQuestion>,
    pub awaiting_answer: bool,
    pub last_roll: Option<u8>,
    pub turn: u32,
    pub status: String,
    pub history: Vec<GameEvent>,
    robot_brain: RobotBrain,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let board = Board::generate_with_rng(config.board_size, &mut rng);
        Self::assemble(config, board, rng)
    }

    /// Starts a game on a prepared board instead of a generated one.
    pub fn with_board(config: GameConfig, board: Board) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::assemble(config, board, rng)
    }

    fn assemble(mut config: GameConfig, board: Board, rng: StdRng) -> Self {
        config.board_size = board.size();
        let mut player = TokenState::unplaced();
        let mut robot = TokenState::unplaced();
        player.place();
        robot.place();

        Self {
            robot_brain: RobotBrain::new(config.robot_accuracy),
            config,
            board,
            player,
            robot,
            phase: GamePhase::PlayerTurn,
            current_turn: Side::Player,
            pending_question: None,
            awaiting_answer: false,
            last_roll: None,
            turn: 0,
            status: GameEvent::TurnPassed { next: Side::Player }.to_string(),
            history: Vec::new(),
            rng,
        }
    }

    pub fn total_squares(&self) -> u16 {
        self.board.total_squares()
    }

    pub fn token(&self, side: Side) -> &TokenState {
        match side {
            Side::Player => &self.player,
            Side::Robot => &self.robot,
        }
    }

    pub fn token_mut(&mut self, side: Side) -> &mut TokenState {
        match side {
            Side::Player => &mut self.player,
            Side::Robot => &mut self.robot,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            GamePhase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn robot_brain(&self) -> RobotBrain {
        self.robot_brain
    }

    pub fn set_robot_brain(&mut self, brain: RobotBrain) {
        self.robot_brain = brain;
    }

    pub fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=DIE_FACES)
    }

    /// Player's roll intent.
    #[instrument(skip(self, provider), fields(turn = self.turn))]
    pub fn roll(&mut self, provider: &mut dyn QuestionProvider) -> Result<StepOutcome, GameError> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        if self.player.is_frozen() {
            return Ok(self.skip_frozen_turn(Side::Player));
        }
        let value = self.roll_die();
        Ok(self.play_roll(Side::Player, value, provider))
    }

    /// Player's roll with a die value chosen by the caller.
    pub fn roll_with(
        &mut self,
        value: u8,
        provider: &mut dyn QuestionProvider,
    ) -> Result<StepOutcome, GameError> {
        self.expect_phase(GamePhase::PlayerTurn)?;
        if self.player.is_frozen() {
            return Ok(self.skip_frozen_turn(Side::Player));
        }
        Ok(self.play_roll(Side::Player, value, provider))
    }

    #[instrument(skip(self, answer), fields(turn = self.turn))]
    pub fn submit_answer(&mut self, answer: &str) -> Result<StepOutcome, GameError> {
        self.expect_phase(GamePhase::PlayerAwaitingAnswer)?;
        if answer.trim().is_empty() {
            return Err(GameError::EmptyAnswer);
        }
        let question = self
            .pending_question
            .take()
            .ok_or(GameError::NoPendingQuestion)?;
        self.awaiting_answer = false;
        let correct = question.is_correct(answer);
        Ok(self.resolve_answer(question, correct))
    }

    /// Flags the question the player is looking at. The turn does not move.
    #[instrument(skip(self, reason, provider))]
    pub fn report(
        &mut self,
        reason: &str,
        provider: &mut dyn QuestionProvider,
    ) -> Result<StepOutcome, GameError> {
        if self.phase.is_over() {
            return Err(GameError::GameFinished);
        }
        let question = self
            .pending_question
            .as_ref()
            .filter(|question| self.awaiting_answer && question.side == Side::Player)
            .ok_or(GameError::NoPendingQuestion)?;

        let request = NewReport {
            question_set_id: question.question_set_id,
            question_index: question.question_index,
            reason: reason.to_string(),
        };
        let event = match provider.submit_report(request) {
            Ok(ack) => GameEvent::ReportSubmitted {
                message: ack.message,
            },
            Err(err) => {
                warn!(%err, "question report rejected");
                GameEvent::ReportRejected {
                    reason: err.to_string(),
                }
            }
        };

        let mut outcome = StepOutcome::default();
        outcome.events.push(event);
        Ok(self.finish(outcome))
    }

    /// Runs whichever robot transition is due.
    pub fn advance(&mut self, provider: &mut dyn QuestionProvider) -> Result<StepOutcome, GameError> {
        match self.phase {
            GamePhase::RobotTurn => self.robot_turn(provider),
            GamePhase::RobotAnswering => self.robot_answer(),
            GamePhase::GameOver { .. } => Err(GameError::GameFinished),
            GamePhase::PlayerTurn | GamePhase::PlayerAwaitingAnswer => {
                Err(GameError::AwaitingPlayer)
            }
        }
    }

    #[instrument(skip(self, provider), fields(turn = self.turn))]
    pub fn robot_turn(
        &mut self,
        provider: &mut dyn QuestionProvider,
    ) -> Result<StepOutcome, GameError> {
        self.expect_phase(GamePhase::RobotTurn)?;
        if self.robot.is_frozen() {
            return Ok(self.skip_frozen_turn(Side::Robot));
        }
        let value = self.roll_die();
        Ok(self.play_roll(Side::Robot, value, provider))
    }

    /// Robot's move with a step count chosen by the caller.
    pub fn robot_turn_with(
        &mut self,
        value: u8,
        provider: &mut dyn QuestionProvider,
    ) -> Result<StepOutcome, GameError> {
        self.expect_phase(GamePhase::RobotTurn)?;
        if self.robot.is_frozen() {
            return Ok(self.skip_frozen_turn(Side::Robot));
        }
        Ok(self.play_roll(Side::Robot, value, provider))
    }

    pub fn robot_answer(&mut self) -> Result<StepOutcome, GameError> {
        self.expect_phase(GamePhase::RobotAnswering)?;
        let question = self
            .pending_question
            .take()
            .ok_or(GameError::NoPendingQuestion)?;
        let brain = self.robot_brain;
        let correct = brain.answers_correctly(&mut self.rng);
        Ok(self.resolve_answer(question, correct))
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else if self.phase.is_over() {
            Err(GameError::GameFinished)
        } else {
            Err(GameError::OutOfTurn { phase: self.phase })
        }
    }

    fn skip_frozen_turn(&mut self, side: Side) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        self.turn += 1;
        self.last_roll = None;
        let frozen_turns_left = self.token_mut(side).thaw_one();
        debug!(?side, frozen_turns_left, "frozen turn skipped");
        outcome.events.push(GameEvent::TurnSkipped {
            side,
            frozen_turns_left,
        });
        self.pass_turn(side, self.config.pacing.skip_notice(), &mut outcome);
        self.finish(outcome)
    }

    fn play_roll(
        &mut self,
        side: Side,
        value: u8,
        provider: &mut dyn QuestionProvider,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        self.turn += 1;
        self.last_roll = Some(value);
        outcome.events.push(GameEvent::DiceRolled { side, value });

        let total = self.total_squares();
        let from = self.token(side).position;
        let to = move_token(from, value as u16, total);
        self.token_mut(side).position = to;
        if to == from && value > 0 {
            outcome.events.push(GameEvent::Overshot {
                side,
                roll: value,
                position: from,
            });
        } else {
            outcome.events.push(GameEvent::Moved { side, from, to });
        }

        if self.check_win(side, &mut outcome) {
            return self.finish(outcome);
        }

        let landed = self.board.square(to).filter(|square| square.is_special()).cloned();
        let Some(square) = landed else {
            self.pass_turn(side, self.config.pacing.turn_switch(), &mut outcome);
            return self.finish(outcome);
        };

        outcome.events.push(GameEvent::LandedOnSpecial {
            side,
            kind: square.kind,
            number: square.number,
            value: square.value,
        });

        match provider.random_question(self.config.question_set_id) {
            Ok(draw) => {
                let question = PendingQuestion::from_draw(side, square, draw);
                outcome.events.push(GameEvent::QuestionAsked {
                    side,
                    preview: question.preview(),
                    difficulty: question.difficulty,
                });
                self.pending_question = Some(question);
                match side {
                    Side::Player => {
                        self.awaiting_answer = true;
                        self.phase = GamePhase::PlayerAwaitingAnswer;
                    }
                    Side::Robot => {
                        self.phase = GamePhase::RobotAnswering;
                        outcome.next = Some(Scheduled {
                            transition: Transition::RobotAnswer,
                            after: self.config.pacing.robot_answer(),
                        });
                    }
                }
            }
            Err(err) => {
                warn!(%err, ?side, square = square.number, "no question available; square skipped");
                outcome.events.push(GameEvent::QuestionUnavailable {
                    side,
                    reason: err.to_string(),
                });
                self.pass_turn(side, self.config.pacing.skip_notice(), &mut outcome);
            }
        }

        self.finish(outcome)
    }

    fn resolve_answer(&mut self, question: PendingQuestion, correct: bool) -> StepOutcome {
        let side = question.side;
        let square = &question.square;
        let total = self.total_squares();
        let mut outcome = StepOutcome::default();
        outcome.events.push(GameEvent::Answered { side, correct });

        let before = *self.token(side);
        let after = if correct {
            apply_correct(before, square, total)
        } else {
            apply_wrong(before, square, total)
        };
        *self.token_mut(side) = after;

        if square.kind == SquareKind::Freeze {
            outcome.events.push(GameEvent::Frozen {
                side,
                turns: after.frozen_turns,
            });
        } else {
            outcome.events.push(GameEvent::EffectApplied {
                side,
                kind: square.kind,
                correct,
                from: before.position,
                to: after.position,
            });
        }

        if !self.check_win(side, &mut outcome) {
            let pause = match side {
                Side::Player => self.config.pacing.after_answer(),
                Side::Robot => self.config.pacing.turn_switch(),
            };
            self.pass_turn(side, pause, &mut outcome);
        }
        self.finish(outcome)
    }

    fn pass_turn(&mut self, from: Side, pause: Duration, outcome: &mut StepOutcome) {
        let next = from.opponent();
        self.current_turn = next;
        self.phase = match next {
            Side::Player => GamePhase::PlayerTurn,
            Side::Robot => GamePhase::RobotTurn,
        };
        outcome.events.push(GameEvent::TurnPassed { next });
        if next == Side::Robot {
            outcome.next = Some(Scheduled {
                transition: Transition::RobotTurn,
                after: pause + self.config.pacing.robot_think(),
            });
        }
    }

    fn check_win(&mut self, side: Side, outcome: &mut StepOutcome) -> bool {
        if !self.token(side).has_reached(self.total_squares()) {
            return false;
        }
        self.phase = GamePhase::GameOver { winner: side };
        self.pending_question = None;
        self.awaiting_answer = false;
        outcome.events.push(GameEvent::GameWon { winner: side });
        outcome.done = true;
        outcome.next = None;
        info!(?side, turn = self.turn, "game won");
        true
    }

    fn finish(&mut self, outcome: StepOutcome) -> StepOutcome {
        if let Some(event) = outcome
            .events
            .iter()
            .rev()
            .find(|event| !matches!(event, GameEvent::TurnPassed { .. }))
        {
            self.status = event.to_string();
        }
        for event in &outcome.events {
            debug!(?event, "game event");
        }
        self.history.extend(outcome.events.iter().cloned());
        outcome
    }
}
