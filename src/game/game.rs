use tracing::{info, instrument};
use uuid::Uuid;

use crate::game::state::{GameConfig, GameError, GamePhase, GameState, StepOutcome};
use crate::game::view::GameView;
use crate::players::BasePlayer;
use crate::quiz::QuestionProvider;
use crate::types::Side;

const TURNS_LIMIT: u32 = 1000;

/// What the render surface can ask of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    RollRequested,
    AnswerSubmitted(String),
    ReportRequested(String),
}

/// One session: the turn controller plus the question service it draws from.
pub struct Game<Q: QuestionProvider> {
    pub seed: u64,
    pub id: Uuid,
    pub state: GameState,
    provider: Q,
}

impl<Q: QuestionProvider> Game<Q> {
    /// Fails when the configured question set is not known to the provider,
    /// since no game can start without one.
    #[instrument(skip(config, provider), fields(seed = config.seed, size = %config.board_size))]
    pub fn new(config: GameConfig, provider: Q) -> Result<Self, GameError> {
        let sets = provider
            .list_question_sets()
            .map_err(|err| GameError::Setup(err.to_string()))?;
        let set = sets
            .iter()
            .find(|set| set.id == config.question_set_id)
            .ok_or_else(|| {
                GameError::Setup(format!(
                    "question set {} does not exist",
                    config.question_set_id
                ))
            })?;
        if set.question_count == 0 {
            return Err(GameError::Setup(format!(
                "question set \"{}\" has no questions",
                set.title
            )));
        }
        info!(set = %set.title, "starting game");

        Ok(Self::with_state(GameState::new(config), provider))
    }

    /// Wraps an already prepared state without checking the question set.
    pub fn with_state(state: GameState, provider: Q) -> Self {
        Self {
            seed: state.config.seed,
            id: Uuid::new_v4(),
            state,
            provider,
        }
    }

    pub fn provider(&self) -> &Q {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut Q {
        &mut self.provider
    }

    pub fn into_provider(self) -> Q {
        self.provider
    }

    pub fn handle(&mut self, intent: Intent) -> Result<StepOutcome, GameError> {
        match intent {
            Intent::RollRequested => self.state.roll(&mut self.provider),
            Intent::AnswerSubmitted(answer) => self.state.submit_answer(&answer),
            Intent::ReportRequested(reason) => self.state.report(&reason, &mut self.provider),
        }
    }

    /// Runs the next robot transition, if one is due.
    pub fn advance(&mut self) -> Result<StepOutcome, GameError> {
        self.state.advance(&mut self.provider)
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner()
    }

    pub fn view(&self) -> GameView {
        GameView::from_state(&self.state)
    }

    /// Plays until someone wins or the turn limit is hit, with `player`
    /// standing in for the human.
    pub fn play<P: BasePlayer>(&mut self, player: &mut P) -> Option<Side> {
        while self.winner().is_none() && self.state.turn < TURNS_LIMIT {
            if self.play_tick(player).is_none() {
                break;
            }
        }
        self.winner()
    }

    pub fn play_tick<P: BasePlayer>(&mut self, player: &mut P) -> Option<StepOutcome> {
        let result = match self.state.phase {
            GamePhase::PlayerTurn => self.handle(Intent::RollRequested),
            GamePhase::PlayerAwaitingAnswer => {
                let answer = self
                    .state
                    .pending_question
                    .as_ref()
                    .map(|question| player.answer(question))?;
                self.handle(Intent::AnswerSubmitted(answer))
            }
            GamePhase::RobotTurn | GamePhase::RobotAnswering => self.advance(),
            GamePhase::GameOver { .. } => return None,
        };
        result.ok()
    }
}
