use std::collections::HashMap;
use std::time::Duration;

use crate::game::{Game, GameEvent};
use crate::quiz::QuestionProvider;
use crate::types::Side;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub wins: HashMap<Side, u32>,
    pub final_positions: HashMap<Side, Vec<u16>>,
    pub questions: HashMap<Side, u32>,
    pub correct_answers: HashMap<Side, u32>,
    pub games: u32,
    pub unfinished: u32,
    pub total_turns: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game<Q: QuestionProvider>(&mut self, game: &Game<Q>, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += game.state.turn as u64;

        match game.winner() {
            Some(winner) => *self.wins.entry(winner).or_insert(0) += 1,
            None => self.unfinished += 1,
        }

        for side in Side::ORDERED {
            self.final_positions
                .entry(side)
                .or_default()
                .push(game.state.token(side).position);
        }

        for event in &game.state.history {
            if let GameEvent::Answered { side, correct } = event {
                *self.questions.entry(*side).or_insert(0) += 1;
                if *correct {
                    *self.correct_answers.entry(*side).or_insert(0) += 1;
                }
            }
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        for (side, wins) in other.wins {
            *self.wins.entry(side).or_insert(0) += wins;
        }
        for (side, positions) in other.final_positions {
            self.final_positions.entry(side).or_default().extend(positions);
        }
        for (side, count) in other.questions {
            *self.questions.entry(side).or_insert(0) += count;
        }
        for (side, count) in other.correct_answers {
            *self.correct_answers.entry(side).or_insert(0) += count;
        }
        self.games += other.games;
        self.unfinished += other.unfinished;
        self.total_turns += other.total_turns;
        self.total_duration += other.total_duration;
    }

    pub fn win_rate(&self, side: Side) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins.get(&side).copied().unwrap_or(0) as f64 / self.games as f64
    }

    /// Share of answered questions that were right, or `None` if `side` never
    /// answered one.
    pub fn accuracy(&self, side: Side) -> Option<f64> {
        let asked = self.questions.get(&side).copied().unwrap_or(0);
        if asked == 0 {
            return None;
        }
        let correct = self.correct_answers.get(&side).copied().unwrap_or(0);
        Some(correct as f64 / asked as f64)
    }

    pub fn get_avg_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self {
            stats: GameStats::new(),
        }
    }

    pub fn after<Q: QuestionProvider>(&mut self, game: &Game<Q>, duration: Duration) {
        self.stats.record_game(game, duration);
    }
}

impl Default for StatisticsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
