use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::PendingQuestion;
use crate::players::BasePlayer;
use crate::players::robot::clamp_accuracy;

const WRONG_ANSWER: &str = "no idea";
const COIN_FLIP: f64 = 0.5;

/// Stand-in for the human: knows the answer with a fixed probability.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    pub accuracy: f64,
    rng: StdRng,
}

impl SimulatedPlayer {
    pub fn new(accuracy: f64, seed: u64) -> Self {
        Self {
            accuracy: clamp_accuracy(accuracy, COIN_FLIP),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl BasePlayer for SimulatedPlayer {
    fn answer(&mut self, question: &PendingQuestion) -> String {
        if self.rng.gen_bool(self.accuracy) {
            // Sloppy casing and padding still count as correct.
            format!("  {}  ", question.correct_answer.to_uppercase())
        } else {
            WRONG_ANSWER.to_string()
        }
    }
}
