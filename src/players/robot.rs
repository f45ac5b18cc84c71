use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROBOT_ACCURACY: f64 = 0.7;

/// Clamps a probability into [0, 1]. NaN and infinities become `fallback`.
pub fn clamp_accuracy(accuracy: f64, fallback: f64) -> f64 {
    if accuracy.is_finite() {
        accuracy.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// The robot never reads its questions; it is right with a fixed probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotBrain {
    pub accuracy: f64,
}

impl RobotBrain {
    pub fn new(accuracy: f64) -> Self {
        Self {
            accuracy: clamp_accuracy(accuracy, DEFAULT_ROBOT_ACCURACY),
        }
    }

    pub fn answers_correctly(&self, rng: &mut impl Rng) -> bool {
        rng.gen_bool(self.accuracy)
    }
}

impl Default for RobotBrain {
    fn default() -> Self {
        Self::new(DEFAULT_ROBOT_ACCURACY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn accuracy_is_roughly_seventy_percent() {
        let brain = RobotBrain::default();
        let mut rng = StdRng::seed_from_u64(99);
        let correct = (0..10_000)
            .filter(|_| brain.answers_correctly(&mut rng))
            .count();
        assert!((6_700..=7_300).contains(&correct), "got {correct}");
    }

    #[test]
    fn accuracy_is_clamped() {
        assert_eq!(RobotBrain::new(1.5).accuracy, 1.0);
        assert_eq!(RobotBrain::new(-0.2).accuracy, 0.0);
    }

    #[test]
    fn non_finite_accuracy_falls_back_to_default() {
        let mut rng = StdRng::seed_from_u64(5);
        for accuracy in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let brain = RobotBrain::new(accuracy);
            assert_eq!(brain.accuracy, DEFAULT_ROBOT_ACCURACY);
            brain.answers_correctly(&mut rng);
        }
    }
}
