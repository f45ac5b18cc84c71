pub mod base;
pub mod robot;
pub mod simulated;

pub use base::BasePlayer;
pub use robot::{DEFAULT_ROBOT_ACCURACY, RobotBrain, clamp_accuracy};
pub use simulated::SimulatedPlayer;
