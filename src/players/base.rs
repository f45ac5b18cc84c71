use crate::game::PendingQuestion;

/// Answers questions on behalf of the human side when nobody is at the keyboard.
pub trait BasePlayer {
    fn answer(&mut self, question: &PendingQuestion) -> String;
}
