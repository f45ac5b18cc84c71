use serde::{Deserialize, Serialize};

/// Position marker for a token that has not been placed on the board yet.
pub const UNPLACED: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenState {
    pub position: u16,
    pub frozen_turns: u8,
}

impl TokenState {
    pub fn unplaced() -> Self {
        Self::at(UNPLACED)
    }

    pub fn at(position: u16) -> Self {
        Self {
            position,
            frozen_turns: 0,
        }
    }

    pub fn place(&mut self) {
        self.position = 1;
        self.frozen_turns = 0;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_turns > 0
    }

    /// Burns one frozen turn and returns how many remain.
    pub fn thaw_one(&mut self) -> u8 {
        self.frozen_turns = self.frozen_turns.saturating_sub(1);
        self.frozen_turns
    }

    pub fn has_reached(&self, total_squares: u16) -> bool {
        self.position >= total_squares
    }
}
