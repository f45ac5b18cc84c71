use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Player,
    Robot,
}

impl Side {
    pub const ORDERED: [Side; 2] = [Side::Player, Side::Robot];

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Robot,
            Side::Robot => Side::Player,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SquareKind {
    Normal,
    Ladder,
    Snake,
    Bonus,
    Penalty,
    Freeze,
}

impl SquareKind {
    /// Placement order used by the board generator.
    pub const SPECIAL: [SquareKind; 5] = [
        SquareKind::Ladder,
        SquareKind::Snake,
        SquareKind::Bonus,
        SquareKind::Penalty,
        SquareKind::Freeze,
    ];

    pub fn is_special(self) -> bool {
        self != SquareKind::Normal
    }

    pub fn icon(self) -> &'static str {
        match self {
            SquareKind::Normal => "",
            SquareKind::Ladder => "🪜",
            SquareKind::Snake => "🐍",
            SquareKind::Bonus => "⬆️",
            SquareKind::Penalty => "⬇️",
            SquareKind::Freeze => "🧊",
        }
    }

    /// Single-column marker for fixed-width renderers.
    pub fn glyph(self) -> char {
        match self {
            SquareKind::Normal => '.',
            SquareKind::Ladder => 'L',
            SquareKind::Snake => 'S',
            SquareKind::Bonus => '+',
            SquareKind::Penalty => '-',
            SquareKind::Freeze => '*',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SquareKind::Normal => "normal",
            SquareKind::Ladder => "ladder",
            SquareKind::Snake => "snake",
            SquareKind::Bonus => "bonus",
            SquareKind::Penalty => "penalty",
            SquareKind::Freeze => "freeze",
        }
    }
}
