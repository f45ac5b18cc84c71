use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

use crate::types::SquareKind;

pub const START_ICON: &str = "🚀";
pub const FINISH_ICON: &str = "🏁";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported board size {0}; expected 8, 10 or 12")]
pub struct UnsupportedBoardSize(pub u8);

/// Side length of the square board. Only 8, 10 and 12 are playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BoardSize {
    Eight,
    Ten,
    Twelve,
}

impl BoardSize {
    pub const ALL: [BoardSize; 3] = [BoardSize::Eight, BoardSize::Ten, BoardSize::Twelve];

    pub fn side(self) -> u16 {
        match self {
            BoardSize::Eight => 8,
            BoardSize::Ten => 10,
            BoardSize::Twelve => 12,
        }
    }

    pub fn total_squares(self) -> u16 {
        self.side() * self.side()
    }

    /// How many squares of each special kind the generator places.
    pub fn specials_per_kind(self) -> usize {
        match self {
            BoardSize::Eight => 3,
            BoardSize::Ten => 4,
            BoardSize::Twelve => 5,
        }
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize::Ten
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = UnsupportedBoardSize;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(BoardSize::Eight),
            10 => Ok(BoardSize::Ten),
            12 => Ok(BoardSize::Twelve),
            other => Err(UnsupportedBoardSize(other)),
        }
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> Self {
        size.side() as u8
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = self.side();
        write!(f, "{side}x{side}")
    }
}

impl FromStr for BoardSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sides = s.trim().split(['x', 'X']).map(str::parse::<u8>);
        let side = match (sides.next(), sides.next(), sides.next()) {
            (Some(Ok(side)), None, _) => side,
            (Some(Ok(rows)), Some(Ok(cols)), None) if rows == cols => rows,
            _ => return Err(format!("unknown board size: {s}")),
        };
        BoardSize::try_from(side).map_err(|err| err.to_string())
    }
}

/// Effect assigned to a square before the board is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Special {
    pub kind: SquareKind,
    pub value: i16,
}

impl Special {
    pub fn new(kind: SquareKind, value: i16) -> Self {
        Self { kind, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Square {
    pub number: u16,
    pub kind: SquareKind,
    /// Signed step delta; zero for normal and freeze squares.
    pub value: i16,
    pub icon: &'static str,
}

impl Square {
    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    /// Short fixed-width tag such as `L+7` or `P-3`.
    pub fn tag(&self) -> String {
        match self.kind {
            SquareKind::Normal => String::new(),
            SquareKind::Freeze => SquareKind::Freeze.glyph().to_string(),
            kind => format!("{}{:+}", kind.glyph(), self.value),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Board {
    size: BoardSize,
    /// Squares in visual order: top row first, zigzagging downwards.
    squares: Vec<Square>,
    #[serde(skip)]
    by_number: Vec<usize>,
}

impl Board {
    pub fn generate(size: BoardSize) -> Self {
        let mut rng = thread_rng();
        Self::generate_with_rng(size, &mut rng)
    }

    pub fn generate_with_rng(size: BoardSize, rng: &mut impl Rng) -> Self {
        let specials = place_specials(size, rng);
        Self::from_specials(size, &specials)
    }

    /// Lays out a board from an explicit special-square table. Entries for the
    /// start square, the finish square or numbers off the board are ignored.
    pub fn from_specials(size: BoardSize, specials: &BTreeMap<u16, Special>) -> Self {
        let side = size.side();
        let total = size.total_squares();
        let mut squares = Vec::with_capacity(total as usize);
        let mut by_number = vec![0; total as usize];

        for row in 0..side {
            let row_from_bottom = side - 1 - row;
            for col in 0..side {
                let col_in_row = if row % 2 == 0 { col } else { side - 1 - col };
                let number = row_from_bottom * side + col_in_row + 1;

                let special = specials
                    .get(&number)
                    .filter(|_| number != 1 && number != total);
                let square = match special {
                    Some(special) => Square {
                        number,
                        kind: special.kind,
                        value: special.value,
                        icon: special.kind.icon(),
                    },
                    None => Square {
                        number,
                        kind: SquareKind::Normal,
                        value: 0,
                        icon: if number == 1 {
                            START_ICON
                        } else if number == total {
                            FINISH_ICON
                        } else {
                            ""
                        },
                    },
                };

                by_number[(number - 1) as usize] = squares.len();
                squares.push(square);
            }
        }

        Self {
            size,
            squares,
            by_number,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn side(&self) -> u16 {
        self.size.side()
    }

    pub fn total_squares(&self) -> u16 {
        self.size.total_squares()
    }

    pub fn square(&self, number: u16) -> Option<&Square> {
        if number == 0 || number > self.total_squares() {
            return None;
        }
        self.squares.get(self.by_number[(number - 1) as usize])
    }

    /// All squares in visual order (top-left of the rendered grid first).
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Square]> {
        self.squares.chunks(self.side() as usize)
    }

    pub fn specials(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().filter(|square| square.is_special())
    }

    pub fn count_of(&self, kind: SquareKind) -> usize {
        self.squares.iter().filter(|square| square.kind == kind).count()
    }
}

/// Picks disjoint squares for every special kind. Squares 1 and the finish
/// are reserved up front so they can never be chosen.
pub fn place_specials(size: BoardSize, rng: &mut impl Rng) -> BTreeMap<u16, Special> {
    let total = size.total_squares();
    let mut used: HashSet<u16> = HashSet::from([1, total]);
    let mut specials = BTreeMap::new();

    for _ in 0..size.specials_per_kind() {
        for kind in SquareKind::SPECIAL {
            let number = loop {
                let candidate = rng.gen_range(2..total);
                if used.insert(candidate) {
                    break candidate;
                }
            };
            specials.insert(number, Special::new(kind, effect_value(kind, size, rng)));
        }
    }

    specials
}

fn effect_value(kind: SquareKind, size: BoardSize, rng: &mut impl Rng) -> i16 {
    match kind {
        SquareKind::Ladder => long_jump(size, rng),
        SquareKind::Snake => -long_jump(size, rng),
        SquareKind::Bonus => short_jump(rng),
        SquareKind::Penalty => -short_jump(rng),
        SquareKind::Freeze | SquareKind::Normal => 0,
    }
}

fn long_jump(size: BoardSize, rng: &mut impl Rng) -> i16 {
    let side = size.side() as f64;
    let roll: f64 = rng.gen_range(0.0..1.0);
    (side * 0.6 + roll * side * 0.4).floor() as i16
}

fn short_jump(rng: &mut impl Rng) -> i16 {
    let roll: f64 = rng.gen_range(0.0..1.0);
    (roll * 3.0 + 2.0).floor() as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zigzag_numbering_matches_layout() {
        let board = Board::from_specials(BoardSize::Eight, &BTreeMap::new());
        let rows: Vec<Vec<u16>> = board
            .rows()
            .map(|row| row.iter().map(|sq| sq.number).collect())
            .collect();

        assert_eq!(rows[0], (57..=64).collect::<Vec<_>>());
        assert_eq!(rows[1], (49..=56).rev().collect::<Vec<_>>());
        assert_eq!(rows[7], (1..=8).rev().collect::<Vec<_>>());
        assert_eq!(board.square(1).map(|sq| sq.icon), Some(START_ICON));
        assert_eq!(board.square(64).map(|sq| sq.icon), Some(FINISH_ICON));
    }

    #[test]
    fn each_kind_gets_its_quota() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in BoardSize::ALL {
            let board = Board::generate_with_rng(size, &mut rng);
            for kind in SquareKind::SPECIAL {
                assert_eq!(board.count_of(kind), size.specials_per_kind(), "{kind} on {size}");
            }
        }
    }

    #[test]
    fn effect_magnitudes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = Board::generate_with_rng(BoardSize::Twelve, &mut rng);
        for square in board.specials() {
            match square.kind {
                SquareKind::Ladder => assert!((7..=11).contains(&square.value)),
                SquareKind::Snake => assert!((-11..=-7).contains(&square.value)),
                SquareKind::Bonus => assert!((2..=4).contains(&square.value)),
                SquareKind::Penalty => assert!((-4..=-2).contains(&square.value)),
                SquareKind::Freeze => assert_eq!(square.value, 0),
                SquareKind::Normal => unreachable!(),
            }
        }
    }

    #[test]
    fn start_and_finish_ignore_explicit_specials() {
        let specials = BTreeMap::from([
            (1, Special::new(SquareKind::Snake, -5)),
            (100, Special::new(SquareKind::Ladder, 5)),
            (40, Special::new(SquareKind::Ladder, 7)),
        ]);
        let board = Board::from_specials(BoardSize::Ten, &specials);
        assert_eq!(board.square(1).map(|sq| sq.kind), Some(SquareKind::Normal));
        assert_eq!(board.square(100).map(|sq| sq.kind), Some(SquareKind::Normal));
        assert_eq!(board.square(40).map(|sq| sq.value), Some(7));
        assert!(board.square(0).is_none());
        assert!(board.square(101).is_none());
    }

    #[test]
    fn sizes_parse_strictly() {
        assert_eq!("12".parse::<BoardSize>(), Ok(BoardSize::Twelve));
        assert_eq!("8x8".parse::<BoardSize>(), Ok(BoardSize::Eight));
        assert_eq!("10X10".parse::<BoardSize>(), Ok(BoardSize::Ten));
        assert!("9".parse::<BoardSize>().is_err());
        assert!("8x12".parse::<BoardSize>().is_err());
        assert!("10x3".parse::<BoardSize>().is_err());
        assert!("8x8x8".parse::<BoardSize>().is_err());
        assert!("x".parse::<BoardSize>().is_err());
        assert_eq!(BoardSize::try_from(11u8), Err(UnsupportedBoardSize(11)));
    }
}
