//! Square effects applied after a question has been answered.
//!
//! The two tables are not mirror images. A wrong answer on a ladder sends
//! the token back by the ladder's length, a wrong answer on a penalty square
//! doubles the penalty and a wrong answer on a freeze square locks the token
//! for two turns. A wrong answer on a snake or bonus square does nothing.

use crate::board::Square;
use crate::types::SquareKind;

use super::token::TokenState;

pub const FREEZE_TURNS_CORRECT: u8 = 1;
pub const FREEZE_TURNS_WRONG: u8 = 2;

pub fn apply_correct(token: TokenState, square: &Square, total_squares: u16) -> TokenState {
    match square.kind {
        SquareKind::Ladder | SquareKind::Snake | SquareKind::Bonus | SquareKind::Penalty => {
            shift(token, square.value as i32, total_squares)
        }
        SquareKind::Freeze => TokenState {
            frozen_turns: FREEZE_TURNS_CORRECT,
            ..token
        },
        SquareKind::Normal => token,
    }
}

pub fn apply_wrong(token: TokenState, square: &Square, total_squares: u16) -> TokenState {
    match square.kind {
        SquareKind::Ladder => shift(token, -(square.value as i32), total_squares),
        SquareKind::Penalty => shift(token, square.value as i32 * 2, total_squares),
        SquareKind::Freeze => TokenState {
            frozen_turns: FREEZE_TURNS_WRONG,
            ..token
        },
        SquareKind::Snake | SquareKind::Bonus | SquareKind::Normal => token,
    }
}

fn shift(token: TokenState, delta: i32, total_squares: u16) -> TokenState {
    let position = (token.position as i32 + delta).clamp(1, total_squares as i32) as u16;
    TokenState { position, ..token }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(number: u16, kind: SquareKind, value: i16) -> Square {
        Square {
            number,
            kind,
            value,
            icon: kind.icon(),
        }
    }

    #[test]
    fn ladder_climbs_on_correct_and_collapses_on_wrong() {
        let ladder = square(40, SquareKind::Ladder, 7);
        let token = TokenState::at(40);
        assert_eq!(apply_correct(token, &ladder, 100).position, 47);
        assert_eq!(apply_wrong(token, &ladder, 100).position, 33);
    }

    #[test]
    fn ladder_results_are_not_inverse_of_each_other() {
        let ladder = square(40, SquareKind::Ladder, 7);
        let climbed = apply_correct(TokenState::at(40), &ladder, 100);
        let collapsed = apply_wrong(climbed, &ladder, 100);
        assert_eq!(climbed.position - 40, 7);
        assert_eq!(climbed.position - collapsed.position, 7);

        // From the ladder square itself the two outcomes are 14 squares apart.
        let wrong = apply_wrong(TokenState::at(40), &ladder, 100);
        assert_eq!(climbed.position - wrong.position, 14);
    }

    #[test]
    fn penalty_doubles_on_wrong() {
        let penalty = square(50, SquareKind::Penalty, -3);
        let token = TokenState::at(50);
        assert_eq!(apply_correct(token, &penalty, 100).position, 47);
        assert_eq!(apply_wrong(token, &penalty, 100).position, 44);
        assert_eq!(apply_wrong(TokenState::at(4), &penalty, 100).position, 1);
    }

    #[test]
    fn snake_only_bites_on_correct() {
        let snake = square(30, SquareKind::Snake, -8);
        let token = TokenState::at(30);
        assert_eq!(apply_correct(token, &snake, 100).position, 22);
        assert_eq!(apply_wrong(token, &snake, 100), token);
        assert_eq!(apply_correct(TokenState::at(5), &snake, 100).position, 1);
    }

    #[test]
    fn bonus_is_forfeited_on_wrong() {
        let bonus = square(97, SquareKind::Bonus, 4);
        let token = TokenState::at(97);
        assert_eq!(apply_correct(token, &bonus, 100).position, 100);
        assert_eq!(apply_wrong(token, &bonus, 100), token);
    }

    #[test]
    fn freeze_lengths_differ() {
        let freeze = square(20, SquareKind::Freeze, 0);
        let token = TokenState::at(20);
        let correct = apply_correct(token, &freeze, 100);
        let wrong = apply_wrong(token, &freeze, 100);
        assert_eq!((correct.position, correct.frozen_turns), (20, 1));
        assert_eq!((wrong.position, wrong.frozen_turns), (20, 2));
    }
}
