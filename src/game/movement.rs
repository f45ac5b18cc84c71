/// Moves a token `steps` squares forward. A roll that would carry the token
/// past the last square is void: the token stays where it is.
pub fn move_token(current: u16, steps: u16, total_squares: u16) -> u16 {
    let target = current.saturating_add(steps);
    let landed = if target > total_squares { current } else { target };
    landed.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn overshoot_keeps_position() {
        assert_eq!(move_token(95, 6, 100), 95);
        assert_eq!(move_token(95, 5, 100), 100);
        assert_eq!(move_token(60, 4, 64), 64);
    }

    #[test]
    fn unplaced_token_enters_board() {
        assert_eq!(move_token(0, 3, 100), 3);
        assert_eq!(move_token(0, 0, 100), 1);
    }

    proptest! {
        #[test]
        fn moves_exactly_or_not_at_all(total in prop::sample::select(vec![64u16, 100, 144]),
                                       offset in 0u16..144,
                                       steps in 1u16..=6) {
            let current = 1 + offset % total;
            let landed = move_token(current, steps, total);
            if current + steps > total {
                prop_assert_eq!(landed, current);
            } else {
                prop_assert_eq!(landed, current + steps);
            }
            prop_assert!(landed >= 1);
        }
    }
}
