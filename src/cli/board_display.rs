use crate::board::Square;
use crate::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMarker {
    Player,
    Robot,
    Both,
}

impl TokenMarker {
    pub fn at(number: u16, player: u16, robot: u16) -> Option<Self> {
        match (number == player, number == robot) {
            (true, true) => Some(TokenMarker::Both),
            (true, false) => Some(TokenMarker::Player),
            (false, true) => Some(TokenMarker::Robot),
            (false, false) => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TokenMarker::Player => "P ",
            TokenMarker::Robot => "R ",
            TokenMarker::Both => "PR",
        }
    }
}

pub const CELL_WIDTH: usize = 10;

/// Number and effect tag padded to a fixed width, e.g. ` 47 L+7 `.
pub fn cell_label(square: &Square) -> String {
    format!("{:>3} {:<4}", square.number, square.tag())
}

pub fn render_board_to_string(state: &GameState) -> String {
    let player = state.player.position;
    let robot = state.robot.position;
    let mut out = String::new();
    let divider = "-".repeat((CELL_WIDTH + 1) * state.board.side() as usize + 1);

    out.push_str(&divider);
    out.push('\n');
    for row in state.board.rows() {
        out.push('|');
        for square in row {
            let marker = TokenMarker::at(square.number, player, robot)
                .map(TokenMarker::symbol)
                .unwrap_or("  ");
            out.push_str(&cell_label(square));
            out.push_str(marker);
            out.push('|');
        }
        out.push('\n');
        out.push_str(&divider);
        out.push('\n');
    }
    out
}

pub fn display_board(state: &GameState) {
    print!("{}", render_board_to_string(state));
}
