use crate::players::SimulatedPlayer;

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Answers correctly half of the time.",
    },
    CliPlayer {
        code: "S",
        name: "ScholarPlayer",
        description: "Answers correctly 90% of the time.",
    },
    CliPlayer {
        code: "N",
        name: "NovicePlayer",
        description: "Answers correctly 20% of the time.",
    },
    CliPlayer {
        code: "A",
        name: "AccuracyPlayer",
        description: "Answers correctly with the probability given as first param (e.g. A:0.75).",
    },
];

pub fn create_player(code: &str, seed: u64, params: Vec<&str>) -> Option<SimulatedPlayer> {
    let accuracy = match code {
        "R" => 0.5,
        "S" => 0.9,
        "N" => 0.2,
        "A" => params.first().and_then(|s| parse_accuracy(s).ok())?,
        _ => return None,
    };
    Some(SimulatedPlayer::new(accuracy, seed))
}

/// Seed for the `game_idx`-th game of a run. Wraps instead of overflowing.
pub fn game_seed(base: u64, game_idx: u64) -> u64 {
    base.wrapping_add(game_idx)
}

/// Parses a probability in [0, 1]. Used as a clap value parser too.
pub fn parse_accuracy(value: &str) -> Result<f64, String> {
    let accuracy: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    if !(0.0..=1.0).contains(&accuracy) {
        return Err(format!("{value:?} is not between 0 and 1"));
    }
    Ok(accuracy)
}

pub fn player_name(code: &str) -> &'static str {
    CLI_PLAYERS
        .iter()
        .find(|player| player.code == code)
        .map(|player| player.name)
        .unwrap_or("UnknownPlayer")
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_accuracies() {
        assert_eq!(create_player("S", 1, vec![]).map(|p| p.accuracy), Some(0.9));
        assert_eq!(create_player("A", 1, vec!["0.75"]).map(|p| p.accuracy), Some(0.75));
        assert!(create_player("A", 1, vec![]).is_none());
        assert!(create_player("X", 1, vec![]).is_none());
        assert!(create_player("A", 1, vec!["NaN"]).is_none());
        assert!(create_player("A", 1, vec!["1.5"]).is_none());
    }

    #[test]
    fn game_seeds_wrap_at_the_top() {
        assert_eq!(game_seed(42, 3), 45);
        assert_eq!(game_seed(u64::MAX, 0), u64::MAX);
        assert_eq!(game_seed(u64::MAX, 2), 1);
    }

    #[test]
    fn accuracy_must_be_a_probability() {
        assert_eq!(parse_accuracy(" 0.25 "), Ok(0.25));
        assert_eq!(parse_accuracy("1"), Ok(1.0));
        assert!(parse_accuracy("NaN").is_err());
        assert!(parse_accuracy("inf").is_err());
        assert!(parse_accuracy("-0.1").is_err());
        assert!(parse_accuracy("often").is_err());
    }
}
