use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::BoardSize;
use crate::quiz::QuestionSetId;

pub const DEFAULT_PLAYER_COLOR: &str = "#e74c3c";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid colour {0:?}; expected #rrggbb")]
    Color(String),
}

/// Choices made on the setup screen before a game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub size: BoardSize,
    pub question_set_id: Option<QuestionSetId>,
    pub player_color: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            size: BoardSize::default(),
            question_set_id: None,
            player_color: DEFAULT_PLAYER_COLOR.to_string(),
        }
    }
}

impl GameSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path)?;
        let settings: GameSettings = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    pub fn player_rgb(&self) -> Result<(u8, u8, u8), SettingsError> {
        parse_hex_color(&self.player_color)
    }
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(value: &str) -> Result<(u8, u8, u8), SettingsError> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SettingsError::Color(value.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| SettingsError::Color(value.to_string()))
    };
    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_settings_document() {
        let settings: GameSettings = serde_json::from_str(r#"{ "size": 12 }"#).unwrap();
        assert_eq!(settings.size, BoardSize::Twelve);
        assert_eq!(settings.question_set_id, None);
        assert_eq!(settings.player_color, DEFAULT_PLAYER_COLOR);
    }

    #[test]
    fn rejects_unplayable_size() {
        assert!(serde_json::from_str::<GameSettings>(r#"{ "size": 9 }"#).is_err());
    }

    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_color("#e74c3c").unwrap(), (0xe7, 0x4c, 0x3c));
        assert_eq!(parse_hex_color("00FF10").unwrap(), (0, 255, 16));
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }
}
