//! Error types for the engine and its configuration

use std::fmt;

/// Why a command did nothing.
///
/// Rejections are ordinary outcomes (a move into a wall, a rotate with no
/// room), never failures of the engine. The state is unchanged when one is
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Welcome screen, game over, paused, or resume countdown running
    NotPlayable,
    /// The move would collide or leave the board
    Blocked,
    /// No piece is falling (e.g. rows are still flashing)
    NoActivePiece,
    AlreadyPaused,
    NotPaused,
    /// No horizontal nudge made the next rotation state fit
    RotationDenied,
}

impl Rejection {
    pub fn code(self) -> &'static str {
        match self {
            Rejection::NotPlayable | Rejection::NoActivePiece => "not_playable",
            Rejection::Blocked | Rejection::RotationDenied => "blocked",
            Rejection::AlreadyPaused | Rejection::NotPaused => "invalid_pause",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rejection::NotPlayable => "game is not playable",
            Rejection::Blocked => "piece cannot move there",
            Rejection::NoActivePiece => "no active piece",
            Rejection::AlreadyPaused => "game is already paused",
            Rejection::NotPaused => "game is not paused",
            Rejection::RotationDenied => "no room to rotate",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for Rejection {}

/// Invalid or unreadable game configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Board size outside the supported range
    InvalidDimensions { cols: u8, rows: u8 },
    /// A palette with no solid colors
    EmptyPalette { name: String },
    NoPalettes,
    PaletteIndexOutOfRange { index: usize, len: usize },
    /// Environment override that does not parse
    InvalidValue { key: String, value: String },
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimensions { cols, rows } => {
                write!(f, "invalid board size {cols}x{rows}")
            }
            ConfigError::EmptyPalette { name } => write!(f, "palette '{name}' has no colors"),
            ConfigError::NoPalettes => write!(f, "no color palettes configured"),
            ConfigError::PaletteIndexOutOfRange { index, len } => {
                write!(f, "palette index {index} out of range ({len} palettes)")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: '{value}'")
            }
            ConfigError::Io(err) => write!(f, "failed to read config: {err}"),
            ConfigError::Parse(err) => write!(f, "failed to parse config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
