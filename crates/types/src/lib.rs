//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data: the simulation engine, the terminal view and
//! the input layer all speak in these types.
//!
//! # Board Dimensions
//!
//! Standard playfield dimensions (configurable per game):
//!
//! - **Columns**: 10 (indexed 0-9)
//! - **Rows**: 20 (indexed 0-19, top to bottom)
//! - **Spawn pivot**: column `cols / 2 - 1`, row `-1` (above the visible area)
//! - **Spawn margin**: 2 rows above row 0 are addressable by a falling piece
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host frame interval (~60 FPS) |
//! | `BASE_FALL_MS` | 1000 | Gravity interval at level 1 |
//! | `FALL_STEP_MS` | 50 | Gravity speed-up per level |
//! | `MIN_FALL_MS` | 100 | Fastest gravity interval |
//! | `LOCK_DELAY_MS` | 300 | Grace period before a grounded piece locks |
//! | `LINE_CLEAR_ANIMATION_MS` | 500 | Rows flash before they collapse |
//! | `RESUME_COUNTDOWN_MS` | 1050 | 3-2-1 countdown after resuming |
//!
//! # Examples
//!
//! ```
//! use contrast_tetris_types::{ContrastVariant, GameCommand, PieceKind, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(GameCommand::from_str("hardDrop"), Some(GameCommand::HardDrop));
//! assert_eq!(ContrastVariant::VeryHighContrast.band_count(), 5);
//!
//! assert_eq!(DEFAULT_COLS, 10);
//! assert_eq!(DEFAULT_ROWS, 20);
//! ```

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Default board width in cells (10 columns)
pub const DEFAULT_COLS: u8 = 10;

/// Default board height in cells (20 rows)
pub const DEFAULT_ROWS: u8 = 20;

/// Largest accepted board dimension on either axis.
pub const MAX_BOARD_DIM: u8 = 64;

/// Smallest accepted board width. The widest piece (I) needs 4 columns.
pub const MIN_COLS: u8 = 4;

/// Smallest accepted board height. Spawn rows plus the loss row need room.
pub const MIN_ROWS: u8 = 4;

/// Rows above row 0 that a falling piece may occupy.
///
/// The pivot spawns at `SPAWN_Y` and no rotation state reaches more than one
/// row above its pivot, so two rows are enough for every shape.
pub const SPAWN_MARGIN: i8 = 2;

/// Pivot row for freshly spawned pieces.
pub const SPAWN_Y: i8 = -1;

/// A taken cell in this row after a lock ends the game.
pub const LOSS_ROW: usize = 1;

/// Host frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_FALL_MS: u32 = 1000;

/// Gravity interval reduction per level gained.
pub const FALL_STEP_MS: u32 = 50;

/// Fastest allowed gravity interval.
pub const MIN_FALL_MS: u32 = 100;

/// Lock delay when the piece can no longer fall (300ms).
pub const LOCK_DELAY_MS: u32 = 300;

/// Duration the cleared rows stay visible before collapsing (500ms).
pub const LINE_CLEAR_ANIMATION_MS: u32 = 500;

/// Resume countdown length (3, 2, 1 then play).
pub const RESUME_COUNTDOWN_MS: u32 = 1050;

/// Time each countdown digit stays up.
pub const RESUME_COUNTDOWN_STEP_MS: u32 = 350;

/// Largest horizontal nudge tried when a rotation collides.
pub const MAX_KICK_OFFSET: i8 = 4;

/// Number of upcoming pieces kept in the preview queue (next and sub-next).
pub const PREVIEW_LEN: usize = 2;

/// Events held for the host before the oldest ones are dropped.
pub const MAX_PENDING_EVENTS: usize = 64;

/// Points per row descended during a hard drop.
pub const HARD_DROP_POINTS_PER_ROW: u32 = 1;

/// Line clear scoring table (classic Nintendo values, no level multiplier)
///
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(LOCK_DELAY_MS, 300);
        assert_eq!(LINE_CLEAR_ANIMATION_MS, 500);
        assert_eq!(RESUME_COUNTDOWN_MS, 3 * RESUME_COUNTDOWN_STEP_MS);
        assert!(MIN_FALL_MS < BASE_FALL_MS);
    }

    #[test]
    fn spawn_margin_covers_spawn_pivot() {
        // A point one row above a pivot at SPAWN_Y must still be addressable.
        assert!(SPAWN_Y - 1 >= -SPAWN_MARGIN);
    }

    #[test]
    fn variant_band_counts() {
        assert_eq!(ContrastVariant::FullColor.band_count(), 1);
        assert_eq!(ContrastVariant::MixedColor.band_count(), 1);
        assert_eq!(ContrastVariant::HighContrast.band_count(), 3);
        assert_eq!(ContrastVariant::VeryHighContrast.band_count(), 5);
    }

    #[test]
    fn variant_serde_uses_camel_case() {
        let json = serde_json::to_string(&ContrastVariant::VeryHighContrast).unwrap();
        assert_eq!(json, "\"veryHighContrast\"");
        let back: ContrastVariant = serde_json::from_str("\"mixedColor\"").unwrap();
        assert_eq!(back, ContrastVariant::MixedColor);
    }

    #[test]
    fn color_spec_caps_bands() {
        let spec = ColorSpec::banded(&[Rgb::BLACK; 8]);
        assert_eq!(spec.bands().len(), MAX_BANDS);
        assert!(!spec.is_solid());
        assert!(ColorSpec::solid(Rgb::WHITE).is_solid());
    }
}

/// The seven tetromino piece kinds
///
/// Declaration order matches the roll order of the piece factory:
/// - **O**: 2x2 square
/// - **I**: straight bar
/// - **L**: L-shaped
/// - **J**: J-shaped (mirror of L)
/// - **Z**: Z-shaped
/// - **S**: S-shaped (mirror of Z)
/// - **T**: T-shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    O,
    I,
    L,
    J,
    Z,
    S,
    T,
}

impl PieceKind {
    /// All kinds, in roll order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
    ];

    /// Map a roll in `0..7` to a kind.
    ///
    /// ```
    /// use contrast_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_index(0), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_index(6), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_index(7), None);
    /// ```
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Position in [`PieceKind::ALL`]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(PieceKind::O),
            "i" => Some(PieceKind::I),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "z" => Some(PieceKind::Z),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::O => "o",
            PieceKind::I => "i",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::Z => "z",
            PieceKind::S => "s",
            PieceKind::T => "t",
        }
    }
}

/// Accessibility coloring mode.
///
/// The contrast modes stripe every cell with alternating bands of a two-color
/// pair so each eye behind red/blue glasses sees part of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContrastVariant {
    /// One random palette color for the whole piece.
    #[default]
    FullColor,
    /// One random palette color for the whole piece, like `FullColor`.
    MixedColor,
    /// Three bands per cell.
    HighContrast,
    /// Five bands per cell.
    VeryHighContrast,
}

impl ContrastVariant {
    /// Number of color bands drawn per cell.
    pub fn band_count(&self) -> usize {
        match self {
            ContrastVariant::FullColor | ContrastVariant::MixedColor => 1,
            ContrastVariant::HighContrast => 3,
            ContrastVariant::VeryHighContrast => 5,
        }
    }

    /// Whether cells carry a bar orientation for the renderer.
    pub fn is_striped(&self) -> bool {
        self.band_count() > 1
    }

    /// Parse a variant name (camelCase, kebab-case or snake_case, any case)
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(|c| c.to_lowercase())
            .collect();
        match normalized.as_str() {
            "fullcolor" => Some(ContrastVariant::FullColor),
            "mixedcolor" => Some(ContrastVariant::MixedColor),
            "highcontrast" => Some(ContrastVariant::HighContrast),
            "veryhighcontrast" => Some(ContrastVariant::VeryHighContrast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContrastVariant::FullColor => "fullColor",
            ContrastVariant::MixedColor => "mixedColor",
            ContrastVariant::HighContrast => "highContrast",
            ContrastVariant::VeryHighContrast => "veryHighContrast",
        }
    }
}

/// Orientation of the color bars inside a striped cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarDirection {
    Vertical,
    Horizontal,
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    ///
    /// ```
    /// use contrast_tetris_types::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#ff0080"), Some(Rgb::new(255, 0, 128)));
    /// assert_eq!(Rgb::from_hex("nope"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Upper bound on color bands in a single cell.
pub const MAX_BANDS: usize = 5;

/// Color of a single cell: one band (solid) or several stripes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ColorSpec {
    bands: ArrayVec<Rgb, MAX_BANDS>,
}

impl ColorSpec {
    pub fn solid(color: Rgb) -> Self {
        let mut bands = ArrayVec::new();
        bands.push(color);
        Self { bands }
    }

    /// Build a striped color. Bands past `MAX_BANDS` are ignored.
    pub fn banded(colors: &[Rgb]) -> Self {
        Self {
            bands: colors.iter().copied().take(MAX_BANDS).collect(),
        }
    }

    pub fn bands(&self) -> &[Rgb] {
        &self.bands
    }

    pub fn is_solid(&self) -> bool {
        self.bands.len() <= 1
    }

    /// First band, used where only one color can be shown.
    pub fn primary(&self) -> Rgb {
        self.bands.first().copied().unwrap_or_default()
    }
}

/// Commands accepted by the engine.
///
/// These are what keyboard keys and on-screen buttons map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    /// Leave the welcome screen and spawn the first piece
    Start,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    MoveDown,
    /// Rotate to the next rotation state (with horizontal nudging)
    Rotate,
    /// Drop to the lowest valid position and lock immediately
    HardDrop,
    Pause,
    Resume,
    /// Pause when running, resume when paused
    TogglePause,
    /// Throw the current game away and start a fresh one
    Reset,
}

impl GameCommand {
    /// Parse command from string (case-insensitive)
    ///
    /// ```
    /// use contrast_tetris_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("moveLeft"), Some(GameCommand::MoveLeft));
    /// assert_eq!(GameCommand::from_str("ROTATE"), Some(GameCommand::Rotate));
    /// assert_eq!(GameCommand::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(GameCommand::Start),
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "movedown" => Some(GameCommand::MoveDown),
            "rotate" => Some(GameCommand::Rotate),
            "harddrop" => Some(GameCommand::HardDrop),
            "pause" => Some(GameCommand::Pause),
            "resume" => Some(GameCommand::Resume),
            "togglepause" => Some(GameCommand::TogglePause),
            "reset" => Some(GameCommand::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::Start => "start",
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::MoveDown => "moveDown",
            GameCommand::Rotate => "rotate",
            GameCommand::HardDrop => "hardDrop",
            GameCommand::Pause => "pause",
            GameCommand::Resume => "resume",
            GameCommand::TogglePause => "togglePause",
            GameCommand::Reset => "reset",
        }
    }
}

/// Engine lifecycle phase.
///
/// `Paused` is not a phase: it is an orthogonal flag that freezes whichever
/// phase the game is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created, nothing falling yet.
    Welcome,
    /// Active piece under gravity.
    Falling,
    /// Piece is resting; the lock delay is running.
    Locking,
    /// Full rows are flashing; no active piece.
    LineClearing,
    /// Terminal until reset.
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Welcome => "welcome",
            Phase::Falling => "falling",
            Phase::Locking => "locking",
            Phase::LineClearing => "lineClearing",
            Phase::GameOver => "gameOver",
        }
    }
}

/// Notifications for the presentation layer (sounds, dialogs, flashes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// `kind` is `None` for the single-cell fallback piece.
    PieceSpawned { kind: Option<PieceKind> },
    /// A piece was committed to the board.
    PieceLocked { kind: Option<PieceKind>, hard_drop: bool },
    /// Rows are flashing; score has already been awarded.
    LinesCleared { rows: Vec<usize>, points: u32 },
    LevelUp { level: u32 },
    RotationDenied,
    Paused,
    /// Play continues (after the countdown, if any).
    Resumed,
    GameOver { score: u32 },
}
