//! Game configuration
//!
//! Defaults come from the constants in the types crate. A config can be loaded
//! from JSON and then overridden from environment variables:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CONTRAST_TETRIS_CONFIG` | path of a JSON config file |
//! | `CONTRAST_TETRIS_VARIANT` | `variant` (e.g. `highContrast`) |
//! | `CONTRAST_TETRIS_SEED` | `seed` |
//! | `CONTRAST_TETRIS_FALL_MS` | `initialFallMs` |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::palette::ColorPalette;
use crate::types::{
    ContrastVariant, BASE_FALL_MS, DEFAULT_COLS, DEFAULT_ROWS, LINE_CLEAR_ANIMATION_MS,
    LOCK_DELAY_MS, MAX_BOARD_DIM, MIN_COLS, MIN_ROWS, RESUME_COUNTDOWN_MS,
};

pub const ENV_CONFIG: &str = "CONTRAST_TETRIS_CONFIG";
pub const ENV_VARIANT: &str = "CONTRAST_TETRIS_VARIANT";
pub const ENV_SEED: &str = "CONTRAST_TETRIS_SEED";
pub const ENV_FALL_MS: &str = "CONTRAST_TETRIS_FALL_MS";

/// Seed used when none is configured
pub const DEFAULT_SEED: u32 = 1;

/// Everything an engine needs at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub cols: u8,
    pub rows: u8,
    pub variant: ContrastVariant,
    /// Gravity interval at level 1
    pub initial_fall_ms: u32,
    pub lock_delay_ms: u32,
    /// 0 collapses cleared rows immediately
    pub line_clear_ms: u32,
    /// 0 resumes immediately
    pub resume_countdown_ms: u32,
    pub seed: Option<u32>,
    pub palettes: Vec<ColorPalette>,
    pub palette_index: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            variant: ContrastVariant::default(),
            initial_fall_ms: BASE_FALL_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            line_clear_ms: LINE_CLEAR_ANIMATION_MS,
            resume_countdown_ms: RESUME_COUNTDOWN_MS,
            seed: None,
            palettes: ColorPalette::defaults(),
            palette_index: 0,
        }
    }
}

impl GameConfig {
    /// Check dimensions and palettes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_COLS..=MAX_BOARD_DIM).contains(&self.cols)
            || !(MIN_ROWS..=MAX_BOARD_DIM).contains(&self.rows)
        {
            return Err(ConfigError::InvalidDimensions {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.palettes.is_empty() {
            return Err(ConfigError::NoPalettes);
        }
        if let Some(p) = self.palettes.iter().find(|p| p.solid.is_empty()) {
            return Err(ConfigError::EmptyPalette {
                name: p.name.clone(),
            });
        }
        if self.palette_index >= self.palettes.len() {
            return Err(ConfigError::PaletteIndexOutOfRange {
                index: self.palette_index,
                len: self.palettes.len(),
            });
        }
        Ok(())
    }

    pub fn seed_or_default(&self) -> u32 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load from `CONTRAST_TETRIS_CONFIG` (if set) and apply environment
    /// overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        use std::env;

        let mut config = match env::var(ENV_CONFIG).ok().filter(|s| !s.trim().is_empty()) {
            Some(path) => Self::from_file(path.trim())?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production).
    /// Blank values are ignored.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let invalid = |key: &str, value: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        };

        if let Some(value) = get(ENV_VARIANT) {
            self.variant =
                ContrastVariant::from_str(&value).ok_or_else(|| invalid(ENV_VARIANT, value))?;
        }
        if let Some(value) = get(ENV_SEED) {
            self.seed = Some(value.parse().map_err(|_| invalid(ENV_SEED, value))?);
        }
        if let Some(value) = get(ENV_FALL_MS) {
            self.initial_fall_ms = value.parse().map_err(|_| invalid(ENV_FALL_MS, value))?;
        }
        Ok(())
    }
}
