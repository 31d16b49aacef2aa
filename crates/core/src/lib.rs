//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the falling-piece simulation: the board, the pieces and
//! their coloring, scoring, and the engine state machine. It has **no
//! dependencies** on terminals or I/O beyond reading a config file, making it:
//!
//! - **Deterministic**: the same seed produces the same game
//! - **Testable**: scripted piece sources and board setup hooks
//! - **Portable**: runs headless, in a terminal, or behind any other UI
//!
//! # Module Structure
//!
//! - [`board`]: grid storage, collision queries and row collapse
//! - [`pieces`]: shape tables, rotation states and the nudge search
//! - [`palette`]: solid and striped coloring per contrast variant
//! - [`rng`]: seeded LCG and the uniform piece factory
//! - [`scoring`]: line-clear table and level progression
//! - [`scheduler`]: generation-checked deferred work
//! - [`engine`]: the state machine and command API
//! - [`snapshot`]: owned copies of engine state for renderers
//! - [`config`]: construction-time settings
//! - [`error`]: command rejections and config errors
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every piece is an independent 1-in-7 pick
//! - **Rotation**: one direction, nudged sideways up to 4 cells when blocked
//! - **Lock delay**: 300ms grace once a piece comes to rest
//! - **Scoring**: 40 / 100 / 300 / 1200 for 1-4 rows, 1 point per hard-dropped row
//! - **Loss**: any locked cell in row 1
//!
//! # Example
//!
//! ```
//! use contrast_tetris_core::{GameConfig, GameEngine};
//! use contrast_tetris_types::{GameCommand, Phase};
//!
//! let config = GameConfig {
//!     seed: Some(12345),
//!     ..GameConfig::default()
//! };
//! let mut game = GameEngine::new(config).unwrap();
//! game.start().unwrap();
//!
//! // Apply game commands
//! let _ = game.apply(GameCommand::MoveRight);
//! let _ = game.apply(GameCommand::Rotate);
//! game.apply(GameCommand::HardDrop).unwrap();
//!
//! // Hard drop awards one point per row
//! assert!(game.score() > 0);
//! assert_eq!(game.phase(), Phase::Falling);
//! ```
//!
//! # Timing
//!
//! Call [`GameEngine::advance`](engine::GameEngine::advance) every frame with
//! the elapsed time. Gravity starts at one row per second and speeds up 50ms
//! per level down to 100ms.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod palette;
pub mod pieces;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;

pub use contrast_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell};
pub use config::GameConfig;
pub use engine::GameEngine;
pub use error::{ConfigError, Rejection};
pub use palette::{paint, ColorPalette, PieceColoring};
pub use pieces::{try_rotate, AbsolutePoint, RelativePoint, Tetromino};
pub use rng::{PieceFactory, SimpleRng};
pub use scoring::{fall_interval_ms, line_clear_score, LevelProgress};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
