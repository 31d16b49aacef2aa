//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` events into [`crate::types::GameCommand`]s. The engine has
//! no key repeat of its own: one key press is one command, the way the
//! terminal delivers it.

pub mod map;

pub use contrast_tetris_types as types;

pub use map::{handle_event, handle_key_event, should_quit};
