//! Contrast Tetris (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `contrast_tetris::{core,input,term,types}`.

pub use contrast_tetris_core as core;
pub use contrast_tetris_input as input;
pub use contrast_tetris_term as term;
pub use contrast_tetris_types as types;
