//! Read-only copies of engine state for renderers

use crate::board::Cell;
use crate::pieces::{AbsolutePoint, RelativePoint};
use crate::types::{ContrastVariant, PieceKind, Phase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: Option<PieceKind>,
    pub rotation: usize,
    /// Pivot position
    pub x: i8,
    pub y: i8,
    pub cells: Vec<AbsolutePoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub cols: u8,
    pub rows: u8,
    pub board: Vec<Vec<Cell>>,
    pub active: Option<ActiveSnapshot>,
    /// Upcoming pieces, next first
    pub preview: Vec<Vec<RelativePoint>>,
    pub phase: Phase,
    pub paused: bool,
    /// Digit to show while the resume countdown runs (3, 2, 1)
    pub countdown: Option<u32>,
    /// Rows flashing during a line clear
    pub clearing_rows: Vec<usize>,
    pub variant: ContrastVariant,
    pub seed: u32,
    pub generation: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub lines_in_level: u32,
    pub fall_interval_ms: u32,
}

impl GameSnapshot {
    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn playable(&self) -> bool {
        !self.paused && matches!(self.phase, Phase::Falling | Phase::Locking)
    }

    /// Stored board cell, if (x, y) is on the board
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Cell> {
        self.board.get(y).and_then(|row| row.get(x))
    }

    /// Active piece cell covering (x, y), if any
    pub fn active_at(&self, x: i8, y: i8) -> Option<&AbsolutePoint> {
        self.active
            .as_ref()
            .and_then(|a| a.cells.iter().find(|p| p.x == x && p.y == y))
    }

    pub fn is_clearing(&self, y: usize) -> bool {
        self.clearing_rows.contains(&y)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            cols: 0,
            rows: 0,
            board: Vec::new(),
            active: None,
            preview: Vec::new(),
            phase: Phase::Welcome,
            paused: false,
            countdown: None,
            clearing_rows: Vec::new(),
            variant: ContrastVariant::default(),
            seed: 0,
            generation: 0,
            score: 0,
            level: 1,
            lines: 0,
            lines_in_level: 0,
            fall_interval_ms: 0,
        }
    }
}
