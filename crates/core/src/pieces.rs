//! Pieces module - tetromino shapes and rotation
//!
//! Every shape is a fixed cycle of rotation states. A state lists the cells
//! relative to the piece pivot (the rotation center), so offsets can be
//! negative. Rotation walks the cycle forward; there are no kick tables, only
//! a horizontal nudge search (see [`try_rotate`]).

use arrayvec::ArrayVec;

use crate::palette::PieceColoring;
use crate::types::{BarDirection, ColorSpec, ContrastVariant, PieceKind, MAX_KICK_OFFSET};
use BarDirection::{Horizontal as H, Vertical as V};

/// Offset of a single cell relative to the pivot
pub type CellOffset = (i8, i8);

/// Cells of one rotation state
pub type RotationState = ArrayVec<RelativePoint, 4>;

/// O piece: a single state, pivot at the bottom-left cell
const O_STATES: [[CellOffset; 4]; 1] = [[(0, -1), (1, -1), (1, 0), (0, 0)]];

const I_STATES: [[CellOffset; 4]; 4] = [
    [(-1, 0), (0, 0), (1, 0), (2, 0)],
    [(0, -1), (0, 0), (0, 1), (0, 2)],
    [(-1, 1), (0, 1), (1, 1), (2, 1)],
    [(1, -1), (1, 0), (1, 1), (1, 2)],
];

const L_STATES: [[CellOffset; 4]; 4] = [
    [(-1, 0), (0, 0), (1, 0), (1, -1)],
    [(0, -1), (0, 0), (0, 1), (1, 1)],
    [(-1, 1), (-1, 0), (0, 0), (1, 0)],
    [(-1, -1), (0, -1), (0, 0), (0, 1)],
];

const J_STATES: [[CellOffset; 4]; 4] = [
    [(-1, -1), (-1, 0), (0, 0), (1, 0)],
    [(0, 1), (0, 0), (0, -1), (1, -1)],
    [(-1, 0), (0, 0), (1, 0), (1, 1)],
    [(-1, 1), (0, 1), (0, 0), (0, -1)],
];

const Z_STATES: [[CellOffset; 4]; 4] = [
    [(-1, -1), (0, -1), (0, 0), (1, 0)],
    [(0, 1), (0, 0), (1, 0), (1, -1)],
    [(-1, 0), (0, 0), (0, 1), (1, 1)],
    [(-1, 1), (-1, 0), (0, 0), (0, -1)],
];

const S_STATES: [[CellOffset; 4]; 4] = [
    [(-1, 0), (0, 0), (0, -1), (1, -1)],
    [(0, -1), (0, 0), (1, 0), (1, 1)],
    [(-1, 1), (0, 1), (0, 0), (1, 0)],
    [(-1, -1), (-1, 0), (0, 0), (0, 1)],
];

const T_STATES: [[CellOffset; 4]; 4] = [
    [(-1, 0), (0, 0), (1, 0), (0, -1)],
    [(0, -1), (0, 0), (0, 1), (1, 0)],
    [(-1, 0), (0, 0), (1, 0), (0, 1)],
    [(0, -1), (0, 0), (0, 1), (-1, 0)],
];

/// Bar orientation per T cell. The pivot touches all three other cells, so it
/// takes the opposite orientation to each of them.
const T_DIRECTIONS: [[BarDirection; 4]; 4] = [
    [V, H, V, V],
    [H, V, H, H],
    [V, H, V, V],
    [H, V, H, H],
];

/// Single cell at the pivot, used when the factory rolls an unknown shape.
const FALLBACK_STATES: [[CellOffset; 1]; 1] = [[(0, 0)]];

/// Rotation states of a piece kind, in rotation order.
pub fn rotation_offsets(kind: PieceKind) -> &'static [[CellOffset; 4]] {
    match kind {
        PieceKind::O => &O_STATES,
        PieceKind::I => &I_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::T => &T_STATES,
    }
}

/// Fixed bar orientations per rotation state, for shapes where alternating by
/// cell index would give neighbouring cells the same orientation.
pub fn direction_overrides(kind: PieceKind) -> Option<&'static [[BarDirection; 4]]> {
    match kind {
        PieceKind::T => Some(&T_DIRECTIONS),
        _ => None,
    }
}

/// A cell of a rotation state, relative to the pivot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePoint {
    pub x: i8,
    pub y: i8,
    pub color: ColorSpec,
    pub variant: ContrastVariant,
    pub direction: Option<BarDirection>,
}

impl RelativePoint {
    /// Place this point at the given pivot position.
    pub fn at(&self, pivot_x: i8, pivot_y: i8) -> AbsolutePoint {
        AbsolutePoint {
            x: pivot_x + self.x,
            y: pivot_y + self.y,
            color: self.color.clone(),
            direction: self.direction,
        }
    }
}

/// A piece cell in board coordinates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsolutePoint {
    pub x: i8,
    pub y: i8,
    pub color: ColorSpec,
    pub direction: Option<BarDirection>,
}

/// A piece: fixed rotation states plus the current rotation index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tetromino {
    /// `None` for the single-cell fallback shape
    kind: Option<PieceKind>,
    states: ArrayVec<RotationState, 4>,
    index: usize,
}

impl Tetromino {
    /// Build a piece of `kind` painted with `coloring`.
    pub fn new(kind: PieceKind, coloring: &PieceColoring) -> Self {
        let overrides = direction_overrides(kind);
        let states = rotation_offsets(kind)
            .iter()
            .enumerate()
            .map(|(i, state)| paint_state(state, coloring, overrides.map(|o| &o[i][..])))
            .collect();
        Self {
            kind: Some(kind),
            states,
            index: 0,
        }
    }

    /// Build a piece with every cell a single solid color.
    pub fn with_color(kind: PieceKind, color: ColorSpec) -> Self {
        Self::new(kind, &PieceColoring::uniform(color))
    }

    /// Degenerate one-cell piece at the pivot.
    pub fn single_cell(coloring: &PieceColoring) -> Self {
        let states = FALLBACK_STATES
            .iter()
            .map(|state| paint_state(state, coloring, None))
            .collect();
        Self {
            kind: None,
            states,
            index: 0,
        }
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.kind
    }

    /// Cells of the current rotation state
    pub fn cells(&self) -> &[RelativePoint] {
        &self.states[self.index]
    }

    /// Cells of the following rotation state, without rotating
    pub fn next_rotation(&self) -> &[RelativePoint] {
        &self.states[self.next_index()]
    }

    /// Advance to the following rotation state
    pub fn commit_rotation(&mut self) {
        self.index = self.next_index();
    }

    pub fn rotation_index(&self) -> usize {
        self.index
    }

    pub fn rotation_count(&self) -> usize {
        self.states.len()
    }

    fn next_index(&self) -> usize {
        (self.index + 1) % self.states.len()
    }

    /// Current cells placed at the given pivot position
    pub fn absolute_cells(&self, pivot_x: i8, pivot_y: i8) -> ArrayVec<AbsolutePoint, 4> {
        self.cells().iter().map(|p| p.at(pivot_x, pivot_y)).collect()
    }

    /// Lowest relative row of the current state
    pub fn bottom_offset(&self) -> i8 {
        self.cells().iter().map(|p| p.y).max().unwrap_or(0)
    }
}

fn paint_state(
    offsets: &[CellOffset],
    coloring: &PieceColoring,
    directions: Option<&[BarDirection]>,
) -> RotationState {
    offsets
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let direction = match (coloring.direction_for(i), directions) {
                (Some(_), Some(fixed)) => fixed.get(i).copied(),
                (default, _) => default,
            };
            RelativePoint {
                x,
                y,
                color: coloring.color().clone(),
                variant: coloring.variant(),
                direction,
            }
        })
        .collect()
}

/// Horizontal nudges tried when rotating, in order: 0, +1, -1, +2, -2, ...
pub fn kick_offsets() -> impl Iterator<Item = i8> {
    std::iter::once(0).chain((1..=MAX_KICK_OFFSET).flat_map(|d| [d, -d]))
}

/// Try to rotate a piece with horizontal nudges
/// Returns the x offset that makes the next rotation state fit, if any
pub fn try_rotate(
    piece: &Tetromino,
    x: i8,
    y: i8,
    fits: impl Fn(i8, i8) -> bool,
) -> Option<i8> {
    let next = piece.next_rotation();
    kick_offsets().find(|&dx| next.iter().all(|p| fits(x + dx + p.x, y + p.y)))
}
