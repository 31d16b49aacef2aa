//! Board module - manages the game grid
//!
//! The board is a `cols x rows` grid (10x20 by default) where every cell always
//! exists; "empty" is `taken == false`, never absence.
//! Uses a flat row-major vector so a game allocates its grid once.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Rows above row 0 (`y < 0`) are not stored but are addressable by a falling
//! piece down to `-SPAWN_MARGIN`.

use crate::pieces::AbsolutePoint;
use crate::types::{BarDirection, ColorSpec, SPAWN_MARGIN};

/// A single stored board cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
    pub taken: bool,
    pub color: ColorSpec,
    pub direction: Option<BarDirection>,
}

impl Cell {
    /// Empty cell at (x, y)
    pub fn empty(x: u8, y: u8) -> Self {
        Self {
            x,
            y,
            taken: false,
            color: ColorSpec::default(),
            direction: None,
        }
    }
}

/// The game board with flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: u8,
    rows: u8,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(cols: u8, rows: u8) -> Self {
        let cells = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| Cell::empty(x, y)))
            .collect();
        Self { cols, rows, cells }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x as i16 >= self.cols as i16 || y < 0 || y as i16 >= self.rows as i16 {
            return None;
        }
        Some((y as usize) * (self.cols as usize) + (x as usize))
    }

    /// Number of columns
    pub fn width(&self) -> u8 {
        self.cols
    }

    /// Number of rows
    pub fn height(&self) -> u8 {
        self.rows
    }

    /// Whether a falling piece may occupy (x, y).
    ///
    /// Columns must be on the board. Rows may reach `SPAWN_MARGIN` rows above
    /// the top so pieces can spawn out of sight.
    pub fn is_in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0
            && (x as i16) < self.cols as i16
            && y >= -SPAWN_MARGIN
            && (y as i16) < self.rows as i16
    }

    /// True unless a stored cell exists at (x, y) and is taken.
    ///
    /// Coordinates without a stored cell (above the top, off the sides) report
    /// empty; bounds are the caller's concern, see [`Board::fits`].
    pub fn is_empty(&self, x: i8, y: i8) -> bool {
        match self.index(x, y) {
            Some(idx) => !self.cells[idx].taken,
            None => true,
        }
    }

    /// Collision check: in bounds and not taken.
    pub fn fits(&self, x: i8, y: i8) -> bool {
        self.is_in_bounds(x, y) && self.is_empty(x, y)
    }

    /// Get cell at position (x, y)
    /// Returns None if there is no stored cell there
    pub fn get(&self, x: i8, y: i8) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Cell at a board coordinate.
    ///
    /// # Panics
    ///
    /// Panics when (x, y) is outside the stored grid.
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        assert!(
            x < self.cols as usize && y < self.rows as usize,
            "cell ({x}, {y}) outside {}x{} board",
            self.cols,
            self.rows
        );
        &self.cells[y * self.cols as usize + x]
    }

    /// Mark (x, y) taken with the given color.
    /// Returns false if there is no stored cell there
    pub fn fill(&mut self, x: i8, y: i8, color: ColorSpec, direction: Option<BarDirection>) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                let cell = &mut self.cells[idx];
                cell.taken = true;
                cell.color = color;
                cell.direction = direction;
                true
            }
            None => false,
        }
    }

    /// Reset (x, y) to empty.
    pub fn clear_cell(&mut self, x: i8, y: i8) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                let cell = &mut self.cells[idx];
                *cell = Cell::empty(cell.x, cell.y);
                true
            }
            None => false,
        }
    }

    /// Commit absolute piece cells to the board.
    ///
    /// The caller guarantees the cells passed collision checks. Cells still
    /// above the top row have no storage and are dropped.
    /// Returns the number of cells written.
    pub fn lock_cells(&mut self, cells: &[AbsolutePoint]) -> usize {
        let mut written = 0;
        for p in cells {
            debug_assert!(
                self.is_in_bounds(p.x, p.y),
                "locking out-of-bounds cell ({}, {})",
                p.x,
                p.y
            );
            if self.fill(p.x, p.y, p.color.clone(), p.direction) {
                written += 1;
            }
        }
        written
    }

    /// Row `y` as a slice, left to right.
    ///
    /// # Panics
    ///
    /// Panics when `y` is not a stored row.
    pub fn row_at(&self, y: usize) -> &[Cell] {
        assert!(
            y < self.rows as usize,
            "row {y} outside board of {} rows",
            self.rows
        );
        let width = self.cols as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Check if a row is completely filled. Panics if `y` is off the board.
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row_at(y).iter().all(|cell| cell.taken)
    }

    /// Check if a row holds any taken cell. Panics if `y` is off the board.
    pub fn is_row_occupied(&self, y: usize) -> bool {
        self.row_at(y).iter().any(|cell| cell.taken)
    }

    /// Indices of full rows, ascending (top to bottom)
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.rows as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Clear a row and shift all rows above down
    /// Returns the number of lines cleared. Panics if `y` is off the board.
    pub fn clear_row(&mut self, y: usize) -> usize {
        assert!(
            y < self.rows as usize,
            "row {y} outside board of {} rows",
            self.rows
        );

        for row in (1..=y).rev() {
            self.copy_row(row - 1, row);
        }
        self.empty_row(0);

        1
    }

    /// Remove the given rows and collapse everything above them.
    ///
    /// Uses a two-pointer pass from the bottom up: rows that survive are copied
    /// down to the next free slot, and the slots left over at the top become
    /// empty rows. Order and duplicates in `rows` do not matter.
    /// Returns the number of distinct rows removed.
    ///
    /// # Panics
    ///
    /// Panics when a row index is not a stored row.
    pub fn clear_and_collapse(&mut self, rows: &[usize]) -> usize {
        let height = self.rows as usize;
        for &y in rows {
            assert!(y < height, "row {y} outside board of {height} rows");
        }

        let mut write_y = height;
        let mut removed = 0;

        for read_y in (0..height).rev() {
            if rows.contains(&read_y) {
                removed += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    self.copy_row(read_y, write_y);
                }
            }
        }

        for y in 0..write_y {
            self.empty_row(y);
        }

        removed
    }

    /// Copy row `src` over row `dst`, fixing the stored y coordinates.
    fn copy_row(&mut self, src: usize, dst: usize) {
        let width = self.cols as usize;
        for x in 0..width {
            let mut cell = self.cells[src * width + x].clone();
            cell.y = dst as u8;
            self.cells[dst * width + x] = cell;
        }
    }

    fn empty_row(&mut self, y: usize) {
        let width = self.cols as usize;
        for x in 0..width {
            self.cells[y * width + x] = Cell::empty(x as u8, y as u8);
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of taken cells
    pub fn taken_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.taken).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::empty(cell.x, cell.y);
        }
    }

    /// Copy of the grid as rows, for renderers and tests.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        (0..self.rows as usize)
            .map(|y| self.row_at(y).to_vec())
            .collect()
    }

    /// Occupancy as text rows (`#` taken, `.` empty). Handy in test failures.
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.rows as usize)
            .map(|y| {
                self.row_at(y)
                    .iter()
                    .map(|cell| if cell.taken { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_COLS, crate::types::DEFAULT_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    fn red() -> ColorSpec {
        ColorSpec::solid(Rgb::new(255, 0, 0))
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(10, 20);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_cells_know_their_coordinates() {
        let board = Board::new(10, 20);
        for (i, cell) in board.cells().iter().enumerate() {
            assert_eq!(cell.x as usize, i % 10);
            assert_eq!(cell.y as usize, i / 10);
            assert!(!cell.taken);
        }
    }

    #[test]
    fn test_collapse_fixes_stored_y() {
        let mut board = Board::new(4, 6);
        board.fill(1, 2, red(), None);
        for x in 0..4 {
            board.fill(x, 5, red(), None);
        }

        assert_eq!(board.clear_and_collapse(&[5]), 1);

        let moved = board.cell(1, 3);
        assert!(moved.taken);
        assert_eq!((moved.x, moved.y), (1, 3));
        assert!(!board.cell(1, 2).taken);
        assert_eq!(board.cell(1, 2).y, 2);
    }

    #[test]
    #[should_panic]
    fn test_row_at_out_of_range_panics() {
        let board = Board::new(10, 20);
        let _ = board.row_at(20);
    }

    #[test]
    #[should_panic(expected = "outside board")]
    fn test_is_row_full_out_of_range_panics() {
        let board = Board::new(10, 20);
        let _ = board.is_row_full(20);
    }

    #[test]
    #[should_panic(expected = "outside board")]
    fn test_is_row_occupied_out_of_range_panics() {
        let board = Board::new(10, 20);
        let _ = board.is_row_occupied(25);
    }

    #[test]
    #[should_panic(expected = "outside board")]
    fn test_clear_row_out_of_range_panics() {
        let mut board = Board::new(4, 6);
        board.clear_row(6);
    }
}
