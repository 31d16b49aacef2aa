//! Board tests

use contrast_tetris::core::{AbsolutePoint, Board};
use contrast_tetris::types::{BarDirection, ColorSpec, Rgb, DEFAULT_COLS, DEFAULT_ROWS, SPAWN_MARGIN};

fn white() -> ColorSpec {
    ColorSpec::solid(Rgb::WHITE)
}

fn fill_row(board: &mut Board, y: i8, skip: &[i8]) {
    for x in 0..board.width() as i8 {
        if !skip.contains(&x) {
            board.fill(x, y, white(), None);
        }
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::default();
    assert_eq!(board.width(), DEFAULT_COLS);
    assert_eq!(board.height(), DEFAULT_ROWS);
    assert_eq!(board.cells().len(), 200);
    assert_eq!(board.taken_count(), 0);

    // Every cell exists and knows its own coordinates
    for y in 0..DEFAULT_ROWS as usize {
        for x in 0..DEFAULT_COLS as usize {
            let cell = board.cell(x, y);
            assert_eq!((cell.x as usize, cell.y as usize), (x, y));
            assert!(!cell.taken);
        }
    }
}

#[test]
fn test_board_bounds() {
    let board = Board::new(10, 20);

    assert!(board.fits(0, 0));
    assert!(board.fits(9, 19));
    assert!(!board.fits(-1, 0));
    assert!(!board.fits(10, 0));
    assert!(!board.fits(0, 20));

    // Spawn area above the top is addressable but not stored
    assert!(board.fits(0, -SPAWN_MARGIN));
    assert!(!board.fits(0, -SPAWN_MARGIN - 1));
    assert!(board.get(0, -1).is_none());
}

#[test]
fn test_board_fill_and_clear_cell() {
    let mut board = Board::new(10, 20);
    assert!(board.fill(5, 10, white(), Some(BarDirection::Horizontal)));

    let cell = board.get(5, 10).unwrap();
    assert!(cell.taken);
    assert_eq!(cell.color, white());
    assert_eq!(cell.direction, Some(BarDirection::Horizontal));
    assert!(!board.fits(5, 10));

    assert!(board.clear_cell(5, 10));
    assert!(board.fits(5, 10));
    assert!(!board.fill(5, -1, white(), None));
}

#[test]
fn test_lock_cells_writes_only_stored_rows() {
    let mut board = Board::new(10, 20);
    let cells: Vec<AbsolutePoint> = [(3, -1), (3, 0), (4, 0), (5, 0)]
        .into_iter()
        .map(|(x, y)| AbsolutePoint {
            x,
            y,
            color: white(),
            direction: None,
        })
        .collect();

    assert_eq!(board.lock_cells(&cells), 3);
    assert_eq!(board.taken_count(), 3);
    assert!(board.is_row_occupied(0));
}

#[test]
fn test_full_rows_ascending() {
    let mut board = Board::new(10, 20);
    fill_row(&mut board, 19, &[]);
    fill_row(&mut board, 17, &[]);
    fill_row(&mut board, 18, &[4]);

    assert_eq!(board.full_rows(), vec![17, 19]);
    assert!(!board.is_row_full(18));
    assert!(board.is_row_occupied(18));
}

#[test]
fn test_clear_and_collapse_shifts_survivors_down() {
    let mut board = Board::new(4, 6);
    fill_row(&mut board, 5, &[]);
    fill_row(&mut board, 4, &[0]);
    fill_row(&mut board, 3, &[]);
    board.fill(2, 2, white(), None);

    assert_eq!(board.clear_and_collapse(&[3, 5]), 2);
    assert_eq!(
        board.to_ascii(),
        vec!["....", "....", "....", "....", "..#.", ".###"]
    );
    // Moved cells carry their new row
    assert_eq!(board.cell(2, 4).y, 4);
}

#[test]
fn test_multi_row_clear_matches_bottom_up_row_clearing() {
    let mut board = Board::new(10, 20);
    for y in 12..20 {
        // Alternate holes so only some rows are full
        if y % 3 == 0 {
            fill_row(&mut board, y, &[(y % 10) as i8]);
        } else {
            fill_row(&mut board, y, &[]);
        }
    }
    board.fill(7, 11, white(), None);
    let rows = board.full_rows();
    assert!(rows.len() > 1);

    let mut batch = board.clone();
    batch.clear_and_collapse(&rows);

    // Bottom-up, one at a time: each clear shifts the remaining rows down by one
    let mut stepwise = board.clone();
    for (shift, &y) in rows.iter().rev().enumerate() {
        stepwise.clear_row(y + shift);
    }

    assert_eq!(batch, stepwise);
    assert_eq!(batch.taken_count(), board.taken_count() - rows.len() * 10);
}

#[test]
fn test_clear_and_collapse_ignores_row_order() {
    let mut board = Board::new(6, 12);
    for y in [4, 7, 8, 11] {
        fill_row(&mut board, y, &[]);
    }
    for y in [3, 5, 6, 9, 10] {
        fill_row(&mut board, y, &[(y % 6) as i8]);
    }
    board.fill(2, 1, white(), Some(BarDirection::Vertical));

    let mut ascending = board.clone();
    assert_eq!(ascending.clear_and_collapse(&[4, 7, 8, 11]), 4);

    for order in [[11, 8, 7, 4], [8, 11, 4, 7], [7, 4, 11, 8]] {
        let mut other = board.clone();
        assert_eq!(other.clear_and_collapse(&order), 4, "{order:?}");
        assert_eq!(other, ascending, "{order:?}");
    }
    assert_eq!(ascending.taken_count(), board.taken_count() - 4 * 6);
}

#[test]
fn test_clear_and_collapse_ignores_duplicates() {
    let mut board = Board::new(10, 20);
    fill_row(&mut board, 19, &[]);
    assert_eq!(board.clear_and_collapse(&[19, 19]), 1);
    assert_eq!(board.taken_count(), 0);
}

#[test]
fn test_clear_resets_everything() {
    let mut board = Board::new(10, 20);
    fill_row(&mut board, 10, &[]);
    board.clear();
    assert_eq!(board, Board::new(10, 20));
}

#[test]
fn test_to_rows_matches_cells() {
    let mut board = Board::new(6, 8);
    board.fill(1, 2, white(), None);
    let rows = board.to_rows();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|row| row.len() == 6));
    assert!(rows[2][1].taken);
}
