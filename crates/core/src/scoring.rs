//! Scoring module - line clear points and level progression
//!
//! Points come straight from the line-clear table with no level multiplier.
//! Levels advance on a per-level line counter that keeps the remainder.

use crate::types::{FALL_STEP_MS, HARD_DROP_POINTS_PER_ROW, LINE_SCORES, MIN_FALL_MS};

/// Points for clearing `lines` rows at once.
///
/// Table-driven, not additive: four rows score 1200, not 4 x 40.
/// Counts above 4 cannot happen with four-cell pieces but are capped at the
/// 4-row award anyway.
pub fn line_clear_score(lines: usize) -> u32 {
    LINE_SCORES[lines.min(LINE_SCORES.len() - 1)]
}

/// Points for a hard drop that descended `rows` rows
pub fn hard_drop_score(rows: u32) -> u32 {
    rows * HARD_DROP_POINTS_PER_ROW
}

/// Lines needed to leave `level`.
///
/// - Levels 1-10: `level * 10`
/// - Levels 11-15: 100
/// - Above 15: 150
pub fn level_threshold(level: u32) -> u32 {
    match level {
        0..=10 => level.max(1) * 10,
        11..=15 => 100,
        _ => 150,
    }
}

/// Gravity interval for a level, in milliseconds.
///
/// Starts at `initial_ms` on level 1, drops 50ms per level, never below 100ms.
pub fn fall_interval_ms(level: u32, initial_ms: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(FALL_STEP_MS);
    initial_ms.saturating_sub(speedup).max(MIN_FALL_MS)
}

/// Current level and the lines counted towards the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    level: u32,
    lines_in_level: u32,
}

impl LevelProgress {
    pub fn new() -> Self {
        Self {
            level: 1,
            lines_in_level: 0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_in_level(&self) -> u32 {
        self.lines_in_level
    }

    /// Count cleared lines and level up as often as they allow.
    /// Returns the number of levels gained.
    pub fn add_lines(&mut self, lines: u32) -> u32 {
        self.lines_in_level += lines;
        let mut gained = 0;
        loop {
            let threshold = level_threshold(self.level);
            if self.lines_in_level < threshold {
                break;
            }
            self.lines_in_level -= threshold;
            self.level += 1;
            gained += 1;
        }
        gained
    }
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BASE_FALL_MS;

    #[test]
    fn test_line_scores() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 40);
        assert_eq!(line_clear_score(2), 100);
        assert_eq!(line_clear_score(3), 300);
        assert_eq!(line_clear_score(4), 1200);
    }

    #[test]
    fn test_line_scores_are_capped() {
        assert_eq!(line_clear_score(5), 1200);
        assert_eq!(line_clear_score(20), 1200);
    }

    #[test]
    fn test_hard_drop_score() {
        assert_eq!(hard_drop_score(0), 0);
        assert_eq!(hard_drop_score(17), 17);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_threshold(1), 10);
        assert_eq!(level_threshold(2), 20);
        assert_eq!(level_threshold(10), 100);
        assert_eq!(level_threshold(11), 100);
        assert_eq!(level_threshold(15), 100);
        assert_eq!(level_threshold(16), 150);
        assert_eq!(level_threshold(40), 150);
    }

    #[test]
    fn test_ten_lines_reach_level_two() {
        let mut progress = LevelProgress::new();
        for _ in 0..9 {
            assert_eq!(progress.add_lines(1), 0);
        }
        assert_eq!(progress.add_lines(1), 1);
        assert_eq!(progress.level(), 2);
        assert_eq!(progress.lines_in_level(), 0);
    }

    #[test]
    fn test_remainder_carries_forward() {
        let mut progress = LevelProgress::new();
        assert_eq!(progress.add_lines(15), 1);
        assert_eq!(progress.level(), 2);
        assert_eq!(progress.lines_in_level(), 5);

        // 15 more reaches the level-2 threshold of 20
        assert_eq!(progress.add_lines(15), 1);
        assert_eq!(progress.level(), 3);
        assert_eq!(progress.lines_in_level(), 10);
    }

    #[test]
    fn test_large_batch_can_skip_levels() {
        let mut progress = LevelProgress::new();
        // 10 + 20 = 30 lines clear levels 1 and 2
        assert_eq!(progress.add_lines(31), 2);
        assert_eq!(progress.level(), 3);
        assert_eq!(progress.lines_in_level(), 1);
    }

    #[test]
    fn test_fall_intervals() {
        assert_eq!(fall_interval_ms(1, BASE_FALL_MS), 1000);
        assert_eq!(fall_interval_ms(2, BASE_FALL_MS), 950);
        assert_eq!(fall_interval_ms(10, BASE_FALL_MS), 550);
        assert_eq!(fall_interval_ms(19, BASE_FALL_MS), 100);
        assert_eq!(fall_interval_ms(50, BASE_FALL_MS), 100); // Floor at 100
        assert_eq!(fall_interval_ms(1, 80), 100);
    }
}
