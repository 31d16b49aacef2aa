//! Engine module - the falling-piece state machine
//!
//! Ties together the board, the piece factory, scoring and the scheduler.
//! The host drives it with [`GameEngine::advance`] from its frame loop and
//! feeds player input through the command methods (or [`GameEngine::apply`]).
//!
//! ```text
//! Welcome -> Falling <-> Locking -> LineClearing -> Falling
//!                           \------------------------> GameOver
//! ```
//!
//! Pausing is a flag on top of the phase, not a phase of its own.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use log::{debug, info, trace};

use crate::board::{Board, Cell};
use crate::config::{GameConfig, DEFAULT_SEED};
use crate::error::{ConfigError, Rejection};
use crate::pieces::{try_rotate, AbsolutePoint, RelativePoint, Tetromino};
use crate::rng::PieceFactory;
use crate::scheduler::{Deferred, Scheduler};
use crate::scoring::{fall_interval_ms, hard_drop_score, line_clear_score, LevelProgress};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    GameCommand, GameEvent, Phase, PieceKind, LOSS_ROW, MAX_PENDING_EVENTS, PREVIEW_LEN,
    RESUME_COUNTDOWN_MS, RESUME_COUNTDOWN_STEP_MS, SPAWN_Y,
};

/// The falling piece and its pivot position on the board
#[derive(Debug, Clone)]
struct ActivePiece {
    piece: Tetromino,
    x: i8,
    y: i8,
}

/// Result of one gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Moved,
    /// Just came to rest; the lock delay is armed
    Grounded,
    /// Already resting, waiting for the lock check
    Resting,
    /// Came to rest and locked at once (zero lock delay)
    Locked,
}

/// A single game.
///
/// Engines share nothing, so any number can run side by side.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    factory: PieceFactory,
    active: Option<ActivePiece>,
    preview: ArrayVec<Tetromino, PREVIEW_LEN>,
    phase: Phase,
    paused: bool,
    score: u32,
    lines: u32,
    progress: LevelProgress,
    fall_interval_ms: u32,
    fall_timer_ms: u32,
    /// Total time fed through `advance`
    clock_ms: u64,
    /// Bumped on every spawn and reset; stale deferred work is dropped
    generation: u32,
    scheduler: Scheduler,
    clearing_rows: Vec<usize>,
    events: VecDeque<GameEvent>,
}

impl GameEngine {
    /// Create a game on the welcome screen. Call [`GameEngine::start`] to play.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let factory = PieceFactory::new(config.seed_or_default(), config.palettes.clone());
        Self::with_factory(config, factory)
    }

    /// Create a game whose pieces come from `factory` (e.g. a scripted one).
    pub fn with_factory(config: GameConfig, factory: PieceFactory) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, factory))
    }

    /// Default configuration with the given seed
    pub fn with_seed(seed: u32) -> Self {
        let config = GameConfig::default();
        let factory = PieceFactory::new(seed, config.palettes.clone());
        Self::from_parts(config, factory)
    }

    fn from_parts(config: GameConfig, factory: PieceFactory) -> Self {
        let mut engine = Self {
            board: Board::new(config.cols, config.rows),
            factory,
            active: None,
            preview: ArrayVec::new(),
            phase: Phase::Welcome,
            paused: false,
            score: 0,
            lines: 0,
            progress: LevelProgress::new(),
            fall_interval_ms: fall_interval_ms(1, config.initial_fall_ms),
            fall_timer_ms: 0,
            clock_ms: 0,
            generation: 0,
            scheduler: Scheduler::new(),
            clearing_rows: Vec::new(),
            events: VecDeque::with_capacity(MAX_PENDING_EVENTS),
            config,
        };
        engine.fill_preview();
        engine
    }

    // ----- commands -------------------------------------------------------

    /// Leave the welcome screen and spawn the first piece
    pub fn start(&mut self) -> Result<(), Rejection> {
        let result = if self.phase == Phase::Welcome {
            info!("game started (seed {})", self.factory.seed());
            self.spawn_next();
            Ok(())
        } else {
            Err(Rejection::NotPlayable)
        };
        self.finish_command(GameCommand::Start, result)
    }

    pub fn move_left(&mut self) -> Result<(), Rejection> {
        let result = self.shift(-1);
        self.finish_command(GameCommand::MoveLeft, result)
    }

    pub fn move_right(&mut self) -> Result<(), Rejection> {
        let result = self.shift(1);
        self.finish_command(GameCommand::MoveRight, result)
    }

    /// One row down, same as a gravity step.
    ///
    /// When the piece cannot fall this arms the lock delay; once it is armed
    /// further attempts are rejected as [`Rejection::Blocked`].
    pub fn move_down(&mut self) -> Result<(), Rejection> {
        let result = match self.ensure_active() {
            Ok(()) => match self.gravity_step() {
                Step::Resting => Err(Rejection::Blocked),
                Step::Moved | Step::Grounded | Step::Locked => Ok(()),
            },
            Err(rejection) => Err(rejection),
        };
        self.finish_command(GameCommand::MoveDown, result)
    }

    /// Advance to the next rotation state, nudging sideways up to 4 cells.
    pub fn rotate(&mut self) -> Result<(), Rejection> {
        let result = self.rotate_active();
        self.finish_command(GameCommand::Rotate, result)
    }

    /// Drop to the lowest free position and lock without lock delay.
    /// Scores one point per row descended.
    pub fn hard_drop(&mut self) -> Result<(), Rejection> {
        let result = self.drop_to_floor();
        self.finish_command(GameCommand::HardDrop, result)
    }

    /// Pause the game. Cancels a running resume countdown.
    ///
    /// Calling it while already paused changes nothing, so hosts can call it
    /// whenever focus is lost.
    pub fn pause(&mut self) -> Result<(), Rejection> {
        let result = self.pause_inner();
        self.finish_command(GameCommand::Pause, result)
    }

    /// Start the resume countdown (or resume at once if it is disabled).
    pub fn resume(&mut self) -> Result<(), Rejection> {
        let result = self.resume_inner();
        self.finish_command(GameCommand::Resume, result)
    }

    /// Throw the current game away and start a fresh one immediately.
    ///
    /// The piece sequence continues from the factory rather than replaying
    /// the previous game.
    pub fn reset(&mut self) -> Result<(), Rejection> {
        self.board = Board::new(self.config.cols, self.config.rows);
        self.active = None;
        self.preview.clear();
        self.paused = false;
        self.score = 0;
        self.lines = 0;
        self.progress = LevelProgress::new();
        self.fall_interval_ms = fall_interval_ms(1, self.config.initial_fall_ms);
        self.fall_timer_ms = 0;
        self.scheduler.clear();
        self.clearing_rows.clear();
        self.events.clear();
        self.generation = self.generation.wrapping_add(1);
        info!("game reset");

        self.fill_preview();
        self.spawn_next();
        self.finish_command(GameCommand::Reset, Ok(()))
    }

    /// One explicit gravity step, for hosts that run their own fall timer.
    pub fn tick(&mut self) -> Result<(), Rejection> {
        self.ensure_active()?;
        self.gravity_step();
        debug_assert!(self.check_invariants(), "invariants broken after tick");
        Ok(())
    }

    /// Feed elapsed time: runs gravity at the current fall interval and fires
    /// deferred work (lock checks, line clears, the resume countdown).
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.clock_ms += elapsed_ms as u64;

        if self.is_running() {
            self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
            while self.is_running() && self.fall_timer_ms >= self.fall_interval_ms {
                self.fall_timer_ms -= self.fall_interval_ms;
                if self.gravity_step() == Step::Resting {
                    self.fall_timer_ms = 0;
                    break;
                }
            }
        }

        self.run_due();
        debug_assert!(self.check_invariants(), "invariants broken after advance");
    }

    /// Dispatch a command
    pub fn apply(&mut self, command: GameCommand) -> Result<(), Rejection> {
        match command {
            GameCommand::Start => self.start(),
            GameCommand::MoveLeft => self.move_left(),
            GameCommand::MoveRight => self.move_right(),
            GameCommand::MoveDown => self.move_down(),
            GameCommand::Rotate => self.rotate(),
            GameCommand::HardDrop => self.hard_drop(),
            GameCommand::Pause => self.pause(),
            GameCommand::Resume => self.resume(),
            GameCommand::TogglePause => {
                if self.paused && !self.is_counting_down() {
                    self.resume()
                } else {
                    self.pause()
                }
            }
            GameCommand::Reset => self.reset(),
        }
    }

    // ----- queries --------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Copy of the board, row by row
    pub fn board_snapshot(&self) -> Vec<Vec<Cell>> {
        self.board.to_rows()
    }

    pub fn active_piece(&self) -> Option<&Tetromino> {
        self.active.as_ref().map(|a| &a.piece)
    }

    /// Pivot position of the active piece
    pub fn active_position(&self) -> Option<(i8, i8)> {
        self.active.as_ref().map(|a| (a.x, a.y))
    }

    /// Board cells covered by the active piece; empty when nothing is falling
    pub fn active_piece_cells(&self) -> ArrayVec<AbsolutePoint, 4> {
        self.active
            .as_ref()
            .map(|a| a.piece.absolute_cells(a.x, a.y))
            .unwrap_or_default()
    }

    /// Cells of the next piece, relative to its pivot
    pub fn next_piece_cells(&self) -> &[RelativePoint] {
        self.preview_cells(0).unwrap_or(&[])
    }

    /// Cells of the `index`-th upcoming piece (0 = next, 1 = the one after)
    pub fn preview_cells(&self, index: usize) -> Option<&[RelativePoint]> {
        self.preview.get(index).map(|p| p.cells())
    }

    pub fn preview_kinds(&self) -> impl Iterator<Item = Option<PieceKind>> + '_ {
        self.preview.iter().map(|p| p.kind())
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total lines cleared this game
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    /// Lines counted towards the next level
    pub fn lines_in_level(&self) -> u32 {
        self.progress.lines_in_level()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// True while paused, including during the resume countdown
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_counting_down(&self) -> bool {
        self.scheduler.is_pending(Deferred::ResumeCountdown)
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    /// Rows flashing before they collapse, ascending. Empty outside line clears.
    pub fn clearing_rows(&self) -> &[usize] {
        &self.clearing_rows
    }

    /// Countdown digit (3, 2, 1) while resuming, `None` otherwise
    pub fn resume_countdown(&self) -> Option<u32> {
        let remaining = self
            .scheduler
            .remaining_ms(Deferred::ResumeCountdown, self.clock_ms)?;
        let digits = (RESUME_COUNTDOWN_MS / RESUME_COUNTDOWN_STEP_MS) as u64;
        let total = self.config.resume_countdown_ms.max(1) as u64;
        Some((remaining * digits).div_ceil(total).clamp(1, digits) as u32)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn seed(&self) -> u32 {
        self.factory.seed()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Take the oldest pending event
    pub fn poll_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Number of events waiting for [`GameEngine::poll_event`].
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Queue an event, dropping the oldest once a host stops polling.
    fn push_event(&mut self, event: GameEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Fill `out`, reusing its allocations where possible
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.cols = self.board.width();
        out.rows = self.board.height();
        out.board.resize_with(self.board.height() as usize, Vec::new);
        for (y, row) in out.board.iter_mut().enumerate() {
            row.clear();
            row.extend_from_slice(self.board.row_at(y));
        }

        out.active = self.active.as_ref().map(|a| ActiveSnapshot {
            kind: a.piece.kind(),
            rotation: a.piece.rotation_index(),
            x: a.x,
            y: a.y,
            cells: a.piece.absolute_cells(a.x, a.y).to_vec(),
        });
        out.preview.clear();
        out.preview
            .extend(self.preview.iter().map(|p| p.cells().to_vec()));

        out.phase = self.phase;
        out.paused = self.paused;
        out.countdown = self.resume_countdown();
        out.clearing_rows.clone_from(&self.clearing_rows);
        out.variant = self.config.variant;
        out.seed = self.factory.seed();
        out.generation = self.generation;
        out.score = self.score;
        out.level = self.progress.level();
        out.lines = self.lines;
        out.lines_in_level = self.progress.lines_in_level();
        out.fall_interval_ms = self.fall_interval_ms;
    }

    /// Every active cell is on the board and not taken, and the phase agrees
    /// with what is stored.
    pub fn check_invariants(&self) -> bool {
        let piece_ok = match &self.active {
            Some(a) => a
                .piece
                .cells()
                .iter()
                .all(|p| self.board.fits(a.x + p.x, a.y + p.y)),
            None => !matches!(self.phase, Phase::Falling | Phase::Locking),
        };
        let clearing_ok = self.clearing_rows.is_empty() != (self.phase == Phase::LineClearing);
        piece_ok && clearing_ok && self.preview.is_full()
    }

    // ----- test hooks -----------------------------------------------------

    /// Direct board access for setting up scenarios.
    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Swap the falling piece for a fresh `kind` at the spawn position.
    #[doc(hidden)]
    pub fn replace_active(&mut self, kind: PieceKind) -> Result<(), Rejection> {
        self.ensure_active()?;
        let piece = self
            .factory
            .build(kind.index(), self.config.variant, self.config.palette_index);
        let (x, y) = (self.spawn_x(), SPAWN_Y);
        if !self.fits(&piece, x, y) {
            return Err(Rejection::Blocked);
        }
        self.active = Some(ActivePiece { piece, x, y });
        self.phase = Phase::Falling;
        self.fall_timer_ms = 0;
        self.scheduler.cancel(Deferred::LockCheck);
        Ok(())
    }

    // ----- internals ------------------------------------------------------

    fn finish_command(
        &self,
        command: GameCommand,
        result: Result<(), Rejection>,
    ) -> Result<(), Rejection> {
        if let Err(rejection) = result {
            trace!("{} rejected: {}", command.as_str(), rejection.message());
        }
        debug_assert!(
            self.check_invariants(),
            "invariants broken after {}",
            command.as_str()
        );
        result
    }

    fn is_running(&self) -> bool {
        !self.paused && matches!(self.phase, Phase::Falling | Phase::Locking)
    }

    /// Commands that touch the piece need an unpaused game with a piece falling.
    fn ensure_active(&self) -> Result<(), Rejection> {
        if self.paused {
            return Err(Rejection::NotPlayable);
        }
        match self.phase {
            Phase::Falling | Phase::Locking if self.active.is_some() => Ok(()),
            Phase::Falling | Phase::Locking | Phase::LineClearing => Err(Rejection::NoActivePiece),
            Phase::Welcome | Phase::GameOver => Err(Rejection::NotPlayable),
        }
    }

    fn spawn_x(&self) -> i8 {
        (self.board.width() / 2) as i8 - 1
    }

    fn fits(&self, piece: &Tetromino, x: i8, y: i8) -> bool {
        piece
            .cells()
            .iter()
            .all(|p| self.board.fits(x + p.x, y + p.y))
    }

    fn fill_preview(&mut self) {
        while !self.preview.is_full() {
            let piece = self
                .factory
                .next(self.config.variant, self.config.palette_index);
            self.preview.push(piece);
        }
    }

    fn spawn_next(&mut self) {
        self.fill_preview();
        let piece = self.preview.remove(0);
        self.fill_preview();

        self.generation = self.generation.wrapping_add(1);
        self.fall_timer_ms = 0;

        let kind = piece.kind();
        let (x, y) = (self.spawn_x(), SPAWN_Y);
        if !self.fits(&piece, x, y) {
            debug!("no room to spawn {:?}", kind);
            self.end_game();
            return;
        }

        self.active = Some(ActivePiece { piece, x, y });
        self.phase = Phase::Falling;
        debug!("spawned {:?} (generation {})", kind, self.generation);
        self.push_event(GameEvent::PieceSpawned { kind });
    }

    fn shift(&mut self, dx: i8) -> Result<(), Rejection> {
        self.ensure_active()?;
        let active = self.active.as_ref().ok_or(Rejection::NoActivePiece)?;
        if !self.fits(&active.piece, active.x + dx, active.y) {
            return Err(Rejection::Blocked);
        }
        if let Some(active) = self.active.as_mut() {
            active.x += dx;
        }
        Ok(())
    }

    fn rotate_active(&mut self) -> Result<(), Rejection> {
        self.ensure_active()?;
        let active = self.active.as_ref().ok_or(Rejection::NoActivePiece)?;
        let board = &self.board;
        let kick = try_rotate(&active.piece, active.x, active.y, |x, y| board.fits(x, y));

        match kick {
            Some(dx) => {
                if let Some(active) = self.active.as_mut() {
                    active.piece.commit_rotation();
                    active.x += dx;
                }
                Ok(())
            }
            None => {
                self.push_event(GameEvent::RotationDenied);
                Err(Rejection::RotationDenied)
            }
        }
    }

    fn drop_to_floor(&mut self) -> Result<(), Rejection> {
        self.ensure_active()?;
        let active = self.active.as_ref().ok_or(Rejection::NoActivePiece)?;

        let mut rows: i8 = 0;
        while self.fits(&active.piece, active.x, active.y + rows + 1) {
            rows += 1;
        }
        if let Some(active) = self.active.as_mut() {
            active.y += rows;
        }

        self.score += hard_drop_score(rows as u32);
        self.scheduler.cancel(Deferred::LockCheck);
        self.lock_active(true);
        Ok(())
    }

    fn gravity_step(&mut self) -> Step {
        let Some(active) = self.active.as_ref() else {
            return Step::Resting;
        };

        if self.fits(&active.piece, active.x, active.y + 1) {
            if let Some(active) = self.active.as_mut() {
                active.y += 1;
            }
            if self.phase == Phase::Locking {
                self.scheduler.cancel(Deferred::LockCheck);
                self.phase = Phase::Falling;
            }
            return Step::Moved;
        }

        if self.phase == Phase::Locking {
            return Step::Resting;
        }

        self.phase = Phase::Locking;
        if self.config.lock_delay_ms == 0 {
            self.lock_active(false);
            return Step::Locked;
        }
        self.scheduler.schedule(
            Deferred::LockCheck,
            self.clock_ms,
            self.config.lock_delay_ms,
            self.generation,
        );
        Step::Grounded
    }

    fn run_due(&mut self) {
        while let Some(entry) = self
            .scheduler
            .pop_due(self.clock_ms, self.generation, self.paused)
        {
            match entry.kind {
                Deferred::LockCheck => self.lock_check(),
                Deferred::FinishLineClear => self.finish_line_clear(),
                Deferred::ResumeCountdown => self.finish_resume(),
            }
        }
    }

    /// Lock delay expired: lock unless the player moved the piece somewhere
    /// it can fall again.
    fn lock_check(&mut self) {
        if self.phase != Phase::Locking {
            return;
        }
        let Some(active) = self.active.as_ref() else {
            return;
        };
        if self.fits(&active.piece, active.x, active.y + 1) {
            self.phase = Phase::Falling;
        } else {
            self.lock_active(false);
        }
    }

    fn lock_active(&mut self, hard_drop: bool) {
        let Some(active) = self.active.take() else {
            return;
        };
        let kind = active.piece.kind();
        let cells = active.piece.absolute_cells(active.x, active.y);
        let written = self.board.lock_cells(&cells);
        debug!("locked {:?} at ({}, {})", kind, active.x, active.y);
        self.push_event(GameEvent::PieceLocked { kind, hard_drop });

        // Cells left above the top have nowhere to go: treat as a loss too.
        if written < cells.len() || self.board.is_row_occupied(LOSS_ROW) {
            self.end_game();
            return;
        }

        let rows = self.board.full_rows();
        if rows.is_empty() {
            self.spawn_next();
        } else {
            self.begin_line_clear(rows);
        }
    }

    fn begin_line_clear(&mut self, rows: Vec<usize>) {
        let count = rows.len();
        let points = line_clear_score(count);
        self.score += points;
        self.lines += count as u32;
        info!("cleared {count} rows for {points} points");
        self.push_event(GameEvent::LinesCleared {
            rows: rows.clone(),
            points,
        });

        if self.progress.add_lines(count as u32) > 0 {
            let level = self.progress.level();
            self.fall_interval_ms = fall_interval_ms(level, self.config.initial_fall_ms);
            info!("level {level}, fall interval {}ms", self.fall_interval_ms);
            self.push_event(GameEvent::LevelUp { level });
        }

        self.clearing_rows = rows;
        self.phase = Phase::LineClearing;
        if self.config.line_clear_ms == 0 {
            self.finish_line_clear();
        } else {
            self.scheduler.schedule(
                Deferred::FinishLineClear,
                self.clock_ms,
                self.config.line_clear_ms,
                self.generation,
            );
        }
    }

    fn finish_line_clear(&mut self) {
        if self.phase != Phase::LineClearing {
            return;
        }
        let rows = std::mem::take(&mut self.clearing_rows);
        self.board.clear_and_collapse(&rows);
        self.spawn_next();
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        self.active = None;
        self.fall_timer_ms = 0;
        self.scheduler.clear();
        self.clearing_rows.clear();
        info!("game over, score {}", self.score);
        self.push_event(GameEvent::GameOver { score: self.score });
    }

    fn pause_inner(&mut self) -> Result<(), Rejection> {
        if matches!(self.phase, Phase::Welcome | Phase::GameOver) {
            return Err(Rejection::NotPlayable);
        }
        if self.paused {
            if self.scheduler.cancel(Deferred::ResumeCountdown) {
                debug!("resume countdown cancelled");
                return Ok(());
            }
            return Err(Rejection::AlreadyPaused);
        }
        self.paused = true;
        info!("paused");
        self.push_event(GameEvent::Paused);
        Ok(())
    }

    fn resume_inner(&mut self) -> Result<(), Rejection> {
        if !self.paused {
            return Err(Rejection::NotPaused);
        }
        if self.is_counting_down() {
            return Ok(());
        }
        if self.config.resume_countdown_ms == 0 {
            self.finish_resume();
        } else {
            self.scheduler.schedule(
                Deferred::ResumeCountdown,
                self.clock_ms,
                self.config.resume_countdown_ms,
                self.generation,
            );
        }
        Ok(())
    }

    fn finish_resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        info!("resumed");
        self.push_event(GameEvent::Resumed);
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorPalette;
    use crate::types::{ColorSpec, Rgb, LINE_CLEAR_ANIMATION_MS, LOCK_DELAY_MS};

    fn scripted(kinds: &[PieceKind]) -> GameEngine {
        let config = GameConfig::default();
        let factory = PieceFactory::scripted(1, ColorPalette::defaults(), kinds.to_vec());
        GameEngine::with_factory(config, factory).unwrap()
    }

    fn started(kinds: &[PieceKind]) -> GameEngine {
        let mut engine = scripted(kinds);
        engine.start().unwrap();
        engine
    }

    fn fill_row_except(engine: &mut GameEngine, y: i8, gaps: &[i8]) {
        let cols = engine.board().width() as i8;
        for x in 0..cols {
            if !gaps.contains(&x) {
                engine
                    .board_mut()
                    .fill(x, y, ColorSpec::solid(Rgb::WHITE), None);
            }
        }
    }

    #[test]
    fn test_new_engine_waits_on_welcome() {
        let mut engine = GameEngine::with_seed(7);
        assert_eq!(engine.phase(), Phase::Welcome);
        assert!(engine.active_piece().is_none());
        assert_eq!(engine.preview_kinds().count(), PREVIEW_LEN);
        assert_eq!(engine.move_left(), Err(Rejection::NotPlayable));

        engine.advance(5000);
        assert_eq!(engine.phase(), Phase::Welcome);
    }

    #[test]
    fn test_start_spawns_first_preview_piece() {
        let mut engine = scripted(&[PieceKind::T, PieceKind::I, PieceKind::O]);
        assert_eq!(
            engine.preview_kinds().collect::<Vec<_>>(),
            vec![Some(PieceKind::T), Some(PieceKind::I)]
        );

        engine.start().unwrap();
        assert_eq!(engine.active_piece().unwrap().kind(), Some(PieceKind::T));
        assert_eq!(engine.active_position(), Some((4, SPAWN_Y)));
        assert_eq!(
            engine.preview_kinds().collect::<Vec<_>>(),
            vec![Some(PieceKind::I), Some(PieceKind::O)]
        );
        assert_eq!(
            engine.poll_event(),
            Some(GameEvent::PieceSpawned {
                kind: Some(PieceKind::T)
            })
        );
        assert_eq!(engine.start(), Err(Rejection::NotPlayable));
    }

    #[test]
    fn test_gravity_follows_fall_interval() {
        let mut engine = started(&[PieceKind::O]);
        engine.advance(999);
        assert_eq!(engine.active_position(), Some((4, -1)));
        engine.advance(1);
        assert_eq!(engine.active_position(), Some((4, 0)));
        engine.advance(2000);
        assert_eq!(engine.active_position(), Some((4, 2)));
    }

    #[test]
    fn test_lock_delay_then_lock() {
        let mut engine = started(&[PieceKind::O]);
        // O occupies rows y-1..=y; on an empty 20-row board it rests at y = 19.
        for _ in 0..21 {
            engine.tick().unwrap();
        }
        assert_eq!(engine.active_position(), Some((4, 19)));
        assert_eq!(engine.phase(), Phase::Locking);

        engine.advance(LOCK_DELAY_MS - 1);
        assert_eq!(engine.phase(), Phase::Locking);
        engine.advance(1);

        assert_eq!(engine.board().taken_count(), 4);
        assert_eq!(engine.phase(), Phase::Falling);
        assert_eq!(engine.active_position(), Some((4, SPAWN_Y)));
    }

    #[test]
    fn test_slide_off_ledge_cancels_lock() {
        let mut engine = started(&[PieceKind::O]);
        // Ledge under columns 4-5 at row 10; the O rests on it.
        engine
            .board_mut()
            .fill(4, 10, ColorSpec::solid(Rgb::WHITE), None);
        engine
            .board_mut()
            .fill(5, 10, ColorSpec::solid(Rgb::WHITE), None);
        while engine.phase() == Phase::Falling {
            engine.tick().unwrap();
        }
        assert_eq!(engine.active_position(), Some((4, 9)));

        for _ in 0..2 {
            engine.move_right().unwrap();
        }
        engine.advance(LOCK_DELAY_MS);
        assert_eq!(engine.phase(), Phase::Falling);
        assert_eq!(engine.board().taken_count(), 2);
    }

    #[test]
    fn test_stale_lock_check_ignored_after_hard_drop() {
        let mut engine = started(&[PieceKind::O, PieceKind::I]);
        while engine.phase() == Phase::Falling {
            engine.tick().unwrap();
        }
        engine.hard_drop().unwrap();
        let taken = engine.board().taken_count();

        engine.advance(LOCK_DELAY_MS);
        assert_eq!(engine.board().taken_count(), taken);
        assert_eq!(engine.active_piece().unwrap().kind(), Some(PieceKind::I));
    }

    #[test]
    fn test_line_clear_waits_for_animation() {
        let mut engine = started(&[PieceKind::I]);
        fill_row_except(&mut engine, 19, &[3, 4, 5, 6]);
        engine.hard_drop().unwrap();

        assert_eq!(engine.phase(), Phase::LineClearing);
        assert_eq!(engine.clearing_rows(), &[19]);
        assert_eq!(engine.score(), 20 + 40);
        assert!(engine.active_piece().is_none());
        assert_eq!(engine.move_left(), Err(Rejection::NoActivePiece));

        engine.advance(LINE_CLEAR_ANIMATION_MS);
        assert_eq!(engine.phase(), Phase::Falling);
        assert!(engine.clearing_rows().is_empty());
        assert_eq!(engine.board().taken_count(), 0);
        assert_eq!(engine.lines(), 1);
    }

    #[test]
    fn test_rotation_denied_leaves_state() {
        let mut engine = started(&[PieceKind::I]);
        // Walls of taken cells leave no room for the vertical I.
        for y in 0..20 {
            for x in 0..10 {
                engine
                    .board_mut()
                    .fill(x, y, ColorSpec::solid(Rgb::WHITE), None);
            }
        }
        let before = engine.active_piece_cells();
        assert_eq!(engine.rotate(), Err(Rejection::RotationDenied));
        assert_eq!(engine.active_piece_cells(), before);
        assert_eq!(engine.active_piece().unwrap().rotation_index(), 0);
        let events: Vec<_> = std::iter::from_fn(|| engine.poll_event()).collect();
        assert!(events.contains(&GameEvent::RotationDenied));
    }

    #[test]
    fn test_pause_holds_gravity_and_deferred_work() {
        let mut engine = started(&[PieceKind::O]);
        engine.pause().unwrap();
        assert_eq!(engine.pause(), Err(Rejection::AlreadyPaused));
        assert_eq!(engine.move_left(), Err(Rejection::NotPlayable));

        engine.advance(10_000);
        assert_eq!(engine.active_position(), Some((4, SPAWN_Y)));
    }

    #[test]
    fn test_resume_countdown() {
        let mut engine = started(&[PieceKind::O]);
        engine.pause().unwrap();
        engine.resume().unwrap();

        assert!(engine.is_paused());
        assert_eq!(engine.resume_countdown(), Some(3));
        engine.advance(350);
        assert_eq!(engine.resume_countdown(), Some(2));
        engine.advance(350);
        assert_eq!(engine.resume_countdown(), Some(1));
        assert_eq!(engine.move_left(), Err(Rejection::NotPlayable));
        engine.advance(350);

        assert!(!engine.is_paused());
        assert_eq!(engine.resume_countdown(), None);
        assert!(engine.move_left().is_ok());
    }

    #[test]
    fn test_pause_during_countdown_cancels_it() {
        let mut engine = started(&[PieceKind::O]);
        engine.pause().unwrap();
        engine.resume().unwrap();
        engine.advance(500);
        engine.pause().unwrap();

        engine.advance(5000);
        assert!(engine.is_paused());
        assert!(!engine.is_counting_down());
    }

    #[test]
    fn test_toggle_pause() {
        let config = GameConfig {
            resume_countdown_ms: 0,
            ..GameConfig::default()
        };
        let mut engine = GameEngine::new(config).unwrap();
        engine.start().unwrap();

        engine.apply(GameCommand::TogglePause).unwrap();
        assert!(engine.is_paused());
        engine.apply(GameCommand::TogglePause).unwrap();
        assert!(!engine.is_paused());
    }

    #[test]
    fn test_replace_active() {
        let mut engine = started(&[PieceKind::O]);
        engine.replace_active(PieceKind::T).unwrap();
        assert_eq!(engine.active_piece().unwrap().kind(), Some(PieceKind::T));
    }

    #[test]
    fn test_unpolled_events_stay_bounded() {
        let config = GameConfig {
            resume_countdown_ms: 0,
            ..GameConfig::default()
        };
        let mut engine = GameEngine::new(config).unwrap();
        engine.start().unwrap();

        // Each cycle queues Paused and Resumed; nothing is ever polled
        for _ in 0..500 {
            engine.pause().unwrap();
            engine.resume().unwrap();
            assert!(engine.pending_events() <= MAX_PENDING_EVENTS);
        }
        assert_eq!(engine.pending_events(), MAX_PENDING_EVENTS);

        // The oldest events were dropped, the newest kept
        let events: Vec<_> = std::iter::from_fn(|| engine.poll_event()).collect();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PieceSpawned { .. })));
        assert_eq!(events.last(), Some(&GameEvent::Resumed));
        assert_eq!(engine.pending_events(), 0);
    }
}
