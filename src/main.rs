//! Terminal runner (default binary).
//!
//! Loads the game config from the environment, then runs the engine in a
//! crossterm loop: render, poll input until the next tick, advance.

mod logging;

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};

use contrast_tetris::core::{GameConfig, GameEngine, GameSnapshot};
use contrast_tetris::input::{handle_event, should_quit};
use contrast_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use contrast_tetris::types::{GameCommand, GameEvent, TICK_MS};

fn main() -> Result<()> {
    logging::init_from_env().context("failed to set up logging")?;

    let mut config = GameConfig::from_env().context("invalid game configuration")?;
    if config.seed.is_none() {
        config.seed = Some(clock_seed());
    }
    info!(
        "starting {}x{} game, variant {}, seed {:?}",
        config.cols,
        config.rows,
        config.variant.as_str(),
        config.seed
    );
    let mut engine = GameEngine::new(config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut engine);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, engine: &mut GameEngine) -> Result<()> {
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        engine.snapshot_into(&mut snap);
        GameView::fit(viewport, snap.cols, snap.rows).render_into(&snap, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let ev = event::read()?;
            match &ev {
                Event::Key(key) if key.kind == KeyEventKind::Press && should_quit(*key) => {
                    return Ok(());
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }

            if let Some(command) = handle_event(&ev) {
                // Enter on the game-over screen starts a new game.
                let command = match command {
                    GameCommand::Start if engine.is_game_over() => GameCommand::Reset,
                    other => other,
                };
                // Rejections are expected (e.g. moving into a wall); the engine traces them.
                let _ = engine.apply(command);
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            engine.advance(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }

        while let Some(event) = engine.poll_event() {
            match event {
                GameEvent::GameOver { score } => info!("final score {score}"),
                other => debug!("{other:?}"),
            }
        }
    }
}

/// Seed for games without a configured one
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
