//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! Striped contrast cells are drawn with half-block glyphs so one terminal
//! character can show two bands: `▌` for vertical bars (foreground left,
//! background right) and `▀` for horizontal bars (foreground top, background
//! bottom).
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, RelativePoint};
use crate::fb::{CellStyle, FrameBuffer, Glyph, Rgb};
use crate::types::{BarDirection, ColorSpec, Phase};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_W: u16 = 18;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    /// Largest cell size that fits a `cols x rows` board plus the side panel.
    ///
    /// Bigger cells resolve more stripe bands, so they are preferred.
    pub fn fit(viewport: Viewport, cols: u8, rows: u8) -> Self {
        [(4, 2), (2, 1)]
            .into_iter()
            .map(|(w, h)| Self::new(w, h))
            .find(|view| {
                let (frame_w, frame_h) = view.frame_size(cols, rows);
                frame_w + 2 + PANEL_W <= viewport.width && frame_h <= viewport.height
            })
            .unwrap_or_default()
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn cell_size(&self) -> (u16, u16) {
        (self.cell_w, self.cell_h)
    }

    /// Board size in terminal cells, border included
    fn frame_size(&self, cols: u8, rows: u8) -> (u16, u16) {
        (
            cols as u16 * self.cell_w + 2,
            rows as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let (frame_w, frame_h) = self.frame_size(snap.cols, snap.rows);
        let start_x = viewport
            .width
            .saturating_sub(frame_w + 2 + PANEL_W)
            / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        let origin = (start_x + 1, start_y + 1);

        fb.fill_rect(
            origin.0,
            origin.1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::new(BOARD_BG, BOARD_BG),
        );
        draw_border(fb, start_x, start_y, frame_w, frame_h);

        // Locked cells
        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (cx, cy) = (x as u16, y as u16);
                if snap.is_clearing(y) {
                    self.fill_cell(fb, origin, cx, cy, '▓', CellStyle::new(Rgb::WHITE, BOARD_BG).bold());
                } else if cell.taken {
                    self.paint_cell(fb, origin, cx, cy, &cell.color, cell.direction);
                } else {
                    self.fill_cell(
                        fb,
                        origin,
                        cx,
                        cy,
                        '·',
                        CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim(),
                    );
                }
            }
        }

        // Active piece; rows above the top stay hidden
        if let Some(active) = &snap.active {
            for p in active.cells.iter().filter(|p| p.x >= 0 && p.y >= 0) {
                self.paint_cell(fb, origin, p.x as u16, p.y as u16, &p.color, p.direction);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x + frame_w + 2, start_y);

        let mid_y = start_y + frame_h / 2;
        match (snap.phase, snap.paused, snap.countdown) {
            (Phase::Welcome, _, _) => {
                draw_centered(fb, start_x, frame_w, mid_y, "PRESS ENTER");
            }
            (Phase::GameOver, _, _) => {
                draw_centered(fb, start_x, frame_w, mid_y, "GAME OVER");
                draw_centered(fb, start_x, frame_w, mid_y + 1, "R: NEW GAME");
            }
            (_, true, Some(digit)) => {
                let mut text = [0u8; 4];
                let s = char::from_digit(digit, 10)
                    .unwrap_or('?')
                    .encode_utf8(&mut text);
                draw_centered(fb, start_x, frame_w, mid_y, s);
            }
            (_, true, None) => draw_centered(fb, start_x, frame_w, mid_y, "▐ ▌ PAUSED"),
            _ => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Draw one board cell in its color: solid, or striped along `direction`.
    fn paint_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: (u16, u16),
        cell_x: u16,
        cell_y: u16,
        color: &ColorSpec,
        direction: Option<BarDirection>,
    ) {
        let bands = color.bands();
        if color.is_solid() {
            self.fill_cell(fb, origin, cell_x, cell_y, '█', CellStyle::new(color.primary(), BOARD_BG));
            return;
        }

        let px = origin.0 + cell_x * self.cell_w;
        let py = origin.1 + cell_y * self.cell_h;
        match direction.unwrap_or(BarDirection::Vertical) {
            BarDirection::Vertical => {
                let slots = 2 * self.cell_w as usize;
                for col in 0..self.cell_w {
                    let left = band_at(bands, 2 * col as usize, slots);
                    let right = band_at(bands, 2 * col as usize + 1, slots);
                    for row in 0..self.cell_h {
                        fb.put_char(px + col, py + row, '▌', CellStyle::new(left, right));
                    }
                }
            }
            BarDirection::Horizontal => {
                let slots = 2 * self.cell_h as usize;
                for row in 0..self.cell_h {
                    let top = band_at(bands, 2 * row as usize, slots);
                    let bottom = band_at(bands, 2 * row as usize + 1, slots);
                    for col in 0..self.cell_w {
                        fb.put_char(px + col, py + row, '▀', CellStyle::new(top, bottom));
                    }
                }
            }
        }
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: (u16, u16),
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = origin.0 + cell_x * self.cell_w;
        let py = origin.1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(PANEL_W) > viewport.width {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);

        let mut y = start_y;
        for (name, n) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, n, value);
            y += 3;
        }

        fb.put_str(panel_x, y, "MODE", label);
        fb.put_str(panel_x, y + 1, snap.variant.as_str(), value);
        y += 3;

        // Preview pieces always use a compact 2x1 cell so both fit.
        let mini = GameView::new(2, 1);
        for (i, name) in ["NEXT", "THEN"].into_iter().enumerate() {
            fb.put_str(panel_x, y, name, label);
            if let Some(cells) = snap.preview.get(i) {
                mini.draw_preview(fb, (panel_x + 2, y + 2), cells);
            }
            y += 6;
        }
    }

    /// Draw a piece from its pivot-relative cells. `pivot` is the screen
    /// position of relative (0, 0).
    fn draw_preview(&self, fb: &mut FrameBuffer, pivot: (u16, u16), cells: &[RelativePoint]) {
        for p in cells {
            let x = pivot.0 as i32 + p.x as i32 * self.cell_w as i32;
            let y = pivot.1 as i32 + p.y as i32 * self.cell_h as i32;
            if x < 0 || y < 0 {
                continue;
            }
            self.paint_cell(fb, (x as u16, y as u16), 0, 0, &p.color, p.direction);
        }
    }
}

/// Band shown in slot `slot` of `slots` sub-cell slots.
fn band_at(bands: &[Rgb], slot: usize, slots: usize) -> Rgb {
    if bands.is_empty() || slots == 0 {
        return Rgb::WHITE;
    }
    bands[(slot * bands.len() / slots).min(bands.len() - 1)]
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_centered(fb: &mut FrameBuffer, start_x: u16, frame_w: u16, y: u16, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    fb.put_str(x, y, text, CellStyle::new(Rgb::WHITE, Rgb::BLACK).bold());
}
