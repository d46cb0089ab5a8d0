//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Only the visible rows of the well are drawn. While paused, on the title
//! screen and after game over the well shows a message instead of the pieces.

use crate::core::pieces::cells;
use crate::core::GameSnapshot;
use crate::fb::{piece_color, CellStyle, FrameBuffer, Glyph, Rgb};
use crate::types::{GameMode, PieceKind, Rotation, BOARD_WIDTH, HIDDEN_ROWS, VISIBLE_ROWS};

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_FG: Rgb = Rgb::new(128, 192, 128);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Keys listed under "CONTROLS" in the side panel
const CONTROLS: [&str; 9] = [
    "A  move left",
    "D  move right",
    "Q  rotate ccw",
    "E  rotate cw",
    "S  drop",
    "P  pause",
    "G  save",
    "C  load",
    "Esc quit",
];

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

/// Where the well sits inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WellRect {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal view of the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
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
        }
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (VISIBLE_ROWS as u16) * self.cell_h;
        let panel_w = 24;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let well = WellRect {
            x: viewport.width.saturating_sub(frame_w + panel_w) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            w: frame_w,
            h: frame_h,
        };

        fb.fill_rect(
            well.x + 1,
            well.y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::new(WELL_BG, WELL_BG),
        );
        draw_border(fb, well, CellStyle::new(Rgb::new(200, 200, 200), BLACK));

        match snap.mode {
            GameMode::Playing => self.draw_pieces(fb, snap, well),
            GameMode::Paused => draw_centered(fb, well, well.h / 2, "PAUSED", true),
            GameMode::NewGame => {
                draw_centered(fb, well, well.h / 3, "TETRIS", true);
                draw_centered(fb, well, well.h * 2 / 3, "Press Enter to Play", false);
            }
            GameMode::GameOver => {
                draw_centered(fb, well, well.h / 3, "GAME OVER", true);
                draw_centered(fb, well, well.h * 2 / 3, "Press Enter to Play Again", false);
            }
        }

        self.draw_side_panel(fb, snap, viewport, well);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_pieces(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, well: WellRect) {
        for (y, row) in snap.board.iter().enumerate().skip(HIDDEN_ROWS as usize) {
            for (x, cell) in row.iter().enumerate() {
                let style = match cell {
                    Some(kind) => CellStyle::new(piece_color(*kind), WELL_BG).bold(),
                    None => CellStyle::new(Rgb::new(90, 90, 100), WELL_BG).dim(),
                };
                let ch = if cell.is_some() { '█' } else { '·' };
                self.fill_board_cell(fb, well, x as i8, y as i8, ch, style);
            }
        }

        let Some(active) = snap.active else {
            return;
        };

        if let Some(ghost_y) = snap.ghost_y {
            let ghost = CellStyle::new(piece_color(active.kind).scale(1, 2), WELL_BG).dim();
            for (dx, dy) in cells(active.kind, active.rotation) {
                self.fill_board_cell(fb, well, active.x + dx, ghost_y + dy, '░', ghost);
            }
        }

        let style = CellStyle::new(piece_color(active.kind), WELL_BG).bold();
        for (dx, dy) in cells(active.kind, active.rotation) {
            self.fill_board_cell(fb, well, active.x + dx, active.y + dy, '█', style);
        }
    }

    /// Fill one board cell given in board coordinates; hidden rows are skipped
    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        well: WellRect,
        x: i8,
        y: i8,
        ch: char,
        style: CellStyle,
    ) {
        let visible_y = y as i16 - HIDDEN_ROWS as i16;
        if x < 0 || x >= BOARD_WIDTH as i8 || !(0..VISIBLE_ROWS as i16).contains(&visible_y) {
            return;
        }
        let px = well.x + 1 + (x as u16) * self.cell_w;
        let py = well.y + 1 + (visible_y as u16) * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        well: WellRect,
    ) {
        let panel_x = well.x.saturating_add(well.w).saturating_add(2);
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = CellStyle::new(PANEL_FG, BLACK).bold();
        let value = CellStyle::new(Rgb::new(220, 220, 220), BLACK);

        let mut y = well.y;
        fb.put_str(panel_x, y, "STATS", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, "Level:", value);
        fb.put_u32(panel_x + 7, y, snap.level, value);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, "Score:", value);
        fb.put_u32(panel_x + 7, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        self.draw_preview(fb, panel_x, y, snap.next);
        y = y.saturating_add(5);

        fb.put_str(panel_x, y, "CONTROLS", label);
        y = y.saturating_add(1);
        for line in CONTROLS {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, value);
            y = y.saturating_add(1);
        }
    }

    /// Next piece in its spawn rotation inside a 4x4 box
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let style = CellStyle::new(piece_color(kind), BLACK).bold();
        for (dx, dy) in cells(kind, Rotation::North) {
            let px = x + (dx as u16) * self.cell_w;
            let py = y + (dy as u16) * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, r: WellRect, style: CellStyle) {
    if r.w < 2 || r.h < 2 {
        return;
    }

    fb.put_char(r.x, r.y, '┌', style);
    fb.put_char(r.x + r.w - 1, r.y, '┐', style);
    fb.put_char(r.x, r.y + r.h - 1, '└', style);
    fb.put_char(r.x + r.w - 1, r.y + r.h - 1, '┘', style);

    for dx in 1..r.w - 1 {
        fb.put_char(r.x + dx, r.y, '─', style);
        fb.put_char(r.x + dx, r.y + r.h - 1, '─', style);
    }
    for dy in 1..r.h - 1 {
        fb.put_char(r.x, r.y + dy, '│', style);
        fb.put_char(r.x + r.w - 1, r.y + dy, '│', style);
    }
}

/// Write `text` centered horizontally in the well, `dy` rows below its top
fn draw_centered(fb: &mut FrameBuffer, well: WellRect, dy: u16, text: &str, bold: bool) {
    let text_w = text.chars().count() as u16;
    let x = well.x.saturating_add(well.w.saturating_sub(text_w) / 2);
    let mut style = CellStyle::new(Rgb::new(255, 255, 255), WELL_BG);
    style.bold = bold;
    fb.put_str(x, well.y.saturating_add(dy), text, style);
}
