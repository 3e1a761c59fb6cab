//! BoardView: maps a `GameSnapshot` into a canvas.
//!
//! Pure (no I/O), so it can be unit-tested. Blocks are drawn two columns
//! wide with a light/dark bevel pair; the ghost piece is the same color
//! darkened and dimmed; rows mid-clear flash as fragments.

use crate::core::snapshot::GameSnapshot;
use crate::core::session::Phase;
use crate::term::canvas::{Canvas, Rgb, TextStyle};
use crate::types::{PieceKind, BOARD_COLS, BOARD_ROWS};

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

const WELL_BG: Rgb = Rgb::new(40, 40, 40);
const GRID_DOT: Rgb = Rgb::new(51, 51, 51);
const FLASH: Rgb = Rgb::new(221, 221, 221);
const GHOST_DARKEN: i32 = -40;

/// Display color for a piece kind.
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(230, 25, 75),
        PieceKind::J => Rgb::new(60, 180, 75),
        PieceKind::L => Rgb::new(255, 225, 25),
        PieceKind::T => Rgb::new(67, 99, 216),
        PieceKind::S => Rgb::new(245, 130, 49),
        PieceKind::Z => Rgb::new(145, 30, 180),
        PieceKind::O => Rgb::new(70, 240, 240),
        PieceKind::Mono => Rgb::new(250, 190, 212),
        PieceKind::Domino => Rgb::new(240, 50, 230),
        PieceKind::Corner => Rgb::new(169, 169, 169),
        PieceKind::Tri => Rgb::new(0, 128, 128),
    }
}

/// Renders the well, the side panel and the phase overlays.
pub struct BoardView {
    /// Board cell width in terminal columns (2 compensates for the usual
    /// terminal glyph aspect ratio).
    cell_w: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        Self { cell_w: 2 }
    }
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self { cell_w: cell_w.max(1) }
    }

    /// Render a snapshot into a fresh canvas sized to the viewport.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> Canvas {
        let mut canvas = Canvas::new(viewport.width, viewport.height);

        let well_w = u16::from(BOARD_COLS) * self.cell_w;
        let well_h = u16::from(BOARD_ROWS);
        let frame_w = well_w + 2;
        let frame_h = well_h + 2;
        let x0 = viewport.width.saturating_sub(frame_w) / 2;
        let y0 = viewport.height.saturating_sub(frame_h) / 2;

        self.draw_frame(&mut canvas, x0, y0, frame_w, frame_h);
        self.draw_cells(&mut canvas, snap, x0, y0);

        if snap.phase == Phase::Running {
            self.draw_ghost(&mut canvas, snap, x0, y0);
            self.draw_active(&mut canvas, snap, x0, y0);
        }
        self.draw_flash(&mut canvas, snap, x0, y0);
        self.draw_panel(&mut canvas, snap, viewport, x0, y0, frame_w);
        self.draw_overlay(&mut canvas, snap, x0, y0, frame_w, frame_h);

        canvas
    }

    fn cell_origin(&self, x0: u16, y0: u16, cx: u16, cy: u16) -> (u16, u16) {
        (x0 + 1 + cx * self.cell_w, y0 + 1 + cy)
    }

    fn draw_frame(&self, canvas: &mut Canvas, x0: u16, y0: u16, w: u16, h: u16) {
        let border = TextStyle::colored(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let bg = TextStyle::colored(GRID_DOT, WELL_BG);

        canvas.fill(x0 + 1, y0 + 1, w - 2, h - 2, ' ', bg);

        canvas.put(x0, y0, '┌', border);
        canvas.put(x0 + w - 1, y0, '┐', border);
        canvas.put(x0, y0 + h - 1, '└', border);
        canvas.put(x0 + w - 1, y0 + h - 1, '┘', border);
        for dx in 1..w - 1 {
            canvas.put(x0 + dx, y0, '─', border);
            canvas.put(x0 + dx, y0 + h - 1, '─', border);
        }
        for dy in 1..h - 1 {
            canvas.put(x0, y0 + dy, '│', border);
            canvas.put(x0 + w - 1, y0 + dy, '│', border);
        }
    }

    fn draw_cells(&self, canvas: &mut Canvas, snap: &GameSnapshot, x0: u16, y0: u16) {
        for cy in 0..BOARD_ROWS as usize {
            for cx in 0..BOARD_COLS as usize {
                match PieceKind::from_id(snap.board[cy][cx]) {
                    Some(kind) => {
                        self.draw_block(canvas, x0, y0, cx as u16, cy as u16, kind, false);
                    }
                    None => {
                        let (px, py) = self.cell_origin(x0, y0, cx as u16, cy as u16);
                        let dots = TextStyle {
                            dim: true,
                            ..TextStyle::colored(GRID_DOT, WELL_BG)
                        };
                        canvas.put(px, py, '·', dots);
                        canvas.fill(px + 1, py, self.cell_w - 1, 1, ' ', dots);
                    }
                }
            }
        }
    }

    /// A block is a bevel pair: a lit left edge and a shaded right edge.
    fn draw_block(
        &self,
        canvas: &mut Canvas,
        x0: u16,
        y0: u16,
        cx: u16,
        cy: u16,
        kind: PieceKind,
        bold: bool,
    ) {
        let color = piece_color(kind);
        let (px, py) = self.cell_origin(x0, y0, cx, cy);
        let lit = TextStyle {
            bold,
            ..TextStyle::colored(color.shaded(25), WELL_BG)
        };
        let shaded = TextStyle {
            bold,
            ..TextStyle::colored(color.shaded(-25), WELL_BG)
        };
        canvas.put(px, py, '█', lit);
        for dx in 1..self.cell_w {
            canvas.put(px + dx, py, '█', shaded);
        }
    }

    fn draw_ghost(&self, canvas: &mut Canvas, snap: &GameSnapshot, x0: u16, y0: u16) {
        let (Some(active), Some(ghost_row)) = (snap.active, snap.ghost_row) else {
            return;
        };
        let style = TextStyle {
            dim: true,
            ..TextStyle::colored(piece_color(active.kind).shaded(GHOST_DARKEN), WELL_BG)
        };
        for (dx, dy) in active.shape.cells() {
            let cx = active.x + dx;
            let cy = ghost_row + dy;
            if (0..BOARD_COLS as i8).contains(&cx) && (0..BOARD_ROWS as i8).contains(&cy) {
                let (px, py) = self.cell_origin(x0, y0, cx as u16, cy as u16);
                canvas.fill(px, py, self.cell_w, 1, '░', style);
            }
        }
    }

    fn draw_active(&self, canvas: &mut Canvas, snap: &GameSnapshot, x0: u16, y0: u16) {
        let Some(active) = snap.active else {
            return;
        };
        for (dx, dy) in active.shape.cells() {
            let cx = active.x + dx;
            let cy = active.y + dy;
            if (0..BOARD_COLS as i8).contains(&cx) && (0..BOARD_ROWS as i8).contains(&cy) {
                self.draw_block(canvas, x0, y0, cx as u16, cy as u16, active.kind, true);
            }
        }
    }

    /// Rows mid-clear are overdrawn with fragment glyphs.
    fn draw_flash(&self, canvas: &mut Canvas, snap: &GameSnapshot, x0: u16, y0: u16) {
        let style = TextStyle::colored(FLASH, WELL_BG);
        for &row in &snap.clearing_rows {
            for cx in 0..u16::from(BOARD_COLS) {
                let (px, py) = self.cell_origin(x0, y0, cx, u16::from(row));
                canvas.fill(px, py, self.cell_w, 1, '▒', style);
            }
        }
    }

    fn draw_panel(
        &self,
        canvas: &mut Canvas,
        snap: &GameSnapshot,
        viewport: Viewport,
        x0: u16,
        y0: u16,
        frame_w: u16,
    ) {
        let panel_x = x0.saturating_add(frame_w).saturating_add(2);
        if panel_x + 12 > viewport.width {
            return;
        }

        let label = TextStyle {
            bold: true,
            ..TextStyle::default()
        };
        let value = TextStyle::default();
        let hint = TextStyle {
            dim: true,
            ..TextStyle::default()
        };

        let mut y = y0;
        for (name, val) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            canvas.text(panel_x, y, name, label);
            canvas.text(panel_x, y + 1, &val.to_string(), value);
            y = y.saturating_add(3);
        }

        for line in [
            "←/→  move",
            "↑    rotate",
            "↓    drop",
            "␣    start/pause",
            "e    end   q quit",
        ] {
            if y >= viewport.height {
                break;
            }
            canvas.text(panel_x, y, line, hint);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay(
        &self,
        canvas: &mut Canvas,
        snap: &GameSnapshot,
        x0: u16,
        y0: u16,
        frame_w: u16,
        frame_h: u16,
    ) {
        let text = match snap.phase {
            Phase::NotStarted => "PRESS SPACE",
            Phase::Paused => "PAUSED",
            Phase::Over => "GAME OVER",
            Phase::Running => return,
        };
        let style = TextStyle {
            bold: true,
            ..TextStyle::colored(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0))
        };
        let text_w = text.chars().count() as u16;
        let x = x0.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let y = y0.saturating_add(frame_h / 2);
        canvas.text(x, y, text, style);
    }
}
