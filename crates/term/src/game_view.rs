//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{CascadePolicy, GameSnapshot, SwapPolicy};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::playback::PlaybackFrame;
use crate::types::{Position, TileKind};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(70, 70, 95);
const SELECTED_BG: Rgb = Rgb::new(190, 190, 200);
const MARKED_BG: Rgb = Rgb::new(90, 50, 60);

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

/// Board renderer for the match-3 game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the usual terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Top-left corner of the board frame and its outer size.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn layout(&self, size: usize, viewport: Viewport) -> Layout {
        let n = u16::try_from(size).unwrap_or(u16::MAX);
        let w = n.saturating_mul(self.cell_w).saturating_add(2);
        let h = n.saturating_mul(self.cell_h).saturating_add(2);
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Layout { x, y, w, h }
    }

    /// Board cell under terminal coordinates `(column, row)`, if any.
    pub fn hit_test(&self, size: usize, viewport: Viewport, column: u16, row: u16) -> Option<Position> {
        let l = self.layout(size, viewport);
        let dx = column.checked_sub(l.x.saturating_add(1))?;
        let dy = row.checked_sub(l.y.saturating_add(1))?;
        let pos = Position::new((dy / self.cell_h) as usize, (dx / self.cell_w) as usize);
        pos.in_bounds(size).then_some(pos)
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers reuse one framebuffer across frames; it is resized only when
    /// the viewport changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_playback(snap, None, viewport, fb);
    }

    /// Render with an optional playback frame drawn in place of the board grid.
    ///
    /// Cursor and selection are hidden while a playback is shown.
    pub fn render_into_with_playback(
        &self,
        snap: &GameSnapshot,
        playback: Option<&PlaybackFrame>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let l = self.layout(snap.size, viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        fb.fill_rect(
            l.x + 1,
            l.y + 1,
            l.w.saturating_sub(2),
            l.h.saturating_sub(2),
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG),
        );
        self.draw_border(fb, l, border);

        for row in 0..snap.size {
            for col in 0..snap.size {
                let pos = Position::new(row, col);
                match playback {
                    Some(frame) => {
                        let bg = if frame.is_marked(pos) { MARKED_BG } else { BOARD_BG };
                        self.draw_cell(fb, l, pos, frame.kind_at(pos), bg);
                    }
                    None => {
                        let bg = if snap.selected == Some(pos) {
                            SELECTED_BG
                        } else if snap.cursor == pos {
                            CURSOR_BG
                        } else {
                            BOARD_BG
                        };
                        self.draw_cell(fb, l, pos, snap.kind_at(pos), bg);
                    }
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, l);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, l: Layout, style: CellStyle) {
        if l.w < 2 || l.h < 2 {
            return;
        }
        let (right, bottom) = (l.x + l.w - 1, l.y + l.h - 1);

        fb.put_char(l.x, l.y, '┌', style);
        fb.put_char(right, l.y, '┐', style);
        fb.put_char(l.x, bottom, '└', style);
        fb.put_char(right, bottom, '┘', style);
        for x in l.x + 1..right {
            fb.put_char(x, l.y, '─', style);
            fb.put_char(x, bottom, '─', style);
        }
        for y in l.y + 1..bottom {
            fb.put_char(l.x, y, '│', style);
            fb.put_char(right, y, '│', style);
        }
    }

    /// One board cell: a colored glyph in the first column, padding after it.
    fn draw_cell(&self, fb: &mut FrameBuffer, l: Layout, pos: Position, kind: Option<TileKind>, bg: Rgb) {
        let col = u16::try_from(pos.col).unwrap_or(u16::MAX);
        let row = u16::try_from(pos.row).unwrap_or(u16::MAX);
        let px = l.x.saturating_add(1).saturating_add(col.saturating_mul(self.cell_w));
        let py = l.y.saturating_add(1).saturating_add(row.saturating_mul(self.cell_h));

        let (ch, style) = match kind {
            Some(kind) => ('●', CellStyle::new(kind_color(kind), bg).bold()),
            None => ('·', CellStyle::new(Rgb::new(90, 90, 100), bg).dim()),
        };
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px, py, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, l: Layout) {
        let panel_x = l.x.saturating_add(l.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = l.y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("MOVES", snap.moves),
            ("LAST", snap.last_gain),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "RULES", label);
        let cascade = match snap.cascade {
            CascadePolicy::Single => "single",
            CascadePolicy::UntilStable => "cascade",
        };
        let swap = match snap.swap_policy {
            SwapPolicy::KeepUnmatched => "keep",
            SwapPolicy::RevertUnmatched => "revert",
        };
        fb.put_str(panel_x, y + 1, cascade, value);
        fb.put_str(panel_x, y + 2, swap, value);
        y = y.saturating_add(4);

        fb.put_str(panel_x, y, "SEED", label);
        fb.put_u32(panel_x, y + 1, snap.seed, value.dim());
    }
}

fn kind_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Red => Rgb::new(220, 80, 80),
        TileKind::Blue => Rgb::new(80, 120, 220),
        TileKind::Green => Rgb::new(100, 220, 120),
        TileKind::Yellow => Rgb::new(240, 220, 80),
        TileKind::Purple => Rgb::new(200, 120, 220),
        TileKind::Orange => Rgb::new(255, 165, 0),
    }
}
