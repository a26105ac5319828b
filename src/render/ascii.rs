//! Text surface
//!
//! Rasterizes sprites into a character grid, one cell per block of
//! playfield pixels. Used by the demo binary and by tests.

use std::fmt;

use glam::IVec2;

use super::{Hud, Sprite, Surface};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

const EMPTY: char = ' ';

/// A character-grid surface covering the whole playfield
#[derive(Debug, Clone)]
pub struct AsciiSurface {
    cols: usize,
    rows: usize,
    /// Playfield pixels per cell
    cell: IVec2,
    cells: Vec<char>,
    status: String,
}

impl Default for AsciiSurface {
    fn default() -> Self {
        Self::new(80, 30)
    }
}

impl AsciiSurface {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let cell = IVec2::new(
            (PLAYFIELD_WIDTH / cols as i32).max(1),
            (PLAYFIELD_HEIGHT / rows as i32).max(1),
        );
        Self {
            cols,
            rows,
            cell,
            cells: vec![EMPTY; cols * rows],
            status: String::new(),
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
        self.status.clear();
    }

    /// Character at a grid cell (None outside the grid)
    pub fn at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    /// Number of cells showing `glyph`
    pub fn count(&self, glyph: char) -> usize {
        self.cells.iter().filter(|&&c| c == glyph).count()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Inclusive cell range covered by `[start, start + len)` pixels, clipped to `limit` cells
    fn span(start: i32, len: i32, cell: i32, limit: usize) -> Option<(usize, usize)> {
        let last_px = start + len.max(1) - 1;
        if last_px < 0 {
            return None;
        }
        let first = (start.max(0) / cell) as usize;
        let last = ((last_px / cell) as usize).min(limit - 1);
        (first <= last).then_some((first, last))
    }
}

impl Surface for AsciiSurface {
    fn draw_sprite(&mut self, sprite: &Sprite) {
        let Some((c0, c1)) = Self::span(sprite.pos.x, sprite.size.x, self.cell.x, self.cols) else {
            return;
        };
        let Some((r0, r1)) = Self::span(sprite.pos.y, sprite.size.y, self.cell.y, self.rows) else {
            return;
        };
        let glyph = sprite.hint.glyph();
        for row in r0..=r1 {
            let line = row * self.cols;
            self.cells[line + c0..=line + c1].fill(glyph);
        }
    }

    fn draw_hud(&mut self, hud: &Hud) {
        self.status = hud.status_line();
    }
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status)?;
        writeln!(f, "+{}+", "-".repeat(self.cols))?;
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            writeln!(f, "|{line}|")?;
        }
        write!(f, "+{}+", "-".repeat(self.cols))
    }
}
