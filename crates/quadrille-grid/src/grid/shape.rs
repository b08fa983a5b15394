//! Row operations, transforms and sub-grid extraction.

use super::visit::Filter;
use super::{Quadrille, Span};
use crate::value::Cell;
use log::warn;

impl Quadrille {
    /// Inserts an empty row at `row` (clamped to `0..=height`).
    pub fn insert(&mut self, row: i64) -> &mut Self {
        let at = row.max(0).min(self.height() as i64) as usize;
        let width = self.width();
        self.memory_mut().insert(at, vec![None; width]);
        self
    }

    /// Removes the row at `row`. Deleting the only remaining row is a no-op.
    pub fn delete(&mut self, row: i64) -> &mut Self {
        if self.height() > 1 && self.is_valid(row, 0) {
            self.memory_mut().remove(row as usize);
        }
        self
    }

    /// Swaps two rows; out-of-bounds indices make this a no-op.
    pub fn swap_rows(&mut self, a: i64, b: i64) -> &mut Self {
        if self.is_valid(a, 0) && self.is_valid(b, 0) {
            self.memory_mut().swap(a as usize, b as usize);
        }
        self
    }

    /// Swaps two cells; out-of-bounds coordinates make this a no-op.
    pub fn swap_cells(&mut self, row1: i64, col1: i64, row2: i64, col2: i64) -> &mut Self {
        if self.is_valid(row1, col1) && self.is_valid(row2, col2) {
            let (r1, c1) = (row1 as usize, col1 as usize);
            let (r2, c2) = (row2 as usize, col2 as usize);
            let memory = self.memory_mut();
            if r1 == r2 {
                memory[r1].swap(c1, c2);
            } else {
                let first = memory[r1][c1].take();
                let second = std::mem::replace(&mut memory[r2][c2], first);
                memory[r1][c1] = second;
            }
        }
        self
    }

    /// Reverses the row order in place.
    pub fn reflect(&mut self) -> &mut Self {
        self.memory_mut().reverse();
        self
    }

    /// Swaps the row and column axes. Relies on rows being uniform length.
    pub fn transpose(&mut self) -> &mut Self {
        let (width, height) = (self.width(), self.height());
        let mut transposed: Vec<Vec<Cell>> = (0..width).map(|_| Vec::with_capacity(height)).collect();
        for row in self.memory_mut().drain(..) {
            for (col, cell) in row.into_iter().enumerate() {
                transposed[col].push(cell);
            }
        }
        self.replace_memory(transposed);
        self
    }

    /// Rotates 90 degrees clockwise: row `i` of the result is column `i`
    /// read bottom-to-top.
    pub fn rotate(&mut self) -> &mut Self {
        self.transpose();
        for row in self.memory_mut() {
            row.reverse();
        }
        self
    }

    /// Extracts a `width` x `height` sub-grid anchored at (row, col).
    /// Negative dimensions reverse the extraction direction; `wrap` makes
    /// indices toroidal, otherwise out-of-range reads become empty cells.
    /// Zero dimensions are skipped with a warning.
    pub fn crop(&self, row: i64, col: i64, width: i64, height: i64, wrap: bool) -> Option<Quadrille> {
        if width == 0 || height == 0 {
            warn!("crop skipped: width/height must be non-zero");
            return None;
        }
        let w = width.unsigned_abs() as usize;
        let h = height.unsigned_abs() as usize;
        let start_row = if height > 0 { row } else { row - (h as i64 - 1) };
        let start_col = if width > 0 { col } else { col - (w as i64 - 1) };
        let (grid_h, grid_w) = (self.height() as i64, self.width() as i64);
        let mut memory = vec![vec![None; w]; h];
        for (i, out_row) in memory.iter_mut().enumerate() {
            for (j, out_cell) in out_row.iter_mut().enumerate() {
                let (mut r, mut c) = (start_row + i as i64, start_col + j as i64);
                if wrap {
                    r = r.rem_euclid(grid_h);
                    c = c.rem_euclid(grid_w);
                }
                *out_cell = self.value_at(r, c).cloned();
            }
        }
        Quadrille::from_cells(memory).ok()
    }

    /// Square neighborhood of side `2 * dimension + 1` centered at
    /// (row, col). Negative dimensions are skipped with a warning.
    pub fn ring(&self, row: i64, col: i64, dimension: i64, wrap: bool) -> Option<Quadrille> {
        if dimension < 0 {
            warn!("ring skipped: dimension must be >= 0");
            return None;
        }
        let side = 2 * dimension + 1;
        self.crop(row - dimension, col - dimension, side, side, wrap)
    }

    /// A single row as a new 1 x width grid.
    pub fn row_at(&self, row: i64) -> Option<Quadrille> {
        if !self.is_valid(row, 0) {
            return None;
        }
        Quadrille::from_cells(vec![self.memory()[row as usize].clone()]).ok()
    }

    /// Bounding box of the filled cells, or `None` for a fully empty grid.
    pub fn span(&self) -> Option<Span> {
        let mut min_row = self.height() as i64;
        let mut max_row = -1i64;
        let mut min_col = self.width() as i64;
        let mut max_col = -1i64;
        self.visit(&Filter::Filled, |cell| {
            min_row = min_row.min(cell.row);
            max_row = max_row.max(cell.row);
            min_col = min_col.min(cell.col);
            max_col = max_col.max(cell.col);
        });
        if max_row < 0 {
            return None;
        }
        Some(Span {
            row: min_row,
            col: min_col,
            width: (max_col - min_col + 1) as usize,
            height: (max_row - min_row + 1) as usize,
        })
    }

    /// Crops to the bounding box of the filled cells.
    pub fn trim(&self) -> Option<Quadrille> {
        let span = self.span()?;
        self.crop(
            span.row,
            span.col,
            span.width as i64,
            span.height as i64,
            false,
        )
    }
}
