//! Filling, clearing and flood operations.
//!
//! Every destructive write funnels through [`clear_slot`], which releases
//! renderer resources attached to the outgoing value before the overwrite.

use super::visit::{CellVisit, Filter};
use super::Quadrille;
use crate::config::Defaults;
use crate::value::{Cell, CellValue, Rgba};
use log::warn;
use rand::Rng;

/// Empties a slot, releasing any renderer attachment first.
pub(crate) fn clear_slot(slot: &mut Cell) {
    if let Some(value) = slot.take() {
        value.release_attachment();
    }
}

impl Quadrille {
    fn write(&mut self, row: usize, col: usize, cell: Cell) {
        let slot = &mut self.memory_mut()[row][col];
        clear_slot(slot);
        *slot = cell;
    }

    // FILL

    /// Refills the whole grid as a chessboard with the default colors.
    pub fn fill_board(&mut self) -> &mut Self {
        let defaults = Defaults::default();
        self.fill_board_with(defaults.light_square, defaults.dark_square)
    }

    /// Refills the whole grid as a chessboard, light on (0, 0).
    pub fn fill_board_with(&mut self, light: Rgba, dark: Rgba) -> &mut Self {
        for (row, col) in self.coords(&Filter::All) {
            let color = if (row + col) % 2 == 0 { light } else { dark };
            self.write(row as usize, col as usize, Some(CellValue::Color(color)));
        }
        self
    }

    /// Fills every currently empty cell; factory values are invoked per cell.
    pub fn fill_empty(&mut self, value: CellValue) -> &mut Self {
        for (row, col) in self.coords(&Filter::Empty) {
            let cell = value.resolve(row, col);
            self.memory_mut()[row as usize][col as usize] = cell;
        }
        self
    }

    /// Fills every cell matching the predicate.
    pub fn fill_where(
        &mut self,
        predicate: impl Fn(&CellVisit<'_>) -> bool,
        value: CellValue,
    ) -> &mut Self {
        for (row, col) in self.coords(&Filter::Where(&predicate)) {
            let cell = value.resolve(row, col);
            self.write(row as usize, col as usize, cell);
        }
        self
    }

    /// Fills an entire row; out-of-bounds rows are ignored.
    pub fn fill_row(&mut self, row: i64, value: CellValue) -> &mut Self {
        if self.is_valid(row, 0) {
            for col in 0..self.width() {
                let cell = value.resolve(row, col as i64);
                self.write(row as usize, col, cell);
            }
        }
        self
    }

    /// Fills a single cell; out-of-bounds coordinates are ignored.
    pub fn fill_cell(&mut self, row: i64, col: i64, value: CellValue) -> &mut Self {
        if self.is_valid(row, col) {
            let cell = value.resolve(row, col);
            self.write(row as usize, col as usize, cell);
        }
        self
    }

    /// Flood fill: replaces the 4- or 8-connected region holding the seed
    /// cell's value with `value` (resolved once at the seed). With `border`,
    /// the boundary cells where the flood stops are recolored too.
    pub fn flood(
        &mut self,
        row: i64,
        col: i64,
        value: CellValue,
        directions: u32,
        border: bool,
    ) -> &mut Self {
        if self.is_valid(row, col) {
            let target = self.memory()[row as usize][col as usize].clone();
            let replacement = value.resolve(row, col);
            self.flood_impl(row, col, target, replacement, directions, border);
        }
        self
    }

    // CLEAR

    /// Clears every cell.
    pub fn clear_all(&mut self) -> &mut Self {
        for row in self.memory_mut() {
            for slot in row {
                clear_slot(slot);
            }
        }
        self
    }

    /// Clears every cell matching the predicate.
    pub fn clear_where(&mut self, predicate: impl Fn(&CellVisit<'_>) -> bool) -> &mut Self {
        for (row, col) in self.coords(&Filter::Where(&predicate)) {
            clear_slot(&mut self.memory_mut()[row as usize][col as usize]);
        }
        self
    }

    /// Clears an entire row; out-of-bounds rows are ignored.
    pub fn clear_row(&mut self, row: i64) -> &mut Self {
        if self.is_valid(row, 0) {
            for slot in &mut self.memory_mut()[row as usize] {
                clear_slot(slot);
            }
        }
        self
    }

    /// Clears a single cell; out-of-bounds coordinates are ignored.
    pub fn clear_cell(&mut self, row: i64, col: i64) -> &mut Self {
        if self.is_valid(row, col) {
            clear_slot(&mut self.memory_mut()[row as usize][col as usize]);
        }
        self
    }

    /// Flood clear: empties the connected region holding the seed cell's
    /// value, with the same connectivity and border semantics as [`flood`].
    ///
    /// [`flood`]: Quadrille::flood
    pub fn flood_clear(&mut self, row: i64, col: i64, directions: u32, border: bool) -> &mut Self {
        if self.is_valid(row, col) {
            let target = self.memory()[row as usize][col as usize].clone();
            self.flood_impl(row, col, target, None, directions, border);
        }
        self
    }

    // REPLACE

    /// Replaces every filled cell with `value`.
    pub fn replace(&mut self, value: CellValue) -> &mut Self {
        for (row, col) in self.coords(&Filter::Filled) {
            let cell = value.resolve(row, col);
            self.write(row as usize, col as usize, cell);
        }
        self
    }

    /// Replaces every occurrence of `old` with `new`.
    pub fn replace_value(&mut self, old: &CellValue, new: CellValue) -> &mut Self {
        for (row, col) in self.coords(&Filter::Value(old)) {
            let cell = new.resolve(row, col);
            self.write(row as usize, col as usize, cell);
        }
        self
    }

    // RANDOM

    /// Randomly fills (when `value` is filled) or clears (when `value` is
    /// empty) up to `times` cells, clamped to the cells actually available.
    pub fn rand(&mut self, times: usize, value: Cell) -> &mut Self {
        self.rand_with(&mut rand::thread_rng(), times, value)
    }

    /// [`rand`] with an explicit source of randomness.
    ///
    /// [`rand`]: Quadrille::rand
    pub fn rand_with<R: Rng>(&mut self, rng: &mut R, times: usize, value: Cell) -> &mut Self {
        let filling = value.is_some();
        let available = if filling {
            self.size() - self.order()
        } else {
            self.order()
        };
        let times = times.min(available);
        let mut count = 0;
        while count < times {
            let index = rng.gen_range(0..self.size());
            let row = (index / self.width()) as i64;
            let col = (index % self.width()) as i64;
            match &value {
                Some(v) if self.is_empty_at(row, col) => {
                    self.fill_cell(row, col, v.clone());
                    count += 1;
                }
                None if self.is_filled_at(row, col) => {
                    self.clear_cell(row, col);
                    count += 1;
                }
                _ => {}
            }
        }
        self
    }

    /// Randomly redistributes the filled values to new positions, preserving
    /// the order (filled-cell count) but not the placement.
    pub fn randomize(&mut self) -> &mut Self {
        self.randomize_with(&mut rand::thread_rng())
    }

    /// [`randomize`] with an explicit source of randomness.
    ///
    /// [`randomize`]: Quadrille::randomize
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) -> &mut Self {
        let values: Vec<CellValue> = self
            .to_flat()
            .into_iter()
            .flatten()
            .collect();
        self.clear_all();
        for value in values {
            loop {
                let index = rng.gen_range(0..self.size());
                let row = (index / self.width()) as i64;
                let col = (index % self.width()) as i64;
                if self.is_empty_at(row, col) {
                    self.fill_cell(row, col, value);
                    break;
                }
            }
        }
        self
    }

    // FLOOD CORE

    // Explicit-worklist flood; the recursive formulation overflows the call
    // stack on large regions. Cells already equal to the replacement are
    // never revisited, which also terminates the target == replacement case.
    fn flood_impl(
        &mut self,
        row: i64,
        col: i64,
        target: Cell,
        replacement: Cell,
        mut directions: u32,
        border: bool,
    ) {
        if directions != 4 && directions != 8 {
            warn!("flood is using 4 directions instead of {}", directions);
            directions = 4;
        }
        let mut stack = vec![(row, col)];
        while let Some((r, c)) = stack.pop() {
            if !self.is_valid(r, c) {
                continue;
            }
            let (ru, cu) = (r as usize, c as usize);
            if self.memory()[ru][cu] == replacement {
                continue;
            }
            if self.memory()[ru][cu] == target {
                self.write(ru, cu, replacement.clone());
                stack.extend([(r, c - 1), (r - 1, c), (r, c + 1), (r + 1, c)]);
                if directions == 8 {
                    stack.extend([
                        (r - 1, c - 1),
                        (r - 1, c + 1),
                        (r + 1, c + 1),
                        (r + 1, c - 1),
                    ]);
                }
            } else if border {
                self.write(ru, cu, replacement.clone());
            }
        }
    }
}
