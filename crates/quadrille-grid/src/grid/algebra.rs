//! Set algebra between grids: the merge engine and the operations built on
//! top of it (and/or/xor/diff/not, shift, search).
//!
//! A merge combines two grids at a relative (row, col) offset. The output
//! covers both operands at their placement; the operator sees
//! `Option<&CellValue>` per operand, where `None` covers both empty and
//! out-of-bounds reads.

use super::visit::Filter;
use super::{CellPos, Quadrille};
use crate::value::{Cell, CellValue};
use std::ops::{BitAnd, BitOr, BitXor, Sub};

fn filled(v: Option<&CellValue>) -> bool {
    v.is_some()
}

impl Quadrille {
    // STATIC FORMS (produce a new grid)

    /// Merges two grids with an explicit operator; offsets are inferred from
    /// drawn positions when both grids carry them at equal cell lengths,
    /// otherwise 0.
    pub fn merged(
        a: &Quadrille,
        b: &Quadrille,
        operator: impl Fn(Option<&CellValue>, Option<&CellValue>) -> Cell,
    ) -> Quadrille {
        let (row, col) = inferred_offsets(a, b);
        Quadrille::merged_at(a, b, operator, row, col)
    }

    /// Merges two grids with an explicit operator and offset.
    pub fn merged_at(
        a: &Quadrille,
        b: &Quadrille,
        operator: impl Fn(Option<&CellValue>, Option<&CellValue>) -> Cell,
        row: i64,
        col: i64,
    ) -> Quadrille {
        Quadrille::from_cells(merged_memory(a, b, &operator, row, col))
            .unwrap_or_else(|_| a.clone())
    }

    /// Non-destructive NOT: a copy with every filled cell emptied and every
    /// empty cell set to `target`.
    pub fn not(q: &Quadrille, target: CellValue) -> Quadrille {
        let mut out = q.clone();
        out.invert(target);
        out
    }

    /// Non-destructive shift of all filled cells by (d_row, d_col).
    pub fn shifted(q: &Quadrille, d_row: i64, d_col: i64, wrap: bool) -> Quadrille {
        let mut out = q.clone();
        out.shift(d_row, d_col, wrap);
        out
    }

    // IN-PLACE FORMS (mutate the receiver, return it for chaining)

    /// Merges `other` into this grid. Offsets are inferred as in [`merged`].
    ///
    /// [`merged`]: Quadrille::merged
    pub fn merge(
        &mut self,
        other: &Quadrille,
        operator: impl Fn(Option<&CellValue>, Option<&CellValue>) -> Cell,
    ) -> &mut Self {
        let (row, col) = inferred_offsets(self, other);
        self.merge_at(other, operator, row, col)
    }

    /// Merges `other` into this grid at an explicit offset.
    pub fn merge_at(
        &mut self,
        other: &Quadrille,
        operator: impl Fn(Option<&CellValue>, Option<&CellValue>) -> Cell,
        row: i64,
        col: i64,
    ) -> &mut Self {
        // Hot path: exact same size and no offset, rewrite cells in place.
        if row == 0 && col == 0 && self.width() == other.width() && self.height() == other.height()
        {
            for r in 0..self.height() {
                for c in 0..self.width() {
                    let result = operator(
                        self.memory()[r][c].as_ref(),
                        other.memory()[r][c].as_ref(),
                    );
                    self.memory_mut()[r][c] = result;
                }
            }
            return self;
        }
        let memory = merged_memory(self, other, &operator, row, col);
        self.replace_memory(memory);
        self
    }

    /// Keeps cells filled in both grids (this grid's values win).
    pub fn and(&mut self, other: &Quadrille) -> &mut Self {
        self.merge(other, ops::and)
    }

    pub fn and_at(&mut self, other: &Quadrille, row: i64, col: i64) -> &mut Self {
        self.merge_at(other, ops::and, row, col)
    }

    /// Keeps cells filled in either grid (this grid's values win).
    pub fn or(&mut self, other: &Quadrille) -> &mut Self {
        self.merge(other, ops::or)
    }

    pub fn or_at(&mut self, other: &Quadrille, row: i64, col: i64) -> &mut Self {
        self.merge_at(other, ops::or, row, col)
    }

    /// Keeps cells filled in exactly one of the grids.
    pub fn xor(&mut self, other: &Quadrille) -> &mut Self {
        self.merge(other, ops::xor)
    }

    pub fn xor_at(&mut self, other: &Quadrille, row: i64, col: i64) -> &mut Self {
        self.merge_at(other, ops::xor, row, col)
    }

    /// Keeps cells filled here and empty in `other`.
    pub fn diff(&mut self, other: &Quadrille) -> &mut Self {
        self.merge(other, ops::diff)
    }

    pub fn diff_at(&mut self, other: &Quadrille, row: i64, col: i64) -> &mut Self {
        self.merge_at(other, ops::diff, row, col)
    }

    /// Inverts filled/empty status in place: filled cells are cleared, empty
    /// cells take `target` (factories resolved per cell).
    pub fn invert(&mut self, target: CellValue) -> &mut Self {
        for (row, col) in self.coords(&Filter::All) {
            if self.is_filled_at(row, col) {
                self.clear_cell(row, col);
            } else {
                self.fill_cell(row, col, target.clone());
            }
        }
        self
    }

    /// Translates all filled cells by (d_row, d_col). With `wrap` the
    /// translation is toroidal; otherwise cells leaving the grid are
    /// dropped. No-op on an empty grid or a zero delta.
    pub fn shift(&mut self, d_row: i64, d_col: i64, wrap: bool) -> &mut Self {
        if self.order() == 0 {
            return self;
        }
        let (width, height) = (self.width() as i64, self.height() as i64);
        let (mut ky, mut kx) = (d_row, d_col);
        if wrap {
            ky = ky.rem_euclid(height);
            kx = kx.rem_euclid(width);
        }
        if kx == 0 && ky == 0 {
            return self;
        }
        let mut out = vec![vec![None; width as usize]; height as usize];
        for (row, cells) in self.memory().iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_some() {
                    let (mut r, mut c) = (row as i64 + ky, col as i64 + kx);
                    if wrap {
                        r %= height;
                        c %= width;
                    } else if r < 0 || r >= height || c < 0 || c >= width {
                        continue;
                    }
                    out[r as usize][c as usize] = cell.clone();
                }
            }
        }
        self.replace_memory(out);
        self
    }

    /// Positions where `pattern` matches this grid when anchored there.
    ///
    /// A position is a hit iff merging the pattern against this grid at that
    /// anchor yields an entirely empty result under the predicate
    /// "pattern filled and (strict: receiver differs / non-strict: receiver
    /// empty)". In other words, every pattern-filled cell must sit over a
    /// filled receiver cell (strict: over an equal one).
    pub fn search(&self, pattern: &Quadrille, strict: bool) -> Vec<CellPos> {
        let mut hits = Vec::new();
        self.visit(&Filter::All, |cell| {
            let (row, col) = (cell.row, cell.col);
            let misses = Quadrille::merged_at(
                pattern,
                self,
                |a, b| match a {
                    Some(a) if (strict && b != Some(a)) || (!strict && b.is_none()) => {
                        Some(a.clone())
                    }
                    _ => None,
                },
                -row,
                -col,
            );
            if misses.order() == 0 {
                hits.push(CellPos { row, col });
            }
        });
        hits
    }
}

mod ops {
    use super::filled;
    use crate::value::{Cell, CellValue};

    pub(super) fn and(a: Option<&CellValue>, b: Option<&CellValue>) -> Cell {
        if filled(a) && filled(b) {
            a.cloned()
        } else {
            None
        }
    }

    pub(super) fn or(a: Option<&CellValue>, b: Option<&CellValue>) -> Cell {
        if filled(a) {
            a.cloned()
        } else {
            b.cloned()
        }
    }

    pub(super) fn xor(a: Option<&CellValue>, b: Option<&CellValue>) -> Cell {
        match (a, b) {
            (Some(a), None) => Some(a.clone()),
            (None, Some(b)) => Some(b.clone()),
            _ => None,
        }
    }

    pub(super) fn diff(a: Option<&CellValue>, b: Option<&CellValue>) -> Cell {
        if filled(a) && !filled(b) {
            a.cloned()
        } else {
            None
        }
    }
}

// Offset inference: both grids drawn at known cell coordinates with the same
// cell length.
fn inferred_offsets(a: &Quadrille, b: &Quadrille) -> (i64, i64) {
    match (a.drawn_at(), b.drawn_at()) {
        ((Some(ar), Some(ac)), (Some(br), Some(bc))) if a.cell_length() == b.cell_length() => {
            (br - ar, bc - ac)
        }
        _ => (0, 0),
    }
}

fn merged_memory(
    a: &Quadrille,
    b: &Quadrille,
    operator: &impl Fn(Option<&CellValue>, Option<&CellValue>) -> Cell,
    row: i64,
    col: i64,
) -> Vec<Vec<Cell>> {
    let (aw, ah) = (a.width() as i64, a.height() as i64);
    let (bw, bh) = (b.width() as i64, b.height() as i64);
    // Smallest box covering both operands at their relative placement.
    let width = if col < 0 {
        bw.max(aw - col)
    } else {
        aw.max(bw + col)
    };
    let height = if row < 0 {
        bh.max(ah - row)
    } else {
        ah.max(bh + row)
    };
    let mut memory = Vec::with_capacity(height as usize);
    for i in 0..height {
        let i1 = if row < 0 { i + row } else { i };
        let i2 = if row > 0 { i - row } else { i };
        let mut out_row = Vec::with_capacity(width as usize);
        for j in 0..width {
            let j1 = if col < 0 { j + col } else { j };
            let j2 = if col > 0 { j - col } else { j };
            out_row.push(operator(a.value_at(i1, j1), b.value_at(i2, j2)));
        }
        memory.push(out_row);
    }
    memory
}

impl BitAnd for &Quadrille {
    type Output = Quadrille;

    fn bitand(self, rhs: Self) -> Quadrille {
        Quadrille::merged(self, rhs, ops::and)
    }
}

impl BitOr for &Quadrille {
    type Output = Quadrille;

    fn bitor(self, rhs: Self) -> Quadrille {
        Quadrille::merged(self, rhs, ops::or)
    }
}

impl BitXor for &Quadrille {
    type Output = Quadrille;

    fn bitxor(self, rhs: Self) -> Quadrille {
        Quadrille::merged(self, rhs, ops::xor)
    }
}

impl Sub for &Quadrille {
    type Output = Quadrille;

    fn sub(self, rhs: Self) -> Quadrille {
        Quadrille::merged(self, rhs, ops::diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(rows: &[&[i64]]) -> Quadrille {
        Quadrille::from_cells(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|n| (*n != 0).then(|| CellValue::Number(*n as f64)))
                        .collect()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_or_with_empty_grid_is_identity() {
        let g = pattern(&[&[1, 0], &[0, 2]]);
        let empty = Quadrille::new(2, 2).unwrap();
        assert_eq!(&g | &empty, g);
    }

    #[test]
    fn test_and_is_idempotent() {
        let g = pattern(&[&[1, 0], &[0, 2]]);
        assert_eq!(&g & &g, g);
    }

    #[test]
    fn test_xor_with_self_is_empty() {
        let g = pattern(&[&[1, 0], &[0, 2]]);
        let out = &g ^ &g;
        assert_eq!(out.order(), 0);
        assert_eq!((out.width(), out.height()), (2, 2));
    }

    #[test]
    fn test_diff_removes_overlap() {
        let a = pattern(&[&[1, 2]]);
        let b = pattern(&[&[9, 0]]);
        assert_eq!(&a - &b, pattern(&[&[0, 2]]));
    }

    #[test]
    fn test_merge_bounding_box_positive_offset() {
        let a = pattern(&[&[1, 1]]);
        let b = pattern(&[&[2, 2, 2]]);
        let out = Quadrille::merged_at(&a, &b, |x, y| x.or(y).cloned(), 1, 2);
        assert_eq!(out.width(), a.width().max(b.width() + 2));
        assert_eq!(out.height(), a.height().max(b.height() + 1));
        assert_eq!(out.value_at(0, 0), Some(&CellValue::Number(1.0)));
        assert_eq!(out.value_at(1, 2), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_merge_bounding_box_negative_offset() {
        let a = pattern(&[&[1], &[1]]);
        let b = pattern(&[&[2], &[2], &[2]]);
        let out = Quadrille::merged_at(&a, &b, |x, y| x.or(y).cloned(), -2, 0);
        // A's frame shifts: height = max(b.height, a.height - row).
        assert_eq!(out.height(), 4);
        // B sits at the origin of the output frame.
        assert_eq!(out.value_at(0, 0), Some(&CellValue::Number(2.0)));
        assert_eq!(out.value_at(3, 0), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn test_in_place_or_at_offset_reallocates() {
        let mut a = pattern(&[&[1]]);
        let b = pattern(&[&[2]]);
        a.or_at(&b, 0, 1);
        assert_eq!(a, pattern(&[&[1, 2]]));
    }

    #[test]
    fn test_not_then_not_restores_filled_positions() {
        let g = pattern(&[&[1, 0], &[0, 2]]);
        let inverted = Quadrille::not(&g, CellValue::text("x"));
        assert!(inverted.is_empty_at(0, 0));
        assert!(inverted.is_filled_at(0, 1));
        let restored = Quadrille::not(&inverted, CellValue::text("y"));
        assert_eq!(
            restored.coords(&Filter::Filled),
            g.coords(&Filter::Filled)
        );
    }

    #[test]
    fn test_shift_wraps_toroidally() {
        let mut g = pattern(&[&[1, 0], &[0, 0]]);
        g.shift(1, 1, true);
        assert!(g.is_filled_at(1, 1));
        g.shift(1, 1, true);
        assert!(g.is_filled_at(0, 0));
        // Negative deltas wrap too.
        g.shift(-1, 0, true);
        assert!(g.is_filled_at(1, 0));
    }

    #[test]
    fn test_shift_clips_without_wrap() {
        let mut g = pattern(&[&[1, 2]]);
        g.shift(0, 1, false);
        assert!(g.is_empty_at(0, 0));
        assert_eq!(g.value_at(0, 1), Some(&CellValue::Number(1.0)));
        g.shift(0, 1, false);
        g.shift(0, 1, false);
        assert_eq!(g.order(), 0);
    }

    #[test]
    fn test_shift_zero_delta_is_noop() {
        let original = pattern(&[&[1, 0]]);
        let mut g = original.clone();
        g.shift(0, 0, false);
        assert_eq!(g, original);
    }

    #[test]
    fn test_search_finds_embedded_pattern() {
        let mut grid = Quadrille::new(6, 5).unwrap();
        let needle = pattern(&[&[1, 1], &[0, 1]]);
        // Place a copy of the pattern's filled cells at (2, 3).
        grid.fill_cell(2, 3, CellValue::Number(1.0));
        grid.fill_cell(2, 4, CellValue::Number(1.0));
        grid.fill_cell(3, 4, CellValue::Number(1.0));
        let hits = grid.search(&needle, false);
        assert!(hits.contains(&CellPos { row: 2, col: 3 }));
    }

    #[test]
    fn test_search_strict_requires_equal_values() {
        let mut grid = Quadrille::new(3, 3).unwrap();
        grid.fill_cell(1, 1, CellValue::text("a"));
        let mut needle = Quadrille::new(1, 1).unwrap();
        needle.fill_cell(0, 0, CellValue::text("b"));

        // Non-strict: any filled receiver cell under the pattern is a match.
        assert!(grid
            .search(&needle, false)
            .contains(&CellPos { row: 1, col: 1 }));
        // Strict: values must be equal.
        assert!(!grid
            .search(&needle, true)
            .contains(&CellPos { row: 1, col: 1 }));
        needle.fill_cell(0, 0, CellValue::text("a"));
        assert!(grid
            .search(&needle, true)
            .contains(&CellPos { row: 1, col: 1 }));
    }

    #[test]
    fn test_search_pattern_overflow_never_matches() {
        let mut grid = Quadrille::new(2, 2).unwrap();
        grid.fill_empty(CellValue::Number(1.0));
        let needle = pattern(&[&[1, 1, 1]]);
        // The 1x3 pattern cannot fit anywhere in a 2x2 grid.
        assert!(grid.search(&needle, false).is_empty());
    }

    #[test]
    fn test_offset_inference_from_drawn_positions() {
        let mut a = pattern(&[&[1]]);
        let mut b = pattern(&[&[2]]);
        a.set_drawn_at(Some(0), Some(0));
        b.set_drawn_at(Some(0), Some(1));
        let out = &a | &b;
        assert_eq!(out, pattern(&[&[1, 2]]));

        // Mismatched cell lengths disable inference.
        b.set_cell_length(50.0);
        let out = &a | &b;
        assert_eq!(out, pattern(&[&[1]]));
    }
}
