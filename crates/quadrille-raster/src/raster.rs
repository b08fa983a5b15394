//! Barycentric triangle rasterization and color interpolation.

use quadrille_grid::{Cell, CellPos, CellValue, Quadrille, Rgba};

/// Triangle rasterization over grid cells.
///
/// For every cell the barycentric weights are computed from the standard
/// edge functions; cells with all three weights >= 0 (inside the triangle,
/// edges included) get the shader's return value, interpolated over the
/// per-vertex attribute vectors. Degenerate triangles have zero area and
/// rasterize nothing.
pub trait Rasterize {
    /// Rasterizes one triangle. Attribute vectors are interpolated
    /// component-wise up to the longest one; missing components read 0.
    /// The shader receives the interpolated vector and the cell coordinates
    /// and returns the cell content (empty to clear).
    fn rasterize_triangle(
        &mut self,
        v0: CellPos,
        v1: CellPos,
        v2: CellPos,
        shader: impl FnMut(&[f64], i64, i64) -> Cell,
        a0: &[f64],
        a1: &[f64],
        a2: &[f64],
    ) -> &mut Self;

    /// Rasterizes the whole grid as two corner-anchored triangles with
    /// attributes at the four corners (upper-left, lower-left, upper-right,
    /// lower-right).
    fn rasterize(
        &mut self,
        shader: impl FnMut(&[f64], i64, i64) -> Cell,
        a0: &[f64],
        a1: &[f64],
        a2: &[f64],
        a3: &[f64],
    ) -> &mut Self;

    /// Rasterizes one triangle with per-vertex colors.
    fn colorize_triangle(
        &mut self,
        v0: CellPos,
        v1: CellPos,
        v2: CellPos,
        c0: Rgba,
        c1: Rgba,
        c2: Rgba,
    ) -> &mut Self;

    /// Interpolates four corner colors over the whole grid.
    fn colorize(&mut self, c0: Rgba, c1: Rgba, c2: Rgba, c3: Rgba) -> &mut Self;
}

impl Rasterize for Quadrille {
    fn rasterize_triangle(
        &mut self,
        v0: CellPos,
        v1: CellPos,
        v2: CellPos,
        mut shader: impl FnMut(&[f64], i64, i64) -> Cell,
        a0: &[f64],
        a1: &[f64],
        a2: &[f64],
    ) -> &mut Self {
        let length = a0.len().max(a1.len()).max(a2.len());
        for row in 0..self.height() as i64 {
            for col in 0..self.width() as i64 {
                let (w0, w1, w2) = barycentric(row, col, v0, v1, v2);
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let mut attributes = vec![0.0; length];
                    for (k, attribute) in attributes.iter_mut().enumerate() {
                        *attribute = a0.get(k).copied().unwrap_or(0.0) * w0
                            + a1.get(k).copied().unwrap_or(0.0) * w1
                            + a2.get(k).copied().unwrap_or(0.0) * w2;
                    }
                    match shader(&attributes, row, col) {
                        Some(value) => self.fill_cell(row, col, value),
                        None => self.clear_cell(row, col),
                    };
                }
            }
        }
        self
    }

    fn rasterize(
        &mut self,
        mut shader: impl FnMut(&[f64], i64, i64) -> Cell,
        a0: &[f64],
        a1: &[f64],
        a2: &[f64],
        a3: &[f64],
    ) -> &mut Self {
        let top_left = CellPos { row: 0, col: 0 };
        let bottom_left = CellPos {
            row: self.height() as i64 - 1,
            col: 0,
        };
        let top_right = CellPos {
            row: 0,
            col: self.width() as i64 - 1,
        };
        let bottom_right = CellPos {
            row: self.height() as i64 - 1,
            col: self.width() as i64 - 1,
        };
        self.rasterize_triangle(top_left, bottom_left, top_right, &mut shader, a0, a1, a2);
        self.rasterize_triangle(
            bottom_left,
            top_right,
            bottom_right,
            &mut shader,
            a1,
            a2,
            a3,
        );
        self
    }

    fn colorize_triangle(
        &mut self,
        v0: CellPos,
        v1: CellPos,
        v2: CellPos,
        c0: Rgba,
        c1: Rgba,
        c2: Rgba,
    ) -> &mut Self {
        self.rasterize_triangle(
            v0,
            v1,
            v2,
            |channels, _, _| Some(CellValue::Color(Rgba::from_channels(channels))),
            &channels(c0),
            &channels(c1),
            &channels(c2),
        )
    }

    fn colorize(&mut self, c0: Rgba, c1: Rgba, c2: Rgba, c3: Rgba) -> &mut Self {
        self.rasterize(
            |channels, _, _| Some(CellValue::Color(Rgba::from_channels(channels))),
            &channels(c0),
            &channels(c1),
            &channels(c2),
            &channels(c3),
        )
    }
}

fn channels(color: Rgba) -> [f64; 4] {
    [
        color.r as f64,
        color.g as f64,
        color.b as f64,
        color.a as f64,
    ]
}

fn barycentric(row: i64, col: i64, v0: CellPos, v1: CellPos, v2: CellPos) -> (f64, f64, f64) {
    let area = parallelogram_area(v0, v1, v2) as f64;
    let e01 = edge_function(row, col, v0, v1) as f64;
    let e12 = edge_function(row, col, v1, v2) as f64;
    let e20 = edge_function(row, col, v2, v0) as f64;
    (e12 / area, e20 / area, e01 / area)
}

fn parallelogram_area(v0: CellPos, v1: CellPos, v2: CellPos) -> i64 {
    (v1.col - v0.col) * (v2.row - v0.row) - (v2.col - v0.col) * (v1.row - v0.row)
}

fn edge_function(row: i64, col: i64, a: CellPos, b: CellPos) -> i64 {
    (a.row - b.row) * col + (b.col - a.col) * row + (a.col * b.row - a.row * b.col)
}
