//! Kernel convolution over color cells.

use quadrille_grid::{CellValue, Quadrille, Rgba};

/// Convolution filtering with a quadrille kernel.
///
/// Kernels must be square with an odd side. Weights are numeric cell values
/// or the luma of color cells; other kernel cells contribute nothing. Only
/// color-valued neighbors contribute to the weighted sum, and a cell with no
/// contributing neighbor in its window is left unmodified.
pub trait Convolve {
    /// Convolves every interior cell (margin = half the kernel size) against
    /// a snapshot of the grid, so reads stay consistent while writing.
    fn convolve(&mut self, mask: &Quadrille) -> &mut Self;

    /// Convolves a single interior cell against the live grid.
    fn convolve_at(&mut self, mask: &Quadrille, row: i64, col: i64) -> &mut Self;
}

impl Convolve for Quadrille {
    fn convolve(&mut self, mask: &Quadrille) -> &mut Self {
        if !kernel_fits(mask, self) {
            return self;
        }
        let half = ((mask.width() - 1) / 2) as i64;
        let (width, height) = (self.width() as i64, self.height() as i64);
        let source = self.clone();
        for row in half..(height - half) {
            for col in half..(width - half) {
                if let Some(color) = convolved(&source, mask, row, col, half) {
                    self.fill_cell(row, col, CellValue::Color(color));
                }
            }
        }
        self
    }

    fn convolve_at(&mut self, mask: &Quadrille, row: i64, col: i64) -> &mut Self {
        if !kernel_fits(mask, self) {
            return self;
        }
        let half = ((mask.width() - 1) / 2) as i64;
        let (width, height) = (self.width() as i64, self.height() as i64);
        if row >= half && row < height - half && col >= half && col < width - half {
            if let Some(color) = convolved(self, mask, row, col, half) {
                self.fill_cell(row, col, CellValue::Color(color));
            }
        }
        self
    }
}

fn kernel_fits(mask: &Quadrille, grid: &Quadrille) -> bool {
    mask.size() % 2 == 1 && mask.width() == mask.height() && grid.size() >= mask.size()
}

fn convolved(
    source: &Quadrille,
    mask: &Quadrille,
    row: i64,
    col: i64,
    half: i64,
) -> Option<Rgba> {
    let mut r = 0.0;
    let mut g = 0.0;
    let mut b = 0.0;
    let mut apply = false;
    for mask_row in 0..mask.height() as i64 {
        for mask_col in 0..mask.width() as i64 {
            let neighbor = source.value_at(row + mask_row - half, col + mask_col - half);
            let Some(CellValue::Color(color)) = neighbor else {
                continue;
            };
            let weight = match mask.value_at(mask_row, mask_col) {
                Some(CellValue::Number(n)) => *n,
                Some(CellValue::Color(c)) => c.luma(),
                _ => continue,
            };
            apply = true;
            r += color.r as f64 * weight;
            g += color.g as f64 * weight;
            b += color.b as f64 * weight;
        }
    }
    apply.then(|| {
        Rgba::rgb(
            r.round().clamp(0.0, 255.0) as u8,
            g.round().clamp(0.0, 255.0) as u8,
            b.round().clamp(0.0, 255.0) as u8,
        )
    })
}
