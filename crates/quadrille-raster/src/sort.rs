//! Ordering cells by color.
//!
//! Cells are weighed through a structural sample: colors sample as
//! themselves, numbers and bigints as their clamped gray level, anything
//! else (including empty cells) as the configured background.

use quadrille_grid::{Cell, CellValue, Defaults, Quadrille, Rgba};
use serde::{Deserialize, Serialize};

/// Sorting strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Weighted grayscale value.
    #[default]
    Luma,
    /// Average of the red, green and blue channels.
    Avg,
    /// Euclidean distance to the target color in RGBA space.
    Distance,
}

/// Options for [`SortCells::sort_cells`].
#[derive(Clone, Copy, Debug)]
pub struct SortOptions {
    pub mode: SortMode,
    pub ascending: bool,
    /// Sample color for cells without an intrinsic one.
    pub background: Rgba,
    /// Reference color for [`SortMode::Distance`].
    pub target: Rgba,
}

impl Default for SortOptions {
    fn default() -> SortOptions {
        let defaults = Defaults::default();
        SortOptions {
            mode: SortMode::Luma,
            ascending: true,
            background: defaults.background,
            target: defaults.outline,
        }
    }
}

/// Reorders the flattened cells by their sampled color weight, then reloads
/// them row-major.
pub trait SortCells {
    fn sort_cells(&mut self, options: &SortOptions) -> &mut Self;
}

impl SortCells for Quadrille {
    fn sort_cells(&mut self, options: &SortOptions) -> &mut Self {
        let mut cells = self.to_flat();
        cells.sort_by(|a, b| weight(a, options).total_cmp(&weight(b, options)));
        if !options.ascending {
            cells.reverse();
        }
        self.load_flat(cells)
    }
}

fn sample(cell: &Cell, background: Rgba) -> Rgba {
    match cell {
        Some(CellValue::Color(color)) => *color,
        Some(CellValue::Number(n)) => {
            let level = n.round().clamp(0.0, 255.0) as u8;
            Rgba::rgb(level, level, level)
        }
        Some(CellValue::BigInt(n)) => {
            let level = n
                .to_string()
                .parse::<f64>()
                .unwrap_or(255.0)
                .round()
                .clamp(0.0, 255.0) as u8;
            Rgba::rgb(level, level, level)
        }
        _ => background,
    }
}

fn weight(cell: &Cell, options: &SortOptions) -> f64 {
    let color = sample(cell, options.background);
    match options.mode {
        SortMode::Luma => color.luma(),
        SortMode::Avg => 0.333 * (color.r as f64 + color.g as f64 + color.b as f64),
        SortMode::Distance => {
            let target = options.target;
            (((color.r as f64 - target.r as f64).powi(2))
                + ((color.g as f64 - target.g as f64).powi(2))
                + ((color.b as f64 - target.b as f64).powi(2))
                + ((color.a as f64 - target.a as f64).powi(2)))
            .sqrt()
        }
    }
}
