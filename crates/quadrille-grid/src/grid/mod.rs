//! The quadrille: row-major 2D storage of heterogeneous cell values.
//!
//! Construction is a closed set of named factories (one per supported input
//! shape) instead of a single variadic entry point; all of them uphold the
//! invariants that every row has exactly `width` cells and that dimensions
//! never drop below 1x1.

pub mod algebra;
pub mod codec;
pub mod fill;
pub mod shape;
pub mod visit;

use crate::config::{Anchor, Defaults};
use crate::error::{QuadrilleError, Result};
use crate::value::{Cell, CellValue, Kind, PixelSource, RasterImage, Rgba};
use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use codec::Endian;
use visit::Filter;

/// A cell position, used by bit mappings, factories and search hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: i64,
    pub col: i64,
}

/// Bounding box of the filled cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub row: i64,
    pub col: i64,
    pub width: usize,
    pub height: usize,
}

/// Strategy for turning an image into cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pixelation {
    /// Each cell holds its sub-image tile.
    Tiles,
    /// Each cell holds the color of the nearest source pixel.
    Nearest,
    /// Each cell holds the box average of the pixels it covers.
    Average,
}

/// The 2D cell grid.
///
/// Content is mutable, identity is not: grids never merge or split in place
/// beyond their own storage, and all mutators return `&mut Self` for
/// chaining. Cloning shallow-copies the storage (fresh rows, shared cell
/// values) along with the render metadata.
#[derive(Clone, Debug)]
pub struct Quadrille {
    memory: Vec<Vec<Cell>>,
    // Render metadata: not part of grid identity, only read back by
    // offset-aware merges and the display contract.
    cell_length: f64,
    x: f64,
    y: f64,
    origin: Anchor,
    drawn_row: Option<i64>,
    drawn_col: Option<i64>,
}

impl Quadrille {
    /// An empty `width` x `height` grid.
    pub fn new(width: usize, height: usize) -> Result<Quadrille> {
        if width == 0 {
            return Err(QuadrilleError::ZeroWidth);
        }
        if height == 0 {
            return Err(QuadrilleError::ZeroHeight);
        }
        Ok(Quadrille::with_memory(vec![vec![None; width]; height]))
    }

    /// An 8x8 chessboard with the default square colors.
    pub fn chessboard() -> Quadrille {
        let defaults = Defaults::default();
        Quadrille::checkered(defaults.light_square, defaults.dark_square)
    }

    /// An 8x8 board with alternating colors, light on (0, 0).
    pub fn checkered(light: Rgba, dark: Rgba) -> Quadrille {
        let mut memory = vec![vec![None; 8]; 8];
        for (row, cells) in memory.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                let color = if (row + col) % 2 == 0 { light } else { dark };
                *cell = Some(CellValue::Color(color));
            }
        }
        Quadrille::with_memory(memory)
    }

    /// A grid from (possibly jagged) rows. Short rows are padded with empty
    /// cells up to the longest one.
    pub fn from_cells(rows: Vec<Vec<Cell>>) -> Result<Quadrille> {
        if rows.is_empty() {
            return Err(QuadrilleError::EmptyMemory);
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(QuadrilleError::ZeroWidth);
        }
        let memory = rows
            .into_iter()
            .map(|row| Quadrille::pad_row(row, width))
            .collect();
        Ok(Quadrille::with_memory(memory))
    }

    /// A grid from a flat cell sequence reshaped into rows of `width`;
    /// the tail row is padded with empty cells.
    pub fn from_flat(cells: Vec<Cell>, width: usize) -> Result<Quadrille> {
        if width == 0 {
            return Err(QuadrilleError::ZeroWidth);
        }
        if cells.is_empty() {
            return Err(QuadrilleError::EmptyMemory);
        }
        let mut memory = Vec::with_capacity(cells.len().div_ceil(width));
        let mut cells = cells.into_iter().peekable();
        while cells.peek().is_some() {
            let row: Vec<Cell> = cells.by_ref().take(width).collect();
            memory.push(Quadrille::pad_row(row, width));
        }
        Ok(Quadrille::with_memory(memory))
    }

    /// A grid from text. A string containing exactly seven `/` separators is
    /// parsed as FEN; anything else becomes a single row of one-character
    /// text cells.
    pub fn from_string(text: &str) -> Result<Quadrille> {
        if text.matches('/').count() == 7 {
            return Quadrille::from_fen(text);
        }
        let cells: Vec<Cell> = text
            .chars()
            .map(|ch| Some(CellValue::Text(ch.to_string())))
            .collect();
        let width = cells.len();
        Quadrille::from_flat(cells, width.max(1))
    }

    /// Text reshaped into rows of `width`, one character per cell.
    pub fn from_string_width(text: &str, width: usize) -> Result<Quadrille> {
        let cells: Vec<Cell> = text
            .chars()
            .map(|ch| Some(CellValue::Text(ch.to_string())))
            .collect();
        Quadrille::from_flat(cells, width)
    }

    /// An 8x8 grid from a FEN placement string with the default symbols.
    pub fn from_fen(fen: &str) -> Result<Quadrille> {
        Quadrille::from_fen_with(fen, &crate::config::ChessSymbols::default())
    }

    /// An 8x8 grid from a FEN placement string and a custom symbol table.
    pub fn from_fen_with(fen: &str, symbols: &crate::config::ChessSymbols) -> Result<Quadrille> {
        Ok(Quadrille::with_memory(codec::parse_fen(fen, symbols)?))
    }

    /// A grid of image tiles; height keeps the source aspect ratio.
    pub fn from_image(image: Arc<dyn PixelSource>, width: usize) -> Result<Quadrille> {
        Quadrille::from_image_with(image, width, Pixelation::Tiles)
    }

    /// A grid built from an image with an explicit pixelation strategy.
    pub fn from_image_with(
        image: Arc<dyn PixelSource>,
        width: usize,
        pixelation: Pixelation,
    ) -> Result<Quadrille> {
        if width == 0 || image.width() == 0 {
            return Err(QuadrilleError::ZeroWidth);
        }
        let height =
            ((width as f64 * image.height() as f64 / image.width() as f64).round()) as usize;
        if height == 0 {
            return Err(QuadrilleError::ZeroHeight);
        }
        let mut quadrille = Quadrille::new(width, height)?;
        match pixelation {
            Pixelation::Tiles => quadrille.image_tiles(image.as_ref())?,
            Pixelation::Nearest => quadrille.image_nearest(image.as_ref()),
            Pixelation::Average => quadrille.image_average(image.as_ref()),
        }
        Ok(quadrille)
    }

    /// A grid whose filled pattern is the given bitboard, with height derived
    /// from the bit length (`ceil(bit_length / width)`).
    pub fn from_bitboard(
        width: usize,
        bits: &BigInt,
        value: CellValue,
        endian: Endian,
    ) -> Result<Quadrille> {
        if width == 0 {
            return Err(QuadrilleError::ZeroWidth);
        }
        if bits.sign() == Sign::Minus {
            return Err(QuadrilleError::NegativeBitboard);
        }
        let bit_length = bits.bits().max(1);
        let height = bit_length.div_ceil(width as u64) as usize;
        let mut quadrille = Quadrille::new(width, height)?;
        quadrille.fill_bitboard(bits, &value, endian);
        Ok(quadrille)
    }

    /// A `width` x `height` grid whose filled pattern is the given bitboard.
    /// Negative or over-long bitboards are construction errors on this path.
    pub fn from_bitboard_sized(
        width: usize,
        height: usize,
        bits: &BigInt,
        value: CellValue,
        endian: Endian,
    ) -> Result<Quadrille> {
        if bits.sign() == Sign::Minus {
            return Err(QuadrilleError::NegativeBitboard);
        }
        let capacity = (width * height) as u64;
        if bits.bits() > capacity {
            return Err(QuadrilleError::BitboardOverflow {
                bits: bits.bits(),
                capacity,
            });
        }
        let mut quadrille = Quadrille::new(width, height)?;
        quadrille.fill_bitboard(bits, &value, endian);
        Ok(quadrille)
    }

    /// An empty grid with every cell matching `predicate` filled with `value`.
    pub fn with_predicate(
        width: usize,
        height: usize,
        predicate: impl Fn(&visit::CellVisit<'_>) -> bool,
        value: CellValue,
    ) -> Result<Quadrille> {
        let mut quadrille = Quadrille::new(width, height)?;
        quadrille.fill_where(predicate, value);
        Ok(quadrille)
    }

    /// An empty grid with `order` randomly chosen cells filled with `value`.
    pub fn with_order(
        width: usize,
        height: usize,
        order: usize,
        value: CellValue,
    ) -> Result<Quadrille> {
        let mut quadrille = Quadrille::new(width, height)?;
        quadrille.rand(order, Some(value));
        Ok(quadrille)
    }

    fn with_memory(memory: Vec<Vec<Cell>>) -> Quadrille {
        Quadrille {
            memory,
            cell_length: Defaults::default().cell_length,
            x: 0.0,
            y: 0.0,
            origin: Anchor::Corner,
            drawn_row: None,
            drawn_col: None,
        }
    }

    // Rows are kept uniform-length here; transpose relies on it.
    fn pad_row(mut row: Vec<Cell>, width: usize) -> Vec<Cell> {
        row.resize(width, None);
        row
    }

    pub(crate) fn memory(&self) -> &Vec<Vec<Cell>> {
        &self.memory
    }

    pub(crate) fn memory_mut(&mut self) -> &mut Vec<Vec<Cell>> {
        &mut self.memory
    }

    pub(crate) fn replace_memory(&mut self, memory: Vec<Vec<Cell>>) {
        self.memory = memory;
    }

    // PROPERTIES

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.memory[0].len()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.memory.len()
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.width() * self.height()
    }

    /// Number of filled cells.
    pub fn order(&self) -> usize {
        let mut count = 0;
        self.visit(&Filter::Filled, |_| count += 1);
        count
    }

    /// Number of filled cells in one row; 0 when the row is out of bounds.
    pub fn magnitude(&self, row: i64) -> usize {
        if !self.is_valid(row, 0) {
            return 0;
        }
        self.memory[row as usize]
            .iter()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Whether (row, col) addresses a cell.
    pub fn is_valid(&self, row: i64, col: i64) -> bool {
        row >= 0 && (row as usize) < self.height() && col >= 0 && (col as usize) < self.width()
    }

    /// Slot at (row, col), or `None` when out of bounds. An in-bounds empty
    /// cell reads as `Some(&None)`.
    pub fn read(&self, row: i64, col: i64) -> Option<&Cell> {
        if self.is_valid(row, col) {
            Some(&self.memory[row as usize][col as usize])
        } else {
            None
        }
    }

    /// Value at (row, col); `None` covers both out-of-bounds and empty.
    pub fn value_at(&self, row: i64, col: i64) -> Option<&CellValue> {
        self.read(row, col).and_then(|cell| cell.as_ref())
    }

    pub fn is_empty_at(&self, row: i64, col: i64) -> bool {
        matches!(self.read(row, col), Some(None))
    }

    pub fn is_filled_at(&self, row: i64, col: i64) -> bool {
        matches!(self.read(row, col), Some(Some(_)))
    }

    /// Value kind at (row, col), if the cell is in bounds and filled.
    pub fn kind_at(&self, row: i64, col: i64) -> Option<Kind> {
        self.value_at(row, col).map(CellValue::kind)
    }

    /// Flattened row-major copy of the cells.
    pub fn to_flat(&self) -> Vec<Cell> {
        self.memory.iter().flatten().cloned().collect()
    }

    /// Reloads content from a flat row-major sequence, reshaped to the
    /// current width; the height becomes `ceil(len / width)` and the tail
    /// row is padded with empty cells. Sequences shorter than one row keep
    /// at least a single row.
    pub fn load_flat(&mut self, cells: Vec<Cell>) -> &mut Self {
        let width = self.width();
        let mut memory: Vec<Vec<Cell>> = Vec::with_capacity(cells.len().div_ceil(width).max(1));
        let mut cells = cells.into_iter().peekable();
        while cells.peek().is_some() {
            let row: Vec<Cell> = cells.by_ref().take(width).collect();
            memory.push(Quadrille::pad_row(row, width));
        }
        if memory.is_empty() {
            memory.push(vec![None; width]);
        }
        self.memory = memory;
        self
    }

    // RESIZING

    /// Grows or shrinks to `height` rows by inserting or deleting at the
    /// tail; the height never drops below 1.
    pub fn set_height(&mut self, height: usize) -> &mut Self {
        let target = height.max(1);
        while self.height() < target {
            let at = self.height() as i64;
            self.insert(at);
        }
        while self.height() > target {
            let at = self.height() as i64 - 1;
            self.delete(at);
        }
        self
    }

    /// Resizes columns by reusing the row-resize path across a transpose.
    pub fn set_width(&mut self, width: usize) -> &mut Self {
        self.transpose();
        self.set_height(width);
        self.transpose();
        self
    }

    // RENDER METADATA

    pub fn cell_length(&self) -> f64 {
        self.cell_length
    }

    pub fn set_cell_length(&mut self, cell_length: f64) -> &mut Self {
        self.cell_length = cell_length;
        self
    }

    /// Pixel position recorded by the last draw.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn origin(&self) -> Anchor {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Anchor) -> &mut Self {
        self.origin = origin;
        self
    }

    /// Cell coordinates recorded by the last draw, when they were integral.
    /// Feeds offset inference in the merge engine.
    pub fn drawn_at(&self) -> (Option<i64>, Option<i64>) {
        (self.drawn_row, self.drawn_col)
    }

    pub fn set_drawn_at(&mut self, row: Option<i64>, col: Option<i64>) -> &mut Self {
        self.drawn_row = row;
        self.drawn_col = col;
        self
    }

    // IMAGE CONSTRUCTION HELPERS

    fn image_tiles(&mut self, image: &dyn PixelSource) -> Result<()> {
        let cell_width = image.width() as f64 / self.width() as f64;
        let cell_height = image.height() as f64 / self.height() as f64;
        for row in 0..self.height() {
            for col in 0..self.width() {
                let tile = RasterImage::cropped(
                    image,
                    (col as f64 * cell_width) as usize,
                    (row as f64 * cell_height) as usize,
                    (cell_width.ceil() as usize).max(1),
                    (cell_height.ceil() as usize).max(1),
                )?;
                self.memory[row][col] = Some(CellValue::image(tile));
            }
        }
        Ok(())
    }

    fn image_nearest(&mut self, image: &dyn PixelSource) {
        for row in 0..self.height() {
            for col in 0..self.width() {
                let x = (col * image.width() / self.width()).min(image.width() - 1);
                let y = (row * image.height() / self.height()).min(image.height() - 1);
                self.memory[row][col] = Some(CellValue::Color(image.pixel(x, y)));
            }
        }
    }

    fn image_average(&mut self, image: &dyn PixelSource) {
        let (width, height) = (self.width(), self.height());
        let mut sums = vec![vec![[0.0f64; 5]; width]; height];
        for py in 0..image.height() {
            for px in 0..image.width() {
                let row = (py * height / image.height()).min(height - 1);
                let col = (px * width / image.width()).min(width - 1);
                let pixel = image.pixel(px, py);
                let bucket = &mut sums[row][col];
                bucket[0] += pixel.r as f64;
                bucket[1] += pixel.g as f64;
                bucket[2] += pixel.b as f64;
                bucket[3] += pixel.a as f64;
                bucket[4] += 1.0;
            }
        }
        for row in 0..height {
            for col in 0..width {
                let [r, g, b, a, total] = sums[row][col];
                if total > 0.0 {
                    self.memory[row][col] = Some(CellValue::Color(Rgba::from_channels(&[
                        r / total,
                        g / total,
                        b / total,
                        a / total,
                    ])));
                }
            }
        }
    }
}

// Equality compares dimensions and cell content; render metadata is ignored.
impl PartialEq for Quadrille {
    fn eq(&self, other: &Quadrille) -> bool {
        self.memory == other.memory
    }
}
