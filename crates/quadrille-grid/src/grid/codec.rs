//! Bitboard and FEN interchange.
//!
//! Bitboards encode the filled/empty pattern row-major into an
//! arbitrary-precision integer, big-endian by default (top-left cell is the
//! most significant bit). FEN covers 8x8 boards through the reversible
//! symbol table in [`ChessSymbols`].

use super::visit::Filter;
use super::{CellPos, Quadrille};
use crate::config::ChessSymbols;
use crate::error::{QuadrilleError, Result};
use crate::value::{Cell, CellValue};
use log::warn;
use num_bigint::{BigInt, BigUint, Sign};

/// Bit ordering of a bitboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Endian {
    /// Top-left cell is the most significant bit.
    #[default]
    Big,
    /// Top-left cell is bit 0.
    Little,
}

/// Row-major bit index of a cell, or `None` (with a warning) when the cell
/// is out of bounds for the given dimensions.
pub fn bit_index(row: i64, col: i64, width: usize, height: usize, endian: Endian) -> Option<u64> {
    if row < 0 || row >= height as i64 || col < 0 || col >= width as i64 {
        warn!(
            "ignored out-of-bounds cell ({}, {}) for quadrille size {}x{}",
            row, col, width, height
        );
        return None;
    }
    let index = row as u64 * width as u64 + col as u64;
    Some(match endian {
        Endian::Little => index,
        Endian::Big => (width * height) as u64 - 1 - index,
    })
}

/// Cell position of a bit index; the inverse of [`bit_index`].
pub fn bit_cell(bit: u64, width: usize, height: usize, endian: Endian) -> Option<CellPos> {
    if width == 0 || height == 0 {
        warn!("ignored bit index {} for degenerate quadrille size {}x{}", bit, width, height);
        return None;
    }
    let max_index = (width * height) as u64 - 1;
    if bit > max_index {
        warn!(
            "ignored out-of-bounds bit index {} for quadrille size {}x{}; expected 0..={}",
            bit, width, height, max_index
        );
        return None;
    }
    let index = match endian {
        Endian::Little => bit,
        Endian::Big => max_index - bit,
    };
    Some(CellPos {
        row: (index / width as u64) as i64,
        col: (index % width as u64) as i64,
    })
}

impl Quadrille {
    /// [`bit_index`] with this grid's dimensions.
    pub fn bit_index_at(&self, row: i64, col: i64, endian: Endian) -> Option<u64> {
        bit_index(row, col, self.width(), self.height(), endian)
    }

    /// [`bit_cell`] with this grid's dimensions.
    pub fn bit_cell_at(&self, bit: u64, endian: Endian) -> Option<CellPos> {
        bit_cell(bit, self.width(), self.height(), endian)
    }

    /// Encodes the filled pattern as a bitboard.
    pub fn to_bitboard(&self, endian: Endian) -> BigInt {
        let length = self.size() as u64;
        let mut result = BigUint::from(0u8);
        let mut index = 0u64;
        self.visit(&Filter::All, |cell| {
            if cell.value.is_some() {
                let bit = match endian {
                    Endian::Little => index,
                    Endian::Big => length - 1 - index,
                };
                result |= BigUint::from(1u8) << bit;
            }
            index += 1;
        });
        BigInt::from(result)
    }

    /// Fills the empty cells whose bit is set in `bits`. Negative bitboards
    /// are skipped with a warning; a bitboard wider than the grid's capacity
    /// warns but still lands the in-range bits.
    pub fn fill_bitboard(&mut self, bits: &BigInt, value: &CellValue, endian: Endian) -> &mut Self {
        if bits.sign() == Sign::Minus {
            warn!("bitboard cannot be negative");
            return self;
        }
        let magnitude = bits.magnitude();
        for (row, col) in self.coords(&Filter::Empty) {
            if let Some(bit) = self.bit_index_at(row, col, endian)
                && magnitude.bit(bit)
            {
                let cell = value.resolve(row, col);
                self.memory_mut()[row as usize][col as usize] = cell;
            }
        }
        self.warn_on_overflow(bits);
        self
    }

    /// Clears the filled cells whose bit is set in `bits`; same validation
    /// as [`fill_bitboard`].
    ///
    /// [`fill_bitboard`]: Quadrille::fill_bitboard
    pub fn clear_bitboard(&mut self, bits: &BigInt, endian: Endian) -> &mut Self {
        if bits.sign() == Sign::Minus {
            warn!("bitboard cannot be negative");
            return self;
        }
        let magnitude = bits.magnitude();
        for (row, col) in self.coords(&Filter::Filled) {
            if let Some(bit) = self.bit_index_at(row, col, endian)
                && magnitude.bit(bit)
            {
                self.clear_cell(row, col);
            }
        }
        self.warn_on_overflow(bits);
        self
    }

    fn warn_on_overflow(&self, bits: &BigInt) {
        let total = bits.bits();
        let capacity = self.size() as u64;
        if total > capacity {
            warn!(
                "bitboard has {} bits but the quadrille holds only {}",
                total, capacity
            );
        }
    }

    /// FEN string of an 8x8 board using the default symbol table.
    /// Non-8x8 grids warn and return `None`.
    pub fn to_fen(&self) -> Option<String> {
        self.to_fen_with(&ChessSymbols::default())
    }

    /// FEN string of an 8x8 board using a custom symbol table. Values
    /// missing from the table degrade to `'?'` with a warning.
    pub fn to_fen_with(&self, symbols: &ChessSymbols) -> Option<String> {
        if self.width() != 8 || self.height() != 8 {
            warn!("to_fen only works on 8x8 boards");
            return None;
        }
        let mut fen = String::new();
        for (i, row) in self.memory().iter().enumerate() {
            let mut empty = 0;
            for (j, cell) in row.iter().enumerate() {
                match cell {
                    None => empty += 1,
                    Some(value) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        match symbols.key(value) {
                            Some(key) => fen.push(key),
                            None => {
                                warn!("unrecognized piece {:?} at ({}, {})", value, i, j);
                                fen.push('?');
                            }
                        }
                    }
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if i < 7 {
                fen.push('/');
            }
        }
        Some(fen)
    }
}

/// Parses a FEN placement into 8x8 cell memory. Only the first
/// space-separated field is consumed; digits advance the column as empty
/// runs, one digit at a time; characters past column 8 are ignored.
pub(crate) fn parse_fen(fen: &str, symbols: &ChessSymbols) -> Result<Vec<Vec<Cell>>> {
    if fen.matches('/').count() != 7 {
        return Err(QuadrilleError::BadFen(fen.to_string()));
    }
    let placement = fen.split(' ').next().unwrap_or("");
    let mut memory: Vec<Vec<Cell>> = vec![vec![None; 8]; 8];
    for (i, row) in placement.split('/').enumerate().take(8) {
        let mut col = 0usize;
        for ch in row.chars() {
            if let Some(run) = ch.to_digit(10) {
                col += run as usize;
            } else {
                if col < 8 {
                    memory[i][col] = symbols.value(ch).cloned();
                }
                col += 1;
            }
        }
    }
    Ok(memory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_index_big_endian_default() {
        assert_eq!(bit_index(0, 0, 8, 8, Endian::Big), Some(63));
        assert_eq!(bit_index(7, 7, 8, 8, Endian::Big), Some(0));
        assert_eq!(bit_index(0, 0, 8, 8, Endian::Little), Some(0));
    }

    #[test]
    fn test_bit_index_out_of_bounds_is_none() {
        assert_eq!(bit_index(-1, 0, 8, 8, Endian::Big), None);
        assert_eq!(bit_index(0, 8, 8, 8, Endian::Big), None);
    }

    #[test]
    fn test_bit_cell_inverts_bit_index() {
        for endian in [Endian::Big, Endian::Little] {
            for row in 0..3i64 {
                for col in 0..5i64 {
                    let bit = bit_index(row, col, 5, 3, endian).unwrap();
                    assert_eq!(bit_cell(bit, 5, 3, endian), Some(CellPos { row, col }));
                }
            }
        }
        assert_eq!(bit_cell(15, 5, 3, Endian::Big), None);
    }

    #[test]
    fn test_to_bitboard_two_diagonal_cells() {
        let mut q = Quadrille::new(2, 2).unwrap();
        q.fill_cell(0, 0, CellValue::text("X"));
        q.fill_cell(1, 1, CellValue::text("Y"));
        assert_eq!(q.to_bitboard(Endian::Big), BigInt::from(0b1001u32));
        assert_eq!(q.to_bitboard(Endian::Little), BigInt::from(0b1001u32));
    }

    #[test]
    fn test_bitboard_round_trip_uniform_marker() {
        for endian in [Endian::Big, Endian::Little] {
            let mut q = Quadrille::new(5, 3).unwrap();
            let marker = CellValue::Boolean(true);
            q.fill_cell(0, 1, marker.clone());
            q.fill_cell(2, 4, marker.clone());
            q.fill_cell(1, 0, marker.clone());
            let bits = q.to_bitboard(endian);
            let back =
                Quadrille::from_bitboard_sized(5, 3, &bits, marker.clone(), endian).unwrap();
            assert_eq!(back, q);
        }
    }

    #[test]
    fn test_fill_bitboard_skips_filled_cells() {
        let mut q = Quadrille::new(2, 2).unwrap();
        q.fill_cell(0, 0, CellValue::text("keep"));
        // All four bits set: only the three empty cells change.
        q.fill_bitboard(&BigInt::from(0b1111u32), &CellValue::Boolean(true), Endian::Big);
        assert_eq!(q.value_at(0, 0), Some(&CellValue::text("keep")));
        assert_eq!(q.order(), 4);
    }

    #[test]
    fn test_fill_bitboard_negative_is_skipped() {
        let mut q = Quadrille::new(2, 2).unwrap();
        q.fill_bitboard(&BigInt::from(-5), &CellValue::Boolean(true), Endian::Big);
        assert_eq!(q.order(), 0);
    }

    #[test]
    fn test_clear_bitboard_clears_filled_bits() {
        let mut q = Quadrille::new(2, 2).unwrap();
        q.fill_empty(CellValue::Number(1.0));
        // Big-endian bit 3 is cell (0, 0).
        q.clear_bitboard(&BigInt::from(0b1000u32), Endian::Big);
        assert!(q.is_empty_at(0, 0));
        assert_eq!(q.order(), 3);
    }

    #[test]
    fn test_to_fen_starting_position() {
        let q = Quadrille::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(
            q.to_fen().as_deref(),
            Some("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
        );
        assert_eq!(q.order(), 32);
        assert_eq!(q.value_at(0, 0), Some(&CellValue::text("♜")));
        assert_eq!(q.value_at(7, 4), Some(&CellValue::text("♔")));
    }

    #[test]
    fn test_fen_round_trip_sparse_position() {
        let fen = "8/3k4/8/8/2Q5/8/8/4K3";
        let q = Quadrille::from_fen(fen).unwrap();
        assert_eq!(q.to_fen().as_deref(), Some(fen));
    }

    #[test]
    fn test_fen_ignores_trailing_fields() {
        let q = Quadrille::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(q.order(), 1);
        assert_eq!(q.value_at(7, 4), Some(&CellValue::text("♔")));
    }

    #[test]
    fn test_fen_wrong_separator_count_is_fatal() {
        assert!(matches!(
            Quadrille::from_fen("8/8/8"),
            Err(QuadrilleError::BadFen(_))
        ));
    }

    #[test]
    fn test_fen_unknown_symbol_parses_to_empty() {
        let q = Quadrille::from_fen("x7/8/8/8/8/8/8/8").unwrap();
        assert!(q.is_empty_at(0, 0));
    }

    #[test]
    fn test_to_fen_requires_8x8() {
        let q = Quadrille::new(4, 4).unwrap();
        assert_eq!(q.to_fen(), None);
    }

    #[test]
    fn test_to_fen_unmapped_value_degrades() {
        let mut q = Quadrille::new(8, 8).unwrap();
        q.fill_cell(0, 0, CellValue::Number(42.0));
        let fen = q.to_fen().unwrap();
        assert!(fen.starts_with("?7/"));
    }

    #[test]
    fn test_from_string_detects_fen() {
        let q = Quadrille::from_string("8/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!((q.width(), q.height()), (8, 8));
        let q = Quadrille::from_string("8/8").unwrap();
        assert_eq!((q.width(), q.height()), (3, 1));
    }

    #[test]
    fn test_custom_symbols_round_trip() {
        let mut symbols = ChessSymbols::default();
        symbols.set('K', CellValue::text("king"));
        let q = Quadrille::from_fen_with("8/8/8/8/8/8/8/K7", &symbols).unwrap();
        assert_eq!(q.value_at(7, 0), Some(&CellValue::text("king")));
        assert_eq!(
            q.to_fen_with(&symbols).as_deref(),
            Some("8/8/8/8/8/8/8/K7")
        );
    }
}
