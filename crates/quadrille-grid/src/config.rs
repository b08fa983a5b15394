//! Explicit configuration objects.
//!
//! Style defaults and the FEN symbol table are plain values threaded through
//! the operations that need them; there is no process-wide mutable state.
//! `Defaults::default()` reproduces the reference values.

use crate::value::{CellValue, Rgba};
use serde::{Deserialize, Serialize};

/// Cell anchoring convention used by rendering collaborators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    Corner,
    Center,
}

/// Style and board defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Cell size in pixels.
    pub cell_length: f64,
    pub outline: Rgba,
    pub outline_weight: f64,
    pub text_color: Rgba,
    /// Scale factor for text rendering.
    pub text_zoom: f64,
    /// Background used when sampling cells for sorting.
    pub background: Rgba,
    pub light_square: Rgba,
    pub dark_square: Rgba,
}

impl Default for Defaults {
    fn default() -> Defaults {
        Defaults {
            cell_length: 100.0,
            outline: Rgba::ORANGE_RED,
            outline_weight: 2.0,
            text_color: Rgba::DODGER_BLUE,
            text_zoom: 0.78,
            background: Rgba::WHITE,
            light_square: Rgba::rgb(0xfd, 0xcd, 0xaa),
            dark_square: Rgba::rgb(0xd2, 0x8c, 0x45),
        }
    }
}

/// Reversible FEN letter <-> cell value table.
///
/// The default maps the 12 standard FEN letters to Unicode chess glyphs.
/// Entries may be remapped to any cell value (text, images, ...); reverse
/// lookup compares by cell-value equality.
#[derive(Clone, Debug)]
pub struct ChessSymbols {
    entries: Vec<(char, CellValue)>,
}

impl ChessSymbols {
    /// Value for a FEN letter.
    pub fn value(&self, key: char) -> Option<&CellValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// FEN letter for a cell value.
    pub fn key(&self, value: &CellValue) -> Option<char> {
        self.entries
            .iter()
            .find(|(_, v)| v == value)
            .map(|(k, _)| *k)
    }

    /// Adds or replaces a single mapping.
    pub fn set(&mut self, key: char, value: CellValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &CellValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl Default for ChessSymbols {
    fn default() -> ChessSymbols {
        let glyphs = [
            ('K', "♔"),
            ('Q', "♕"),
            ('R', "♖"),
            ('B', "♗"),
            ('N', "♘"),
            ('P', "♙"),
            ('k', "♚"),
            ('q', "♛"),
            ('r', "♜"),
            ('b', "♝"),
            ('n', "♞"),
            ('p', "♟"),
        ];
        ChessSymbols {
            entries: glyphs
                .into_iter()
                .map(|(k, v)| (k, CellValue::text(v)))
                .collect(),
        }
    }
}
