//! quadrille-grid - heterogeneous 2D cell grid and its core algorithms.
//!
//! The central type is [`Quadrille`]: row-major storage of [`Cell`] slots,
//! each holding one [`CellValue`] or the empty marker. On top of the storage
//! sit the iteration engine, the bitboard/FEN codecs, the set-algebra merge
//! engine and the flood/fill operations. Rendering stays outside this crate;
//! see the facade crate's display contract.

pub mod config;
pub mod error;
pub mod grid;
pub mod value;

pub use config::{Anchor, ChessSymbols, Defaults};
pub use error::{QuadrilleError, Result};
pub use grid::codec::{bit_cell, bit_index, Endian};
pub use grid::visit::{CellVisit, Filter};
pub use grid::{CellPos, Pixelation, Quadrille, Span};
pub use value::{
    is_empty, is_filled, Cell, CellAttachment, CellValue, DisplayCell, DrawArgs, FactoryFn, Kind,
    ObjectCell, PixelSource, RasterImage, Rgba, Sym,
};

pub use num_bigint::BigInt;
