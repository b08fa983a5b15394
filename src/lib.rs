//! quadrille - heterogeneous 2D cell grids.
//!
//! Facade over the workspace crates: re-exports the grid data structure
//! ([`Quadrille`], its codecs, algebra and fill engine) and the visual
//! algorithms, and hosts the display contract in [`render`].

pub mod render;

pub use quadrille_grid::{
    bit_cell, bit_index, is_empty, is_filled, Anchor, BigInt, Cell, CellAttachment, CellPos,
    CellValue, CellVisit, ChessSymbols, Defaults, DisplayCell, DrawArgs, Endian, FactoryFn,
    Filter, Kind, ObjectCell, PixelSource, Pixelation, Quadrille, QuadrilleError, RasterImage,
    Result, Rgba, Span, Sym,
};
pub use quadrille_raster::{Convolve, Rasterize, SortCells, SortMode, SortOptions};

pub use render::{draw_quadrille, visit_quadrille, CellRenderer, CellView, DrawParams};
