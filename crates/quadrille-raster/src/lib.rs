//! quadrille-raster - visual algorithms over quadrille grids.
//!
//! Extension traits on [`quadrille_grid::Quadrille`]: kernel convolution
//! ([`Convolve`]), barycentric triangle rasterization ([`Rasterize`]) and
//! color ordering ([`SortCells`]).

pub mod filter;
pub mod raster;
pub mod sort;

pub use filter::Convolve;
pub use raster::Rasterize;
pub use sort::{SortCells, SortMode, SortOptions};
