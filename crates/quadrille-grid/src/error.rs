//! Error types for the quadrille crates.

use thiserror::Error;

/// Errors raised while constructing a quadrille.
///
/// Only structural construction problems are fatal. Every other irregularity
/// (out-of-bounds reads, oversized bitboards applied to an existing grid,
/// unknown FEN symbols, bad flood directions) is logged and the operation
/// degrades to a no-op, so traversals never fail midway.
#[derive(Error, Debug)]
pub enum QuadrilleError {
    #[error("quadrille width must be at least 1")]
    ZeroWidth,

    #[error("quadrille height must be at least 1")]
    ZeroHeight,

    #[error("cell memory must contain at least one cell")]
    EmptyMemory,

    #[error("bitboard cannot be negative")]
    NegativeBitboard,

    #[error("bitboard has {bits} bits but the quadrille holds only {capacity}")]
    BitboardOverflow { bits: u64, capacity: u64 },

    #[error("not a FEN placement string: {0}")]
    BadFen(String),

    #[error("expected {expected} pixels for a {width}x{height} image, got {got}")]
    PixelCountMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, QuadrilleError>;
