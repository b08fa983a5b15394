//! Pixel-backed cell values.
//!
//! Image decoding and loading live outside this crate; anything that can
//! expose pixels (a decoded image, an off-screen surface, a video frame
//! grab) can sit in a cell by implementing [`PixelSource`].

use super::color::Rgba;
use crate::error::{QuadrilleError, Result};

/// Read-only pixel access for image-like cell values.
pub trait PixelSource: Send + Sync {
    /// Width in pixels.
    fn width(&self) -> usize;
    /// Height in pixels.
    fn height(&self) -> usize;
    /// Pixel at (x, y). Callers stay within bounds.
    fn pixel(&self, x: usize, y: usize) -> Rgba;
}

/// A plain in-memory pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl RasterImage {
    /// Creates a buffer filled with a single color.
    pub fn new(width: usize, height: usize, fill: Rgba) -> Result<RasterImage> {
        if width == 0 {
            return Err(QuadrilleError::ZeroWidth);
        }
        if height == 0 {
            return Err(QuadrilleError::ZeroHeight);
        }
        Ok(RasterImage {
            width,
            height,
            pixels: vec![fill; width * height],
        })
    }

    /// Wraps an existing row-major pixel buffer.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> Result<RasterImage> {
        if width == 0 {
            return Err(QuadrilleError::ZeroWidth);
        }
        if height == 0 {
            return Err(QuadrilleError::ZeroHeight);
        }
        if pixels.len() != width * height {
            return Err(QuadrilleError::PixelCountMismatch {
                width,
                height,
                expected: width * height,
                got: pixels.len(),
            });
        }
        Ok(RasterImage {
            width,
            height,
            pixels,
        })
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Copies a `width` x `height` window of `source` anchored at (x, y).
    /// Reads outside the source are transparent black.
    pub fn cropped(
        source: &dyn PixelSource,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<RasterImage> {
        let mut out = RasterImage::new(width, height, Rgba::rgba(0, 0, 0, 0))?;
        for oy in 0..height {
            for ox in 0..width {
                let (sx, sy) = (x + ox, y + oy);
                if sx < source.width() && sy < source.height() {
                    out.set_pixel(ox, oy, source.pixel(sx, sy));
                }
            }
        }
        Ok(out)
    }
}

impl PixelSource for RasterImage {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }
}
