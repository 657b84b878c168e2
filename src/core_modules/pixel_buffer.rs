// THEORY:
// The `PixelBuffer` is the only data type the glitch engine moves around. Every
// component (extractor, transforms, compositor) consumes and produces buffers and
// nothing else, which keeps file I/O out of the core entirely.
//
// Key architectural principles:
// 1.  **Always Initialized**: A buffer either exists with `width * height` initialized
//     pixels or does not exist at all. New buffers are zero-filled.
// 2.  **Single Owner**: A buffer is a plain owned value. Replacing a buffer in an
//     `Option` slot drops the old one on assignment, so two live owners of the same
//     pixels can never exist.
// 3.  **Fallible Allocation**: Zero-sized requests and allocations the allocator
//     refuses are reported as `GlitchError::Allocation` instead of aborting.
// 4.  **Fixed Size**: There is no resize. A new size means a new buffer.

use crate::core_modules::pixel::pixel::PackedPixel;
use crate::error::{GlitchError, Result};

/// A row-major raster of packed 32-bit pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<PackedPixel>,
}

impl PixelBuffer {
    /// Allocates a zero-filled `width` x `height` buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, 0)
    }

    /// Allocates a buffer with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: PackedPixel) -> Result<Self> {
        let len = Self::pixel_count(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| GlitchError::Allocation { width, height })?;
        pixels.resize(len, value);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wraps existing row-major pixel data. The length must match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<PackedPixel>) -> Result<Self> {
        if Self::pixel_count(width, height)? != pixels.len() {
            return Err(GlitchError::Allocation { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn pixel_count(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(GlitchError::Allocation { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .ok_or(GlitchError::Allocation { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(GlitchError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Reads the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Result<PackedPixel> {
        self.check_bounds(x, y)?;
        Ok(self.pixels[self.index(x, y)])
    }

    /// Writes the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, value: PackedPixel) -> Result<()> {
        self.check_bounds(x, y)?;
        let index = self.index(x, y);
        self.pixels[index] = value;
        Ok(())
    }

    /// A full row. Callers iterate `0..height`, so `y` is trusted.
    #[inline]
    pub(crate) fn row(&self, y: u32) -> &[PackedPixel] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [PackedPixel] {
        let start = self.index(0, y);
        let end = start + self.width as usize;
        &mut self.pixels[start..end]
    }

    pub fn pixels(&self) -> &[PackedPixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [PackedPixel] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<PackedPixel> {
        self.pixels
    }

    pub fn fill(&mut self, value: PackedPixel) {
        self.pixels.fill(value);
    }

    /// Wipes every pixel to zero.
    pub fn clear(&mut self) {
        self.fill(0);
    }
}
