// THEORY:
// The `Chunk` module is where a glitch begins: it lifts a rectangular block of
// pixels out of a source raster into its own standalone `PixelBuffer`.
//
// Key architectural principles:
// 1.  **Origin Must Be Inside**: A region whose top-left corner lies outside the
//     source is rejected. It is never silently clamped down to nothing.
// 2.  **Clip, Don't Fail**: A region that starts inside but runs past the right or
//     bottom edge is shrunk to fit. The shrunken size is what the caller gets back
//     in the returned `ChunkRegion` and what sizes the new buffer.
// 3.  **Copy or Cut**: With `cut` the copied source pixels are zeroed in the same
//     scan that copies them, so the chunk is removed from the source.
// 4.  **Anchor**: The returned `ChunkRegion` remembers where the chunk came from.
//     The compositor pastes relative to that anchor, not at absolute coordinates.

pub mod chunk {
    use crate::core_modules::pixel_buffer::PixelBuffer;
    use crate::error::{GlitchError, Result};

    /// The location and size of a chunk within its source raster.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChunkRegion {
        /// Column of the top-left corner in the source.
        pub x: u32,
        /// Row of the top-left corner in the source.
        pub y: u32,
        pub width: u32,
        pub height: u32,
    }

    impl ChunkRegion {
        pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
            Self {
                x,
                y,
                width,
                height,
            }
        }

        /// Shrinks the region so it ends inside a `source_width` x `source_height`
        /// raster. A region ending exactly on the edge is already inside and is
        /// left untouched.
        pub fn clip_to(&self, source_width: u32, source_height: u32) -> Result<ChunkRegion> {
            if self.x >= source_width || self.y >= source_height {
                return Err(GlitchError::RegionOutOfBounds {
                    x: self.x,
                    y: self.y,
                    width: source_width,
                    height: source_height,
                });
            }

            Ok(ChunkRegion {
                x: self.x,
                y: self.y,
                width: self.width.min(source_width - self.x),
                height: self.height.min(source_height - self.y),
            })
        }
    }

    /// Copies (or cuts) `region` out of `source` into a new buffer.
    ///
    /// Returns the chunk along with the clipped region it was taken from.
    pub fn extract(
        source: &mut PixelBuffer,
        region: ChunkRegion,
        cut: bool,
    ) -> Result<(PixelBuffer, ChunkRegion)> {
        let clipped = region.clip_to(source.width(), source.height())?;
        let mut chunk = PixelBuffer::new(clipped.width, clipped.height)?;

        let start = clipped.x as usize;
        let end = start + clipped.width as usize;

        for row in 0..clipped.height {
            let source_row = &mut source.row_mut(clipped.y + row)[start..end];
            chunk.row_mut(row).copy_from_slice(source_row);
            if cut {
                source_row.fill(0);
            }
        }

        Ok((chunk, clipped))
    }
}
