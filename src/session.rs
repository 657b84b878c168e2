// THEORY:
// The `GlitchSession` is the top-level API of the engine. It owns the three live
// rasters of a glitch run and sequences the core modules over them:
//
//     load_input -> pull_chunk -> [flip_chunk | corrupt_chunk]* -> paste_chunk -> save_output
//
// Key architectural principles:
// 1.  **Slots, Not Pointers**: Input, chunk and output each live in an `Option`. An
//     empty slot is how "not loaded yet" is expressed, and it is turned into
//     `NoSourceBuffer` / `NoChunkBuffer` / `NoDestBuffer` at the point of use.
// 2.  **One Live Chunk**: Pulling a new chunk drops the previous one. A transform's
//     result replaces the chunk only when it succeeds; a failed step leaves every
//     slot as it was.
// 3.  **Accumulating Output**: The output raster survives input reloads unless a
//     clear is requested, so one output can be built from several inputs.
// 4.  **Fail Fast**: Every step returns its error untouched. Nothing here retries.

use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::codec;
use crate::core_modules::blend::BlendMode;
use crate::core_modules::chunk::chunk::{self, ChunkRegion};
use crate::core_modules::compositor;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::transform::{ChunkTransform, Corrupt, Flip};
use crate::error::{GlitchError, Result};

/// Owns the input, current chunk and output rasters of a glitch run.
#[derive(Debug, Default)]
pub struct GlitchSession {
    input: Option<PixelBuffer>,
    chunk: Option<PixelBuffer>,
    /// Where the current chunk was pulled from, clipped to the input.
    anchor: ChunkRegion,
    output: Option<PixelBuffer>,
}

impl GlitchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `path` and makes it the input raster.
    pub fn load_input(&mut self, path: impl AsRef<Path>, clear: bool) -> Result<()> {
        let path = path.as_ref();
        let buffer = codec::decode(path)?;
        info!(
            "Loaded input {} ({}x{})",
            path.display(),
            buffer.width(),
            buffer.height()
        );
        self.load_input_buffer(buffer, clear)
    }

    /// Makes `buffer` the input raster.
    ///
    /// The output raster is (re)allocated at the input's size when `clear` is set or
    /// when none exists yet; a clear also wipes it to zero. Otherwise the existing
    /// output and everything pasted into it is kept.
    pub fn load_input_buffer(&mut self, buffer: PixelBuffer, clear: bool) -> Result<()> {
        let (width, height) = (buffer.width(), buffer.height());
        self.input = Some(buffer);

        if clear || self.output.is_none() {
            // Release the old raster before allocating its replacement.
            self.output = None;
            self.output = Some(PixelBuffer::new(width, height)?);
            debug!("Allocated {}x{} output raster", width, height);
        }
        Ok(())
    }

    /// Pulls a chunk out of the input raster, replacing the current chunk.
    ///
    /// With `cut` the pulled pixels are zeroed in the input.
    pub fn pull_chunk(&mut self, x: u32, y: u32, width: u32, height: u32, cut: bool) -> Result<()> {
        let source = self.input.as_mut().ok_or(GlitchError::NoSourceBuffer)?;
        let (pulled, region) = chunk::extract(source, ChunkRegion::new(x, y, width, height), cut)?;
        debug!(
            "Pulled {}x{} chunk at ({}, {}){}",
            region.width,
            region.height,
            region.x,
            region.y,
            if cut { " (cut)" } else { "" }
        );
        self.chunk = Some(pulled);
        self.anchor = region;
        Ok(())
    }

    /// Replaces the current chunk with the result of `transform`.
    ///
    /// On failure the current chunk and its anchor are kept.
    pub fn transform_chunk(&mut self, transform: &impl ChunkTransform) -> Result<()> {
        let current = self.chunk.as_ref().ok_or(GlitchError::NoChunkBuffer)?;
        let replacement = transform.apply(current)?;
        self.chunk = Some(replacement);
        Ok(())
    }

    /// Mirrors the current chunk horizontally and/or vertically.
    pub fn flip_chunk(&mut self, horizontal: bool, vertical: bool) -> Result<()> {
        self.transform_chunk(&Flip::new(horizontal, vertical))?;
        debug!("Flipped chunk (horizontal: {}, vertical: {})", horizontal, vertical);
        Ok(())
    }

    /// Scrambles the current chunk's `tile_width` x `tile_height` tiles.
    pub fn corrupt_chunk(
        &mut self,
        tile_width: u32,
        tile_height: u32,
        seed: Option<u64>,
    ) -> Result<()> {
        self.transform_chunk(&Corrupt {
            tile_width,
            tile_height,
            seed,
        })?;
        debug!("Corrupted chunk with {}x{} tiles", tile_width, tile_height);
        Ok(())
    }

    /// Blends the current chunk into the output at its anchor shifted by
    /// (`translate_x`, `translate_y`).
    pub fn paste_chunk(
        &mut self,
        translate_x: u32,
        translate_y: u32,
        mode: BlendMode,
    ) -> Result<()> {
        let pasted = self.chunk.as_ref().ok_or(GlitchError::NoChunkBuffer)?;
        let dest = self.output.as_mut().ok_or(GlitchError::NoDestBuffer)?;
        compositor::composite(dest, pasted, self.anchor, translate_x, translate_y, mode);
        debug!(
            "Pasted chunk with {} at translation ({}, {})",
            mode, translate_x, translate_y
        );
        Ok(())
    }

    /// Encodes the output raster to `path`.
    pub fn save_output(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let output = self.output.as_ref().ok_or(GlitchError::NoDestBuffer)?;
        codec::encode(output, path)?;
        info!(
            "Saved output {} ({}x{})",
            path.display(),
            output.width(),
            output.height()
        );
        Ok(())
    }

    /// Streams the output raster as PNG, e.g. to stdout.
    pub fn write_output_png<W: Write>(&self, writer: W) -> Result<()> {
        let output = self.output.as_ref().ok_or(GlitchError::NoDestBuffer)?;
        codec::write_png(output, writer)
    }

    pub fn input(&self) -> Option<&PixelBuffer> {
        self.input.as_ref()
    }

    pub fn chunk(&self) -> Option<&PixelBuffer> {
        self.chunk.as_ref()
    }

    /// The clipped source region of the current chunk.
    pub fn anchor(&self) -> Option<ChunkRegion> {
        self.chunk.as_ref().map(|_| self.anchor)
    }

    pub fn output(&self) -> Option<&PixelBuffer> {
        self.output.as_ref()
    }

    pub fn output_mut(&mut self) -> Option<&mut PixelBuffer> {
        self.output.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(width: u32, height: u32, value: u32) -> GlitchSession {
        let mut session = GlitchSession::new();
        session
            .load_input_buffer(PixelBuffer::filled(width, height, value).unwrap(), true)
            .unwrap();
        session
    }

    #[test]
    fn steps_before_loading_report_missing_buffers() {
        let mut session = GlitchSession::new();
        assert!(matches!(
            session.pull_chunk(0, 0, 1, 1, false),
            Err(GlitchError::NoSourceBuffer)
        ));
        assert!(matches!(
            session.flip_chunk(true, false),
            Err(GlitchError::NoChunkBuffer)
        ));
        assert!(matches!(
            session.paste_chunk(0, 0, BlendMode::Or),
            Err(GlitchError::NoChunkBuffer)
        ));
        assert!(matches!(
            session.save_output("never_written.png"),
            Err(GlitchError::NoDestBuffer)
        ));
        assert!(matches!(
            session.write_output_png(Vec::new()),
            Err(GlitchError::NoDestBuffer)
        ));
    }

    #[test]
    fn output_streams_as_png() {
        let session = loaded(3, 2, 1);
        let mut bytes = Vec::new();
        session.write_output_png(&mut bytes).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn loading_allocates_a_matching_zeroed_output() {
        let session = loaded(5, 3, 0xFFFF_FFFF);
        let output = session.output().unwrap();
        assert_eq!((output.width(), output.height()), (5, 3));
        assert!(output.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn reloading_without_clear_keeps_the_output() {
        let mut session = loaded(2, 2, 1);
        session.output_mut().unwrap().fill(0xABCD);

        session
            .load_input_buffer(PixelBuffer::filled(6, 6, 2).unwrap(), false)
            .unwrap();
        let output = session.output().unwrap();
        assert_eq!((output.width(), output.height()), (2, 2));
        assert!(output.pixels().iter().all(|&p| p == 0xABCD));
        assert_eq!(session.input().unwrap().width(), 6);
    }

    #[test]
    fn reloading_with_clear_resizes_and_wipes() {
        let mut session = loaded(2, 2, 1);
        session.output_mut().unwrap().fill(0xABCD);

        session
            .load_input_buffer(PixelBuffer::filled(3, 4, 2).unwrap(), true)
            .unwrap();
        let output = session.output().unwrap();
        assert_eq!((output.width(), output.height()), (3, 4));
        assert!(output.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn each_pull_replaces_the_chunk_and_anchor() {
        let mut session = loaded(8, 8, 3);
        session.pull_chunk(0, 0, 4, 4, false).unwrap();
        session.pull_chunk(6, 5, 4, 4, false).unwrap();

        assert_eq!(session.anchor(), Some(ChunkRegion::new(6, 5, 2, 3)));
        let current = session.chunk().unwrap();
        assert_eq!((current.width(), current.height()), (2, 3));
    }

    #[test]
    fn failed_pull_keeps_the_previous_chunk() {
        let mut session = loaded(4, 4, 3);
        session.pull_chunk(1, 1, 2, 2, false).unwrap();
        assert!(session.pull_chunk(9, 9, 1, 1, false).is_err());
        assert_eq!(session.anchor(), Some(ChunkRegion::new(1, 1, 2, 2)));
    }

    #[test]
    fn cut_removes_pixels_from_the_input() {
        let mut session = loaded(3, 3, 7);
        session.pull_chunk(0, 0, 2, 1, true).unwrap();
        let input = session.input().unwrap();
        assert_eq!(input.row(0), &[0, 0, 7]);
        assert_eq!(input.row(1), &[7, 7, 7]);
    }

    #[test]
    fn flipped_chunk_pastes_mirrored() {
        let mut session = GlitchSession::new();
        let input = PixelBuffer::from_pixels(3, 1, vec![1, 2, 3]).unwrap();
        session.load_input_buffer(input, true).unwrap();

        session.pull_chunk(0, 0, 3, 1, false).unwrap();
        session.flip_chunk(true, false).unwrap();
        session.paste_chunk(0, 0, BlendMode::Overwrite).unwrap();

        assert_eq!(session.output().unwrap().pixels(), &[3, 2, 1]);
    }

    #[test]
    fn rejected_corruption_keeps_the_chunk() {
        let mut session = GlitchSession::new();
        let input = PixelBuffer::from_pixels(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        session.load_input_buffer(input, true).unwrap();
        session.pull_chunk(1, 0, 2, 2, false).unwrap();

        assert!(matches!(
            session.corrupt_chunk(0, 2, Some(1)),
            Err(GlitchError::InvalidTile { width: 0, height: 2 })
        ));
        assert_eq!(session.chunk().unwrap().pixels(), &[2, 3, 5, 6]);
        assert_eq!(session.anchor(), Some(ChunkRegion::new(1, 0, 2, 2)));

        // The run can carry on with the untouched chunk.
        session.paste_chunk(0, 0, BlendMode::Overwrite).unwrap();
        assert_eq!(session.output().unwrap().pixels(), &[0, 2, 3, 0, 5, 6]);
    }
}
