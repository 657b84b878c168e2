// THEORY:
// The codec is the only place the engine touches image files. It converts between
// whatever the `image` crate can read or write and the engine's fixed in-memory
// format: one packed RGBA pixel per `u32`, row-major, rows top-to-bottom.
//
// Orientation is fixed in both directions. `decode` hands the core rows in
// top-to-bottom order and `encode` expects the same order back, so no row reversal
// happens anywhere in the engine.

use std::io::Write;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use crate::core_modules::pixel::pixel::{Byte, Bytes, CHANNELS, PackedPixel, Rgba};
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::{GlitchError, Result};

/// Packs raw RGBA8 bytes into a `PixelBuffer`.
pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[Byte]) -> Result<PixelBuffer> {
    if bytes.len() % CHANNELS != 0 {
        return Err(GlitchError::Allocation { width, height });
    }
    let pixels = bytes
        .chunks_exact(CHANNELS)
        .map(|px| Rgba::try_from(px).map(PackedPixel::from))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| GlitchError::Allocation { width, height })?;
    PixelBuffer::from_pixels(width, height, pixels)
}

/// Unpacks a `PixelBuffer` into raw RGBA8 bytes.
pub fn to_rgba_bytes(buffer: &PixelBuffer) -> Vec<Byte> {
    buffer
        .pixels()
        .iter()
        .flat_map(|&pixel| Bytes::from(Rgba::from(pixel)))
        .collect()
}

/// Reads an image file into a top-to-bottom `PixelBuffer`.
pub fn decode(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let rgba = image::open(path.as_ref())?.to_rgba8();
    let (width, height) = rgba.dimensions();
    from_rgba_bytes(width, height, rgba.as_raw())
}

/// Writes `buffer` to `path`, choosing the format from the extension.
pub fn encode(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), to_rgba_bytes(buffer)).ok_or(
        GlitchError::Allocation {
            width: buffer.width(),
            height: buffer.height(),
        },
    )?;

    match ImageFormat::from_path(path)? {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(rgba).to_rgb8().save(path)?,
        _ => rgba.save(path)?,
    }
    Ok(())
}

/// Streams `buffer` as a PNG into any writer.
pub fn write_png<W: Write>(buffer: &PixelBuffer, writer: W) -> Result<()> {
    let encoder = PngEncoder::new(writer);
    encoder.write_image(
        &to_rgba_bytes(buffer),
        buffer.width(),
        buffer.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}
