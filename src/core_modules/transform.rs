// THEORY:
// Transforms reshape the current chunk between pulling it and pasting it. They all
// share one ownership rule: a transform reads the current chunk and hands back the
// buffer that replaces it. The caller swaps the new buffer in and drops the old one
// only once the transform has succeeded, so a rejected transform leaves the chunk
// exactly as it was.
//
// Two transforms exist:
// - `Flip` mirrors the chunk horizontally, vertically, or both in a single pass.
//   With neither axis selected the chunk is returned as-is.
// - `Corrupt` cuts the chunk into equal tiles and scrambles their positions.
//   Partial tiles along the right and bottom edges stay where they are, so every
//   pixel of the chunk survives; only its location changes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::{GlitchError, Result};

/// A whole-chunk transform that produces a replacement for the chunk it is given.
pub trait ChunkTransform {
    fn apply(&self, chunk: &PixelBuffer) -> Result<PixelBuffer>;
}

/// Mirrors a chunk along one or both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub fn new(horizontal: bool, vertical: bool) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

impl ChunkTransform for Flip {
    fn apply(&self, chunk: &PixelBuffer) -> Result<PixelBuffer> {
        flip(chunk, self.horizontal, self.vertical)
    }
}

/// Scrambles a chunk by shuffling fixed-size tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corrupt {
    pub tile_width: u32,
    pub tile_height: u32,
    /// Fixed seed for reproducible output. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl ChunkTransform for Corrupt {
    fn apply(&self, chunk: &PixelBuffer) -> Result<PixelBuffer> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        corrupt(chunk, self.tile_width, self.tile_height, &mut rng)
    }
}

/// Returns `chunk` mirrored horizontally and/or vertically.
///
/// Rows are read bottom-to-top when `vertical` is set and written top-to-bottom;
/// within a row, `horizontal` reverses the column order.
pub fn flip(chunk: &PixelBuffer, horizontal: bool, vertical: bool) -> Result<PixelBuffer> {
    if !horizontal && !vertical {
        return Ok(chunk.clone());
    }

    let (width, height) = (chunk.width(), chunk.height());
    let mut flipped = PixelBuffer::new(width, height)?;

    for row in 0..height {
        let source_row = if vertical { height - 1 - row } else { row };
        let source = chunk.row(source_row);
        let dest = flipped.row_mut(row);
        if horizontal {
            for (d, s) in dest.iter_mut().zip(source.iter().rev()) {
                *d = *s;
            }
        } else {
            dest.copy_from_slice(source);
        }
    }

    Ok(flipped)
}

/// Shuffles the complete `tile_width` x `tile_height` tiles of `chunk`.
pub fn corrupt<R: Rng + ?Sized>(
    chunk: &PixelBuffer,
    tile_width: u32,
    tile_height: u32,
    rng: &mut R,
) -> Result<PixelBuffer> {
    if tile_width == 0 || tile_height == 0 {
        return Err(GlitchError::InvalidTile {
            width: tile_width,
            height: tile_height,
        });
    }

    let columns = (chunk.width() / tile_width) as usize;
    let rows = (chunk.height() / tile_height) as usize;
    let tile_count = columns * rows;
    if tile_count < 2 {
        return Ok(chunk.clone());
    }

    let mut order: Vec<usize> = (0..tile_count).collect();
    order.shuffle(rng);

    // Start from a full copy so the untiled right and bottom margins carry over.
    let mut corrupted = PixelBuffer::new(chunk.width(), chunk.height())?;
    corrupted.pixels_mut().copy_from_slice(chunk.pixels());

    let span = tile_width as usize;
    for (slot, &tile) in order.iter().enumerate() {
        let dest_x = (slot % columns) * span;
        let dest_y = (slot / columns) as u32 * tile_height;
        let source_x = (tile % columns) * span;
        let source_y = (tile / columns) as u32 * tile_height;

        for line in 0..tile_height {
            let source = &chunk.row(source_y + line)[source_x..source_x + span];
            corrupted.row_mut(dest_y + line)[dest_x..dest_x + span].copy_from_slice(source);
        }
    }

    Ok(corrupted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sequential(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_pixels(width, height, (0..width * height).collect()).unwrap()
    }

    #[test]
    fn horizontal_flip_reverses_columns() {
        let flipped = flip(&sequential(3, 2), true, false).unwrap();
        assert_eq!(flipped.pixels(), &[2, 1, 0, 5, 4, 3]);
    }

    #[test]
    fn vertical_flip_reverses_rows() {
        let flipped = flip(&sequential(3, 2), false, true).unwrap();
        assert_eq!(flipped.pixels(), &[3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn both_axes_rotate_half_a_turn() {
        let flipped = flip(&sequential(3, 2), true, true).unwrap();
        assert_eq!(flipped.pixels(), &[5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn no_axes_is_identity() {
        let chunk = sequential(4, 3);
        assert_eq!(flip(&chunk, false, false).unwrap(), chunk);
    }

    #[test]
    fn flip_transform_delegates() {
        let chunk = sequential(2, 2);
        let via_trait = Flip::new(true, false).apply(&chunk).unwrap();
        assert_eq!(via_trait, flip(&chunk, true, false).unwrap());
    }

    #[test]
    fn zero_tiles_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            corrupt(&sequential(4, 4), 0, 2, &mut rng),
            Err(GlitchError::InvalidTile { width: 0, height: 2 })
        ));
    }

    #[test]
    fn chunks_smaller_than_two_tiles_are_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        let chunk = sequential(3, 3);
        assert_eq!(corrupt(&chunk, 4, 4, &mut rng).unwrap(), chunk);
    }

    #[test]
    fn tiles_move_intact_and_margins_stay() {
        let original = sequential(5, 5);
        let corrupted = Corrupt {
            tile_width: 2,
            tile_height: 2,
            seed: Some(7),
        }
        .apply(&original)
        .unwrap();

        // Right column and bottom row are outside every complete tile.
        for i in 0..5 {
            assert_eq!(corrupted.get(4, i).unwrap(), original.get(4, i).unwrap());
            assert_eq!(corrupted.get(i, 4).unwrap(), original.get(i, 4).unwrap());
        }

        // Every destination tile is some source tile, copied whole.
        for slot_y in [0u32, 2] {
            for slot_x in [0u32, 2] {
                let top_left = corrupted.get(slot_x, slot_y).unwrap();
                let (sx, sy) = (top_left % 5, top_left / 5);
                assert_eq!(sx % 2, 0);
                assert_eq!(sy % 2, 0);
                for dy in 0..2 {
                    for dx in 0..2 {
                        assert_eq!(
                            corrupted.get(slot_x + dx, slot_y + dy).unwrap(),
                            original.get(sx + dx, sy + dy).unwrap()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn seeded_corruption_is_reproducible() {
        let corrupt_with = |seed| {
            Corrupt {
                tile_width: 1,
                tile_height: 1,
                seed: Some(seed),
            }
            .apply(&sequential(8, 8))
            .unwrap()
        };
        assert_eq!(corrupt_with(42), corrupt_with(42));
    }

    proptest! {
        #[test]
        fn double_flip_is_identity(width in 1u32..24, height in 1u32..24, salt in any::<u32>()) {
            let pixels = (0..width * height).map(|i| i.wrapping_mul(2654435761) ^ salt).collect();
            let chunk = PixelBuffer::from_pixels(width, height, pixels).unwrap();
            let round_trip = flip(&flip(&chunk, true, true).unwrap(), true, true).unwrap();
            prop_assert_eq!(round_trip, chunk);
        }

        #[test]
        fn corruption_preserves_every_pixel(
            width in 1u32..20,
            height in 1u32..20,
            tile_width in 1u32..6,
            tile_height in 1u32..6,
            seed in any::<u64>(),
        ) {
            let chunk = sequential(width, height);
            let mut rng = StdRng::seed_from_u64(seed);
            let corrupted = corrupt(&chunk, tile_width, tile_height, &mut rng).unwrap();

            prop_assert_eq!((corrupted.width(), corrupted.height()), (width, height));
            let mut before = chunk.into_pixels();
            let mut after = corrupted.into_pixels();
            before.sort_unstable();
            after.sort_unstable();
            prop_assert_eq!(before, after);
        }
    }
}
