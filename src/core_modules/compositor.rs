// THEORY:
// The compositor writes a chunk back into a destination raster. The paste position
// is always relative to where the chunk was pulled from: the chunk's anchor plus a
// translation. Pasting with a zero translation puts the chunk back exactly where it
// came from, and repeated pastes with growing translations "smear" it across the
// image.
//
// Partial overlap is the common case, not an error. The pasted width and height are
// cut back by however much the chunk would overhang the right or bottom edge. A
// target that starts at or past the edge leaves nothing to paste and is a no-op.

use crate::core_modules::blend::BlendMode;
use crate::core_modules::chunk::chunk::ChunkRegion;
use crate::core_modules::pixel_buffer::PixelBuffer;

/// Blends `chunk` into `dest` at the anchor shifted by (`translate_x`, `translate_y`).
pub fn composite(
    dest: &mut PixelBuffer,
    chunk: &PixelBuffer,
    anchor: ChunkRegion,
    translate_x: u32,
    translate_y: u32,
    mode: BlendMode,
) {
    let target_x = anchor.x.saturating_add(translate_x);
    let target_y = anchor.y.saturating_add(translate_y);

    let paste_width = chunk.width().min(dest.width().saturating_sub(target_x));
    let paste_height = chunk.height().min(dest.height().saturating_sub(target_y));
    if paste_width == 0 || paste_height == 0 {
        return;
    }

    let start = target_x as usize;
    let end = start + paste_width as usize;
    for row in 0..paste_height {
        let source = &chunk.row(row)[..paste_width as usize];
        mode.blend_row(&mut dest.row_mut(target_y + row)[start..end], source);
    }
}
