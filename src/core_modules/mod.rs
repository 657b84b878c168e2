pub mod blend;
pub mod chunk;
pub mod compositor;
pub mod pixel;
pub mod pixel_buffer;
pub mod transform;
