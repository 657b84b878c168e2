// THEORY:
// This file is the main entry point for the `img_glitch` library crate.
//
// The public API is the `GlitchSession`: load an input raster, pull chunks out of
// it, flip or corrupt them, paste them into an output raster with one of several
// blend modes, and save the result. The pixel-level machinery behind it lives in
// `core_modules` and only ever deals in `PixelBuffer`s; the `codec` is the one
// module that touches image files.

pub mod codec;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod script;
pub mod session;

pub use crate::config::GlitchConfig;
pub use crate::core_modules::blend::BlendMode;
pub use crate::core_modules::chunk::chunk::ChunkRegion;
pub use crate::core_modules::pixel_buffer::PixelBuffer;
pub use crate::core_modules::transform::{ChunkTransform, Corrupt, Flip};
pub use crate::error::{GlitchError, Result};
pub use crate::script::Step;
pub use crate::session::GlitchSession;
