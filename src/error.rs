// THEORY:
// Every failure the glitch engine can produce lives in a single enum. Core
// operations never print or swallow an error; they hand a `GlitchError` back to
// the caller (normally the `GlitchSession`), which decides whether to abort.
//
// Clipping is deliberately absent from this list. Reducing a width or height so
// an operation stays inside a buffer is normal behavior, not a failure.

/// Errors raised by the pixel-buffer engine and its codec glue.
#[derive(Debug, thiserror::Error)]
pub enum GlitchError {
    /// A buffer of the requested size could not be created.
    #[error("cannot allocate a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32 },

    /// A pixel access fell outside the buffer extent.
    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("no input image has been loaded")]
    NoSourceBuffer,

    #[error("no chunk has been pulled")]
    NoChunkBuffer,

    #[error("no output buffer exists")]
    NoDestBuffer,

    /// The extraction origin lies outside the source raster.
    #[error("chunk origin ({x}, {y}) is outside a {width}x{height} source")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("tile size {width}x{height} is invalid")]
    InvalidTile { width: u32, height: u32 },

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value from the environment or the command line is malformed.
    #[error("invalid {name} '{value}'")]
    Config { name: String, value: String },

    /// A glitch script step could not be parsed.
    #[error("step {position}: {message}")]
    Script { position: usize, message: String },
}

pub type Result<T> = std::result::Result<T, GlitchError>;
