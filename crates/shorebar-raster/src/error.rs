//! Error types for the raster crate.

use thiserror::Error;

/// Errors that can occur while building pixel buffers.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Failed to decode an encoded image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// A raw pixel buffer did not match its declared dimensions.
    #[error("invalid pixel buffer for {width}x{height}: expected {expected} values, got {actual}")]
    InvalidBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;
