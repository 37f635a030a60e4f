//! Error types for the spectrum crate.

use thiserror::Error;

/// Errors raised while loading, transforming or saving a raster.
#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("Invalid raster dimensions {width}x{height} for {samples} samples")]
    InvalidDimensions {
        width: u32,
        height: u32,
        samples: usize,
    },

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for spectrum operations.
pub type Result<T> = std::result::Result<T, SpectrumError>;
