//! Spectral magnitude visualization for grayscale rasters.
//!
//! Turns an 8-bit grayscale image into an image of its 2-D Fourier
//! magnitude spectrum:
//! - 2-D DFT of the samples
//! - zero-frequency shift to the grid center
//! - magnitude, `ln(1 + x)` compression
//! - min/max normalization to 0..=255 and 8-bit truncation

pub mod error;
pub mod png;
pub mod raster;
pub mod transform;

pub use error::{Result, SpectrumError};
pub use png::{compute_fft, decode_png, encode_png, load_raster, save_raster};
pub use raster::{Raster, SpectralMagnitudeRaster};
pub use transform::{fft_shift, transform};
