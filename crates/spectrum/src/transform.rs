//! 2-D spectral magnitude transform.
//!
//! Pipeline per raster:
//! 1. Forward 2-D DFT (row FFTs, then column FFTs)
//! 2. Zero-frequency shift to `(width / 2, height / 2)`
//! 3. Complex modulus, then `ln(1 + x)`
//! 4. Subtract the global minimum, divide by the resulting maximum, scale to 255
//! 5. Truncate to `u8`
//!
//! A grid whose compressed magnitudes are all equal has no range to
//! normalize over; it maps to an all-zero output.

use num_complex::Complex;
use rustfft::FftPlanner;

use crate::raster::{Raster, SpectralMagnitudeRaster};

/// Compute the visualized spectral magnitude of `source`.
///
/// The output always has the same dimensions as the input and is a pure
/// function of the input samples.
pub fn transform(source: &Raster) -> SpectralMagnitudeRaster {
    let width = source.width() as usize;
    let height = source.height() as usize;

    let spectrum = fft_2d(source.samples(), width, height);
    let shifted = fft_shift(&spectrum, width, height);

    let compressed: Vec<f64> = shifted.iter().map(|c| c.norm().ln_1p()).collect();
    let samples = normalize_to_u8(&compressed);

    SpectralMagnitudeRaster::from_raster(source.derive(samples))
}

/// Forward, unnormalized 2-D DFT of row-major samples.
fn fft_2d(samples: &[u8], width: usize, height: usize) -> Vec<Complex<f64>> {
    let mut planner = FftPlanner::<f64>::new();

    let mut rows: Vec<Complex<f64>> = samples
        .iter()
        .map(|&v| Complex::new(f64::from(v), 0.0))
        .collect();
    // `process` runs one FFT per consecutive chunk of the planned length.
    planner.plan_fft_forward(width).process(&mut rows);

    let mut columns = transpose(&rows, width, height);
    planner.plan_fft_forward(height).process(&mut columns);

    transpose(&columns, height, width)
}

/// Transpose a row-major `width x height` grid into a `height x width` grid.
fn transpose<T: Copy>(data: &[T], width: usize, height: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(data.len());
    for x in 0..width {
        for y in 0..height {
            out.push(data[y * width + x]);
        }
    }
    out
}

/// Circularly shift a row-major grid so index `(0, 0)` moves to
/// `(width / 2, height / 2)`.
///
/// Each axis is rolled by `n / 2`, which matches the conventional
/// "fftshift" for both even and odd lengths.
pub fn fft_shift<T: Copy>(data: &[T], width: usize, height: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(data.len());
    for y in 0..height {
        let src_y = (y + height - height / 2) % height;
        for x in 0..width {
            let src_x = (x + width - width / 2) % width;
            out.push(data[src_y * width + src_x]);
        }
    }
    out
}

/// Map values onto 0..=255 by min/max normalization, truncating to `u8`.
fn normalize_to_u8(values: &[f64]) -> Vec<u8> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values
        .iter()
        .map(|v| v - min)
        .fold(f64::NEG_INFINITY, f64::max);

    if !(max.is_finite() && max > 0.0) {
        return vec![0; values.len()];
    }

    values
        .iter()
        .map(|v| ((v - min) / max * 255.0).clamp(0.0, 255.0) as u8)
        .collect()
}
