//! Generators for synthetic grayscale images.
//!
//! All generators return row-major 8-bit samples so they can be fed to
//! `spectrum::Raster::new` or written straight to PNG.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageOutputFormat};

/// Creates samples counting up in row-major order, wrapping at 256.
///
/// # Example
///
/// ```
/// use test_utils::ramp_samples;
///
/// let samples = ramp_samples(4, 4);
/// assert_eq!(samples.len(), 16);
/// assert_eq!(samples[5], 5);   // col=1, row=1
/// assert_eq!(samples[15], 15);
/// ```
pub fn ramp_samples(width: u32, height: u32) -> Vec<u8> {
    (0..width as usize * height as usize)
        .map(|i| (i % 256) as u8)
        .collect()
}

/// Creates a black/white checkerboard with square cells of `cell` pixels.
pub fn checkerboard_samples(width: u32, height: u32, cell: u32) -> Vec<u8> {
    let cell = cell.max(1);
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height {
        for col in 0..width {
            let on = ((row / cell) + (col / cell)) % 2 == 0;
            data.push(if on { 255 } else { 0 });
        }
    }
    data
}

/// Creates a horizontal sine grating with the given period in pixels.
///
/// Its spectrum is dominated by the DC term and a symmetric pair of
/// peaks on the horizontal axis.
pub fn grating_samples(width: u32, height: u32, period: f64) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for _row in 0..height {
        for col in 0..width {
            let phase = 2.0 * std::f64::consts::PI * col as f64 / period;
            data.push((127.5 + 127.5 * phase.sin()) as u8);
        }
    }
    data
}

fn gray_image(width: u32, height: u32, samples: &[u8]) -> GrayImage {
    GrayImage::from_raw(width, height, samples.to_vec())
        .expect("sample count must match width * height")
}

/// Encodes samples as an 8-bit grayscale PNG.
pub fn gray_png_bytes(width: u32, height: u32, samples: &[u8]) -> Vec<u8> {
    let image = DynamicImage::ImageLuma8(gray_image(width, height, samples));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .expect("PNG encoding into memory");
    buffer.into_inner()
}

/// Writes samples to `path` as an 8-bit grayscale PNG.
pub fn write_gray_png(path: impl AsRef<Path>, width: u32, height: u32, samples: &[u8]) {
    std::fs::write(path, gray_png_bytes(width, height, samples)).expect("write PNG fixture");
}
