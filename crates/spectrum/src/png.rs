//! PNG loading and saving for rasters.
//!
//! Any format the `image` crate can decode is accepted on input and
//! converted to 8-bit luma. Output is always an 8-bit grayscale PNG.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, ImageOutputFormat};
use tracing::debug;

use crate::error::Result;
use crate::raster::Raster;
use crate::transform::transform;

/// Load an image file as an 8-bit grayscale raster.
pub fn load_raster(path: impl AsRef<Path>) -> Result<Raster> {
    let image = image::open(path.as_ref())?.into_luma8();
    Raster::try_from(image)
}

/// Save a raster as an 8-bit grayscale PNG.
pub fn save_raster(raster: &Raster, path: impl AsRef<Path>) -> Result<()> {
    let image: GrayImage = raster.clone().into();
    image.save_with_format(path.as_ref(), ImageFormat::Png)?;
    Ok(())
}

/// Decode encoded image bytes into an 8-bit grayscale raster.
pub fn decode_png(data: &[u8]) -> Result<Raster> {
    let image = image::load_from_memory(data)?.into_luma8();
    Raster::try_from(image)
}

/// Encode a raster as 8-bit grayscale PNG bytes.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let image = DynamicImage::ImageLuma8(raster.clone().into());
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageOutputFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Compute the spectral magnitude image of `input_path` and write it to
/// `output_path` as a grayscale PNG.
pub fn compute_fft(input_path: impl AsRef<Path>, output_path: impl AsRef<Path>) -> Result<()> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    let source = load_raster(input_path)?;
    let (width, height) = source.dimensions();
    debug!(input = %input_path.display(), width, height, "Loaded raster");

    let magnitude = transform(&source);
    save_raster(magnitude.as_raster(), output_path)?;

    debug!(output = %output_path.display(), "Wrote spectral magnitude image");
    Ok(())
}
