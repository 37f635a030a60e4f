//! 8-bit grayscale raster types.

use image::GrayImage;

use crate::error::{Result, SpectrumError};

/// A 2-D grid of unsigned 8-bit intensity samples, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl Raster {
    /// Create a raster from row-major samples.
    ///
    /// Both dimensions must be at least 1 and `samples.len()` must equal
    /// `width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        let expected = (width as usize).checked_mul(height as usize);
        if width == 0 || height == 0 || expected != Some(samples.len()) {
            return Err(SpectrumError::InvalidDimensions {
                width,
                height,
                samples: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Create a raster by evaluating `f(x, y)` for every sample.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Result<Self> {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self::new(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major sample data.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Sample at column `x`, row `y`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// A raster with this raster's dimensions and new samples.
    pub(crate) fn derive(&self, samples: Vec<u8>) -> Raster {
        debug_assert_eq!(samples.len(), self.samples.len());
        Raster {
            width: self.width,
            height: self.height,
            samples,
        }
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }
}

impl TryFrom<GrayImage> for Raster {
    type Error = SpectrumError;

    fn try_from(image: GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Raster::new(width, height, image.into_raw())
    }
}

impl From<Raster> for GrayImage {
    fn from(raster: Raster) -> Self {
        let (width, height) = raster.dimensions();
        // Dimensions were validated on construction, so the buffer always fits.
        GrayImage::from_raw(width, height, raster.samples)
            .unwrap_or_else(|| GrayImage::new(width, height))
    }
}

/// Visualized spectral magnitude of a [`Raster`], same dimensions as its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectralMagnitudeRaster(Raster);

impl SpectralMagnitudeRaster {
    pub(crate) fn from_raster(raster: Raster) -> Self {
        Self(raster)
    }

    pub fn as_raster(&self) -> &Raster {
        &self.0
    }

    pub fn into_raster(self) -> Raster {
        self.0
    }
}

impl std::ops::Deref for SpectralMagnitudeRaster {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        &self.0
    }
}
