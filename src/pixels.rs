//! Carrier pixel buffer

use crate::error::{Result, StegoError};
use image::RgbImage;

/// Samples per pixel
pub const CHANNELS: usize = 3;

/// Row-major `height x width x 3` array of 8-bit samples.
///
/// Rows map to image `y`, columns to image `x`. Channel order is whatever the
/// caller decoded; the codec only requires encode and decode to agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    height: usize,
    width: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Buffer filled with a single sample value
    pub fn filled(height: usize, width: usize, value: u8) -> Result<Self> {
        let len = sample_count(height, width)?;
        Ok(Self {
            height,
            width,
            data: vec![value; len],
        })
    }

    /// Wrap raw row-major samples, checking the length matches the geometry
    pub fn from_raw(height: usize, width: usize, data: Vec<u8>) -> Result<Self> {
        let expected = sample_count(height, width)?;
        if data.len() != expected {
            return Err(StegoError::BufferSizeMismatch {
                height,
                width,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { height, width, data })
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            height: height as usize,
            width: width as usize,
            data: image.into_raw(),
        }
    }

    pub fn into_rgb_image(self) -> RgbImage {
        // Geometry and length are kept consistent by every constructor
        RgbImage::from_raw(self.width as u32, self.height as u32, self.data)
            .unwrap_or_else(|| unreachable!("pixel buffer length out of sync with geometry"))
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize, chan: usize) -> usize {
        (row * self.width + col) * CHANNELS + chan
    }

    /// Sample at (row, col, chan). Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize, chan: usize) -> u8 {
        self.data[self.offset(row, col, chan)]
    }

    /// Overwrite the sample at (row, col, chan). Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, chan: usize, value: u8) {
        let idx = self.offset(row, col, chan);
        self.data[idx] = value;
    }
}

/// `height * width * 3`, or an error when that does not fit in `usize`
fn sample_count(height: usize, width: usize) -> Result<usize> {
    height
        .checked_mul(width)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(StegoError::GeometryOverflow { height, width })
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        Self::from_rgb_image(image)
    }
}
