use crate::error::{MinutiaeError, Result};

/// Single-channel 8-bit intensity image
///
/// Each pipeline stage produces a fresh `GrayImage`; nothing mutates one
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GrayImage {
    /// Wrap a row-major pixel buffer, checking dimensions
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MinutiaeError::InvalidImage(format!(
                "zero-sized image ({width}x{height})"
            )));
        }
        if pixels.len() != width * height {
            return Err(MinutiaeError::InvalidImage(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub(crate) fn from_raw_unchecked(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Image width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Intensity at (x, y)
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    /// Row-major pixel buffer
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
