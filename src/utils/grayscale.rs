/// Luminance conversion for raw pixel buffers
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
use crate::error::{MinutiaeError, Result};
use crate::models::GrayImage;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Channel layout of a raw, interleaved 8-bit pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 1 byte per pixel
    Luma,
    /// 2 bytes per pixel, alpha ignored
    LumaAlpha,
    /// 3 bytes per pixel
    Rgb,
    /// 4 bytes per pixel, alpha ignored
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Luma => 1,
            PixelLayout::LumaAlpha => 2,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    rgb.chunks_exact(3)
        .take(width * height)
        .map(|px| luminance(px[0], px[1], px[2]))
        .collect()
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    rgba.chunks_exact(4)
        .take(width * height)
        .map(|px| luminance(px[0], px[1], px[2]))
        .collect()
}

/// Convert any supported layout into a validated [`GrayImage`]
pub fn to_grayscale(
    pixels: &[u8],
    width: usize,
    height: usize,
    layout: PixelLayout,
) -> Result<GrayImage> {
    if pixels.is_empty() || width == 0 || height == 0 {
        return Err(MinutiaeError::InvalidImage(format!(
            "empty image ({width}x{height}, {} bytes)",
            pixels.len()
        )));
    }
    let expected = width * height * layout.channels();
    if pixels.len() != expected {
        return Err(MinutiaeError::InvalidImage(format!(
            "{layout:?} buffer for {width}x{height} needs {expected} bytes, got {}",
            pixels.len()
        )));
    }

    let gray = match layout {
        PixelLayout::Luma => pixels.to_vec(),
        PixelLayout::LumaAlpha => pixels.iter().step_by(2).copied().collect(),
        PixelLayout::Rgb => rgb_to_grayscale(pixels, width, height),
        PixelLayout::Rgba => rgba_to_grayscale(pixels, width, height),
    };
    GrayImage::from_raw(width, height, gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure white
        let white = vec![255, 255, 255];
        let gray = rgb_to_grayscale(&white, 1, 1);
        assert!(gray[0] >= 254);

        // Pure black
        let black = vec![0, 0, 0];
        let gray = rgb_to_grayscale(&black, 1, 1);
        assert_eq!(gray[0], 0);

        // Pure red
        let red = vec![255, 0, 0];
        let gray = rgb_to_grayscale(&red, 1, 1);
        assert!(gray[0] < 255);
        assert!(gray[0] > 0);

        // Pure green
        let green = vec![0, 255, 0];
        let gray = rgb_to_grayscale(&green, 1, 1);
        assert!(gray[0] > 100);

        // 2x2 image
        let img = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let gray = rgb_to_grayscale(&img, 2, 2);
        assert_eq!(gray.len(), 4);
    }

    #[test]
    fn test_rgba_to_grayscale() {
        let rgba = vec![255, 128, 64, 255];
        let gray = rgba_to_grayscale(&rgba, 1, 1);
        assert_eq!(gray.len(), 1);
        assert_eq!(gray[0], luminance(255, 128, 64));
    }

    #[test]
    fn test_to_grayscale_layouts() {
        let luma_alpha = vec![10, 255, 20, 0];
        let img = to_grayscale(&luma_alpha, 2, 1, PixelLayout::LumaAlpha).unwrap();
        assert_eq!(img.pixels(), &[10, 20]);

        let luma = vec![1, 2, 3, 4];
        let img = to_grayscale(&luma, 2, 2, PixelLayout::Luma).unwrap();
        assert_eq!(img.pixels(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_to_grayscale_rejects_bad_buffers() {
        assert!(matches!(
            to_grayscale(&[], 0, 0, PixelLayout::Luma),
            Err(MinutiaeError::InvalidImage(_))
        ));
        assert!(matches!(
            to_grayscale(&[0; 5], 2, 1, PixelLayout::Rgb),
            Err(MinutiaeError::InvalidImage(_))
        ));
        assert!(matches!(
            to_grayscale(&[0; 4], 0, 4, PixelLayout::Luma),
            Err(MinutiaeError::InvalidImage(_))
        ));
    }
}
