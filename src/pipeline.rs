//! Image-to-minutiae pipeline
//!
//! Decode → normalize → binarize → thin → extract. Every stage is a pure
//! function of its input and the explicit [`ExtractConfig`].

use crate::config::ExtractConfig;
use crate::error::{MinutiaeError, Result};
use crate::extractor::{self, Skeleton, skeletonize};
use crate::models::{BitMatrix, GrayImage, MinutiaeSet};
use crate::utils::binarization::otsu_binarize;
use crate::utils::filter::{contrast_stretch, gaussian_blur_5x5};
use crate::utils::grayscale::{PixelLayout, to_grayscale};
use image::DynamicImage;
use rayon::prelude::*;

/// A decoded image buffer ready for normalization
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Interleaved pixel bytes
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Channel layout of `pixels`
    pub layout: PixelLayout,
}

/// Decode encoded image bytes (PNG, BMP, JPEG, TIFF, ...)
///
/// 8-bit grayscale images stay single-channel; everything else is converted
/// to RGB so the fixed luminance weights apply.
pub fn decode_image(bytes: &[u8]) -> Result<RawImage> {
    if bytes.is_empty() {
        return Err(MinutiaeError::InvalidImage("empty input".to_string()));
    }
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| MinutiaeError::InvalidImage(format!("cannot decode image: {e}")))?;

    let raw = match decoded {
        DynamicImage::ImageLuma8(luma) => {
            let (width, height) = luma.dimensions();
            RawImage {
                pixels: luma.into_raw(),
                width: width as usize,
                height: height as usize,
                layout: PixelLayout::Luma,
            }
        }
        other => {
            let rgb = other.to_rgb8();
            let (width, height) = rgb.dimensions();
            RawImage {
                pixels: rgb.into_raw(),
                width: width as usize,
                height: height as usize,
                layout: PixelLayout::Rgb,
            }
        }
    };
    tracing::debug!(
        width = raw.width,
        height = raw.height,
        layout = ?raw.layout,
        "image decoded"
    );
    Ok(raw)
}

/// Grayscale conversion, contrast stretch and optional smoothing
pub fn normalize(
    pixels: &[u8],
    width: usize,
    height: usize,
    layout: PixelLayout,
    config: &ExtractConfig,
) -> Result<GrayImage> {
    let gray = to_grayscale(pixels, width, height, layout)?;
    let stretched = contrast_stretch(&gray);
    if config.smoothing {
        Ok(gaussian_blur_5x5(&stretched))
    } else {
        Ok(stretched)
    }
}

/// Intermediate results of one extraction, kept for inspection
#[derive(Debug, Clone)]
pub struct StageOutput {
    /// Normalized grayscale image
    pub gray: GrayImage,
    /// Otsu binarization, `true` = ridge
    pub binary: BitMatrix,
    /// One-pixel-wide ridges
    pub skeleton: Skeleton,
    /// Detected minutiae
    pub minutiae: MinutiaeSet,
}

/// Run binarization, thinning and extraction on an already normalized image
/// and keep every intermediate
pub fn extract_stages(gray: GrayImage, config: &ExtractConfig) -> Result<StageOutput> {
    let binary = otsu_binarize(&gray);
    let cap = config.thinning_cap(gray.width(), gray.height());
    let skeleton = skeletonize(&binary, cap)?;
    let minutiae = extractor::extract(&skeleton, config);
    Ok(StageOutput {
        gray,
        binary,
        skeleton,
        minutiae,
    })
}

/// Minutiae of an already normalized grayscale image
pub fn extract_minutiae_from_gray(gray: &GrayImage, config: &ExtractConfig) -> Result<MinutiaeSet> {
    let binary = otsu_binarize(gray);
    let cap = config.thinning_cap(gray.width(), gray.height());
    let skeleton = skeletonize(&binary, cap)?;
    Ok(extractor::extract(&skeleton, config))
}

/// Full pipeline from a raw pixel buffer
pub fn extract_from_pixels(
    pixels: &[u8],
    width: usize,
    height: usize,
    layout: PixelLayout,
    config: &ExtractConfig,
) -> Result<MinutiaeSet> {
    let gray = normalize(pixels, width, height, layout, config)?;
    extract_minutiae_from_gray(&gray, config)
}

/// Full pipeline from encoded image bytes
pub fn extract_from_bytes(bytes: &[u8], config: &ExtractConfig) -> Result<MinutiaeSet> {
    let raw = decode_image(bytes)?;
    extract_from_pixels(&raw.pixels, raw.width, raw.height, raw.layout, config)
}

/// Extract several encoded images in parallel
///
/// Results keep the input order; a failure affects only its own slot.
pub fn extract_batch<B>(images: &[B], config: &ExtractConfig) -> Vec<Result<MinutiaeSet>>
where
    B: AsRef<[u8]> + Sync,
{
    images
        .par_iter()
        .map(|bytes| extract_from_bytes(bytes.as_ref(), config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MinutiaKind;
    use image::{ImageBuffer, ImageOutputFormat, Luma, Rgb};
    use std::io::Cursor;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    fn line_image() -> Vec<u8> {
        // Three-pixel-thick dark line on white
        let img = ImageBuffer::from_fn(80, 60, |x, y| {
            if (15..=65).contains(&x) && (29..=31).contains(&y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        encode_png(DynamicImage::ImageLuma8(img))
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image(&[]),
            Err(MinutiaeError::InvalidImage(_))
        ));
        assert!(matches!(
            decode_image(b"not an image at all"),
            Err(MinutiaeError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_decode_keeps_luma_and_converts_color() {
        let raw = decode_image(&line_image()).unwrap();
        assert_eq!(raw.layout, PixelLayout::Luma);
        assert_eq!((raw.width, raw.height), (80, 60));
        assert_eq!(raw.pixels.len(), 80 * 60);

        let rgb = ImageBuffer::from_pixel(4, 3, Rgb([10u8, 20, 30]));
        let raw = decode_image(&encode_png(DynamicImage::ImageRgb8(rgb))).unwrap();
        assert_eq!(raw.layout, PixelLayout::Rgb);
        assert_eq!(raw.pixels.len(), 4 * 3 * 3);
    }

    #[test]
    fn test_normalize_stretches_contrast() {
        let pixels: Vec<u8> = (0..100).map(|i| 100 + (i % 50) as u8).collect();
        let config = ExtractConfig {
            smoothing: false,
            ..ExtractConfig::default()
        };
        let gray = normalize(&pixels, 10, 10, PixelLayout::Luma, &config).unwrap();
        assert_eq!(gray.pixels().iter().min(), Some(&0));
        assert_eq!(gray.pixels().iter().max(), Some(&255));
    }

    #[test]
    fn test_normalize_rejects_bad_buffers() {
        let config = ExtractConfig::default();
        assert!(normalize(&[], 0, 0, PixelLayout::Luma, &config).is_err());
        assert!(normalize(&[0; 10], 3, 3, PixelLayout::Rgb, &config).is_err());
    }

    #[test]
    fn test_line_image_end_to_end() {
        let set = extract_from_bytes(&line_image(), &ExtractConfig::default()).unwrap();
        assert_eq!((set.width(), set.height()), (80, 60));
        assert!(set.count_kind(MinutiaKind::RidgeEnding) >= 2);
        // Thinning artifacts may appear at the bar ends, never along its body
        for m in &set {
            assert!(m.x <= 22 || m.x >= 58, "unexpected minutia at {m:?}");
        }
    }

    #[test]
    fn test_stages_are_consistent() {
        let raw = decode_image(&line_image()).unwrap();
        let config = ExtractConfig::default();
        let gray = normalize(&raw.pixels, raw.width, raw.height, raw.layout, &config).unwrap();
        let direct = extract_minutiae_from_gray(&gray, &config).unwrap();
        let stages = extract_stages(gray, &config).unwrap();
        assert_eq!(stages.minutiae, direct);
        assert!(stages.skeleton.as_matrix().count_ones() <= stages.binary.count_ones());
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let good = line_image();
        let bad = b"broken".to_vec();
        let results = extract_batch(&[good.clone(), bad, good], &ExtractConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[0].as_ref().unwrap(), results[2].as_ref().unwrap());
    }
}
