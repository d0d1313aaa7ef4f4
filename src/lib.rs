//! RustMinutiae - minutiae-based fingerprint verification
//!
//! Turns a fingerprint image into a set of ridge endings and bifurcations and
//! compares two such sets under rigid alignment, producing a similarity score
//! and an accept/reject decision.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Pipeline configuration (extraction and matching thresholds)
pub mod config;
/// Error type shared by every stage
pub mod error;
/// Skeletonization and minutiae detection
pub mod extractor;
/// Minutiae-set alignment, scoring and decision
pub mod matcher;
/// Core data structures (GrayImage, BitMatrix, Minutia, MatchResult, etc.)
pub mod models;
/// Image-to-minutiae pipeline
pub mod pipeline;
/// JSON templates and digests
pub mod template;
/// Shared helpers for binaries and benches
pub mod tools;
/// Utility functions (grayscale, filtering, binarization, geometry)
pub mod utils;

pub use config::{ExtractConfig, MatchConfig};
pub use error::{MinutiaeError, Result};
pub use extractor::Skeleton;
pub use models::{Alignment, BitMatrix, GrayImage, MatchResult, Minutia, MinutiaKind, MinutiaeSet};
pub use utils::grayscale::PixelLayout;

/// Extract minutiae from encoded image bytes
///
/// # Arguments
/// * `bytes` - PNG, BMP, JPEG or TIFF file contents
/// * `config` - Extraction settings
///
/// A blank image yields an empty set, not an error.
pub fn extract_minutiae(bytes: &[u8], config: &ExtractConfig) -> Result<MinutiaeSet> {
    pipeline::extract_from_bytes(bytes, config)
}

/// Extract minutiae from a raw interleaved pixel buffer
///
/// # Arguments
/// * `pixels` - Row-major pixel bytes in `layout`
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `layout` - Channel layout of `pixels`
/// * `config` - Extraction settings
pub fn extract_minutiae_from_pixels(
    pixels: &[u8],
    width: usize,
    height: usize,
    layout: PixelLayout,
    config: &ExtractConfig,
) -> Result<MinutiaeSet> {
    pipeline::extract_from_pixels(pixels, width, height, layout, config)
}

/// Compare a probe set with a reference set
///
/// Symmetric in the pair count; empty sets score 0 and are rejected.
pub fn match_minutiae(
    probe: &MinutiaeSet,
    reference: &MinutiaeSet,
    config: &MatchConfig,
) -> MatchResult {
    matcher::match_minutiae(probe, reference, config)
}

/// Extract the probe image and compare it with a stored reference set
pub fn verify(
    probe_bytes: &[u8],
    reference: &MinutiaeSet,
    extract: &ExtractConfig,
    matching: &MatchConfig,
) -> Result<MatchResult> {
    let probe = extract_minutiae(probe_bytes, extract)?;
    Ok(match_minutiae(&probe, reference, matching))
}

/// Reusable verifier holding validated settings
///
/// # Example
/// ```no_run
/// use rust_minutiae::Verifier;
///
/// let verifier = Verifier::default();
/// let reference = verifier.extract(&std::fs::read("enrolled.png").unwrap()).unwrap();
/// let result = verifier.verify(&std::fs::read("probe.png").unwrap(), &reference).unwrap();
/// println!("score {:.2}, accepted {}", result.score, result.decision);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    extract: ExtractConfig,
    matching: MatchConfig,
}

impl Verifier {
    /// Create a verifier; fails if either configuration is out of range
    pub fn new(extract: ExtractConfig, matching: MatchConfig) -> Result<Self> {
        extract.validate()?;
        matching.validate()?;
        Ok(Self { extract, matching })
    }

    /// Verifier configured from `FP_*` environment overrides
    pub fn from_env() -> Result<Self> {
        Self::new(ExtractConfig::from_env(), MatchConfig::from_env())
    }

    /// Extraction settings
    pub fn extract_config(&self) -> &ExtractConfig {
        &self.extract
    }

    /// Matching settings
    pub fn match_config(&self) -> &MatchConfig {
        &self.matching
    }

    /// Extract minutiae from encoded image bytes
    pub fn extract(&self, bytes: &[u8]) -> Result<MinutiaeSet> {
        extract_minutiae(bytes, &self.extract)
    }

    /// Compare two already extracted sets
    pub fn compare(&self, probe: &MinutiaeSet, reference: &MinutiaeSet) -> MatchResult {
        match_minutiae(probe, reference, &self.matching)
    }

    /// Extract a probe image and compare it with `reference`
    pub fn verify(&self, probe_bytes: &[u8], reference: &MinutiaeSet) -> Result<MatchResult> {
        verify(probe_bytes, reference, &self.extract, &self.matching)
    }

    /// Extract and compare two encoded images
    pub fn verify_images(&self, probe_bytes: &[u8], reference_bytes: &[u8]) -> Result<MatchResult> {
        let reference = self.extract(reference_bytes)?;
        self.verify(probe_bytes, &reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_white_image() {
        // 100x100 white RGB image has no ridges at all
        let image = vec![255u8; 100 * 100 * 3];
        let config = ExtractConfig::default();
        let set =
            extract_minutiae_from_pixels(&image, 100, 100, PixelLayout::Rgb, &config).unwrap();
        assert!(set.is_empty());
        assert_eq!((set.width(), set.height()), (100, 100));

        let result = match_minutiae(&set, &set, &MatchConfig::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.matched_pairs, 0);
        assert!(!result.decision);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let config = ExtractConfig::default();
        assert!(matches!(
            extract_minutiae(&[], &config),
            Err(MinutiaeError::InvalidImage(_))
        ));
        assert!(matches!(
            extract_minutiae_from_pixels(&[], 0, 0, PixelLayout::Luma, &config),
            Err(MinutiaeError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_verifier_validates_config() {
        let bad = MatchConfig {
            accept_threshold: 1.5,
            ..MatchConfig::default()
        };
        assert!(matches!(
            Verifier::new(ExtractConfig::default(), bad),
            Err(MinutiaeError::Configuration(_))
        ));

        let bad = ExtractConfig {
            thinning_max_iterations: Some(0),
            ..ExtractConfig::default()
        };
        assert!(Verifier::new(bad, MatchConfig::default()).is_err());

        assert!(Verifier::new(ExtractConfig::default(), MatchConfig::default()).is_ok());
    }

    #[test]
    fn test_verifier_compare_self() {
        let set = MinutiaeSet::new(
            64,
            64,
            vec![
                Minutia::new(10, 12, 0.4, MinutiaKind::RidgeEnding),
                Minutia::new(30, 40, 2.0, MinutiaKind::Bifurcation),
            ],
        )
        .unwrap();
        let result = Verifier::default().compare(&set, &set);
        assert_eq!(result.matched_pairs, 2);
        assert!(result.decision);
    }
}
