use crate::models::{BitMatrix, GrayImage};

/// Convert grayscale image to binary using Otsu's thresholding method
/// Returns a BitMatrix where true = ridge (dark), false = background
pub fn otsu_binarize(gray: &GrayImage) -> BitMatrix {
    let threshold = calculate_otsu_threshold(gray.pixels());
    tracing::debug!(threshold, "otsu threshold selected");
    threshold_binarize(gray, threshold)
}

/// Calculate Otsu's optimal threshold
///
/// Pixels strictly below the returned value form the ridge class. Ties on the
/// between-class variance resolve to the smallest threshold. A histogram that
/// cannot be split into two non-empty classes yields 0, i.e. no ridge pixels.
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as u64;
    let total_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(intensity, &count)| intensity as u64 * count)
        .sum();

    let mut max_variance = 0.0f64;
    let mut optimal_threshold = 0u8;
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    for threshold in 1..=255usize {
        // Class 1 holds intensities below `threshold`
        class1_pixels += histogram[threshold - 1];
        class1_sum += (threshold as u64 - 1) * histogram[threshold - 1];
        let class2_pixels = total_pixels - class1_pixels;
        let class2_sum = total_sum - class1_sum;

        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = class2_sum as f64 / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels as f64;
        let weight2 = class2_pixels as f64 / total_pixels as f64;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &GrayImage, threshold: u8) -> BitMatrix {
    let width = gray.width();
    let pixels = gray.pixels();
    BitMatrix::from_fn(width, gray.height(), |x, y| pixels[y * width + x] < threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: usize, height: usize, pixels: Vec<u8>) -> GrayImage {
        GrayImage::from_raw(width, height, pixels).unwrap()
    }

    #[test]
    fn test_threshold_binarize() {
        let gray = image(2, 2, vec![100, 150, 200, 50]);
        let binary = threshold_binarize(&gray, 128);

        // Pixels < 128 should be ridge (true)
        assert!(binary.get(0, 0)); // 100 < 128
        assert!(!binary.get(1, 0)); // 150 >= 128
        assert!(!binary.get(0, 1)); // 200 >= 128
        assert!(binary.get(1, 1)); // 50 < 128
    }

    #[test]
    fn test_otsu_binarize() {
        // Create a simple two-class image
        let mut pixels = vec![50u8; 50]; // Dark class
        pixels.extend(vec![200u8; 50]); // Light class

        let binary = otsu_binarize(&image(10, 10, pixels));

        // Top half should be ridge (true), bottom half background (false)
        assert!(binary.get(0, 0));
        assert!(!binary.get(0, 7));
        assert_eq!(binary.count_ones(), 50);
    }

    #[test]
    fn test_tie_break_picks_smallest_threshold() {
        // Every threshold in 51..=200 splits the classes identically
        let mut pixels = vec![50u8; 8];
        pixels.extend(vec![200u8; 8]);
        assert_eq!(calculate_otsu_threshold(&pixels), 51);
    }

    #[test]
    fn test_uniform_image_has_no_ridges() {
        for value in [0u8, 128, 255] {
            assert_eq!(calculate_otsu_threshold(&vec![value; 100]), 0);
            let binary = otsu_binarize(&image(10, 10, vec![value; 100]));
            assert_eq!(binary.count_ones(), 0);
        }
    }

    #[test]
    fn test_rebinarizing_binary_output_is_identity() {
        let pixels: Vec<u8> = (0..64u32).map(|i| ((i * 37) % 251) as u8).collect();
        let first = otsu_binarize(&image(8, 8, pixels));
        let second = otsu_binarize(&first.to_gray());
        assert_eq!(first, second);
    }
}
