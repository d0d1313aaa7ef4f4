//! Contrast and noise conditioning applied before binarization

use crate::models::GrayImage;

/// Sigma OpenCV derives for a 5-tap kernel when none is given
const GAUSSIAN_SIGMA: f32 = 1.1;
const GAUSSIAN_RADIUS: usize = 2;

/// Stretch intensities linearly so the darkest pixel maps to 0 and the
/// brightest to 255. Uniform images are returned unchanged.
pub fn contrast_stretch(gray: &GrayImage) -> GrayImage {
    let pixels = gray.pixels();
    let min = pixels.iter().copied().min().unwrap_or(0);
    let max = pixels.iter().copied().max().unwrap_or(0);
    if max == min || (min == 0 && max == 255) {
        return gray.clone();
    }

    let range = (max - min) as u32;
    let stretched = pixels
        .iter()
        .map(|&p| (((p - min) as u32 * 255 + range / 2) / range) as u8)
        .collect();
    GrayImage::from_raw_unchecked(gray.width(), gray.height(), stretched)
}

fn gaussian_kernel() -> [f32; 2 * GAUSSIAN_RADIUS + 1] {
    let mut kernel = [0.0f32; 2 * GAUSSIAN_RADIUS + 1];
    let denom = 2.0 * GAUSSIAN_SIGMA * GAUSSIAN_SIGMA;
    for (i, k) in kernel.iter_mut().enumerate() {
        let d = i as f32 - GAUSSIAN_RADIUS as f32;
        *k = (-(d * d) / denom).exp();
    }
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// Separable 5x5 Gaussian blur with replicated borders
pub fn gaussian_blur_5x5(gray: &GrayImage) -> GrayImage {
    let width = gray.width();
    let height = gray.height();
    let pixels = gray.pixels();
    let kernel = gaussian_kernel();
    let r = GAUSSIAN_RADIUS as isize;

    // Horizontal pass
    let mut horizontal = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &pixels[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - r).clamp(0, width as isize - 1) as usize;
                acc += row[sx] as f32 * weight;
            }
            horizontal[y * width + x] = acc;
        }
    }

    // Vertical pass
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - r).clamp(0, height as isize - 1) as usize;
                acc += horizontal[sy * width + x] * weight;
            }
            out.push(acc.round().clamp(0.0, 255.0) as u8);
        }
    }

    GrayImage::from_raw_unchecked(width, height, out)
}
