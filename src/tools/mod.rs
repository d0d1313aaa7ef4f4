use crate::config::ExtractConfig;
use crate::error::Result;
use crate::models::{BitMatrix, GrayImage};
use crate::pipeline::{decode_image, normalize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Read an image file's encoded bytes.
pub fn load_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Load and normalize an image the same way extraction does.
pub fn load_gray<P: AsRef<Path>>(path: P, config: &ExtractConfig) -> Result<GrayImage> {
    let raw = decode_image(&load_bytes(path)?)?;
    normalize(&raw.pixels, raw.width, raw.height, raw.layout, config)
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binary or skeleton matrix.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of ridge pixels.
    pub ridge_pixels: usize,
    /// Total pixels in the matrix.
    pub total_pixels: usize,
    /// Ratio of ridge pixels to total pixels.
    pub ridge_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &GrayImage) -> GrayStats {
    let pixels = gray.pixels();
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in pixels {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if pixels.is_empty() {
        0
    } else {
        (sum / pixels.len() as u64) as u8
    };
    GrayStats { min, max, avg }
}

/// Compute ridge pixel stats for a binary or skeleton matrix.
pub fn binary_stats(binary: &BitMatrix) -> BinaryStats {
    let ridge = binary.count_ones();
    let total = binary.width() * binary.height();
    let ratio = if total == 0 {
        0.0
    } else {
        ridge as f64 / total as f64
    };
    BinaryStats {
        ridge_pixels: ridge,
        total_pixels: total,
        ridge_ratio: ratio,
    }
}

/// Default dataset root from `FP_DATASET_ROOT`.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("FP_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/fingerprints"))
}

/// Default image limit from `FP_BENCH_LIMIT`.
///
/// Returns `None` (full dataset) when unset or set to `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    env::var("FP_BENCH_LIMIT")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&v| v != 0)
}

/// Image paths under `root`, sorted, optionally truncated to `limit`.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), %err, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let is_image = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
            if is_image {
                images.push(path);
            }
        }
    }

    images
}
