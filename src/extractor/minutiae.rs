//! Crossing-number minutiae detection on a skeleton

use super::thinning::{NEIGHBOR_OFFSETS, Skeleton, neighborhood, transitions};
use crate::config::ExtractConfig;
use crate::models::{BitMatrix, Minutia, MinutiaKind, MinutiaeSet};
use crate::utils::geometry::{angle_difference, circular_mean, normalize_angle};

type Pixel = (i64, i64);

/// Classify a skeleton pixel by its crossing number
pub fn classify(n: &[bool; 8]) -> Option<MinutiaKind> {
    match transitions(n) {
        1 => Some(MinutiaKind::RidgeEnding),
        3 => Some(MinutiaKind::Bifurcation),
        _ => None,
    }
}

/// Scan `skeleton` for ridge endings and bifurcations
///
/// Pixels closer than `config.border_margin` to an edge are skipped, as is the
/// outermost pixel frame whose neighbourhood is incomplete.
pub fn extract(skeleton: &Skeleton, config: &ExtractConfig) -> MinutiaeSet {
    let matrix = skeleton.as_matrix();
    let width = matrix.width();
    let height = matrix.height();
    let margin = config.border_margin.max(1);

    let mut minutiae = Vec::new();
    for y in margin..height.saturating_sub(margin) {
        for x in margin..width.saturating_sub(margin) {
            if !matrix.get(x, y) {
                continue;
            }
            let n = neighborhood(matrix, x, y);
            let Some(kind) = classify(&n) else {
                continue;
            };
            let center = (x as i64, y as i64);
            let angle = match kind {
                MinutiaKind::RidgeEnding => ending_angle(matrix, center, &n, config),
                MinutiaKind::Bifurcation => bifurcation_angle(matrix, center, &n, config),
            };
            minutiae.push(Minutia::new(x as u32, y as u32, angle, kind));
        }
    }

    tracing::debug!(
        endings = minutiae
            .iter()
            .filter(|m| m.kind == MinutiaKind::RidgeEnding)
            .count(),
        bifurcations = minutiae
            .iter()
            .filter(|m| m.kind == MinutiaKind::Bifurcation)
            .count(),
        "minutiae extracted"
    );

    // Coordinates come from the scan above, so they are always in bounds
    MinutiaeSet::from_scan(width as u32, height as u32, minutiae)
}

/// Groups of consecutive foreground neighbours; each group is one branch
fn branches(n: &[bool; 8]) -> Vec<Vec<usize>> {
    let mut runs = Vec::new();
    for start in 0..8 {
        if !n[start] || n[(start + 7) % 8] {
            continue;
        }
        let mut run = Vec::new();
        let mut i = start;
        while n[i] && run.len() < 8 {
            run.push(i);
            i = (i + 1) % 8;
        }
        runs.push(run);
    }
    runs
}

/// First pixel of a branch, preferring a 4-connected neighbour
fn branch_entry(center: Pixel, run: &[usize]) -> Pixel {
    let slot = run
        .iter()
        .copied()
        .find(|i| i % 2 == 0)
        .unwrap_or(run[0]);
    let (dx, dy) = NEIGHBOR_OFFSETS[slot];
    (center.0 + dx, center.1 + dy)
}

/// Follow the ridge from `start` for up to `steps` pixels, never entering
/// `visited`. Returns the last pixel reached.
fn trace_ridge(
    matrix: &BitMatrix,
    start: Pixel,
    visited: &mut Vec<Pixel>,
    steps: usize,
) -> Pixel {
    let mut current = start;
    for _ in 0..steps {
        // 4-connected moves first keep the walk on the centerline
        let next = [0usize, 2, 4, 6, 1, 3, 5, 7].iter().find_map(|&slot| {
            let (dx, dy) = NEIGHBOR_OFFSETS[slot];
            let candidate = (current.0 + dx, current.1 + dy);
            (matrix.get_signed(candidate.0, candidate.1) && !visited.contains(&candidate))
                .then_some(candidate)
        });
        match next {
            Some(pixel) => {
                visited.push(pixel);
                current = pixel;
            }
            None => break,
        }
    }
    current
}

fn ring_pixels(center: Pixel, n: &[bool; 8]) -> Vec<Pixel> {
    let mut pixels = vec![center];
    for (slot, &set) in n.iter().enumerate() {
        if set {
            let (dx, dy) = NEIGHBOR_OFFSETS[slot];
            pixels.push((center.0 + dx, center.1 + dy));
        }
    }
    pixels
}

fn direction(from: Pixel, to: Pixel) -> f32 {
    ((to.1 - from.1) as f32).atan2((to.0 - from.0) as f32)
}

/// Direction the ridge points at its ending: from the traced body to the tip
fn ending_angle(matrix: &BitMatrix, center: Pixel, n: &[bool; 8], config: &ExtractConfig) -> f32 {
    let Some(run) = branches(n).into_iter().next() else {
        return 0.0;
    };
    let steps = config.ridge_trace_length.saturating_sub(1);
    let mut visited = ring_pixels(center, n);
    let entry = branch_entry(center, &run);
    let end = trace_ridge(matrix, entry, &mut visited, steps);
    normalize_angle(direction(end, center))
}

/// Mean direction of the two branches that form the fork
fn bifurcation_angle(
    matrix: &BitMatrix,
    center: Pixel,
    n: &[bool; 8],
    config: &ExtractConfig,
) -> f32 {
    let steps = config.ridge_trace_length.saturating_sub(1);
    let mut visited = ring_pixels(center, n);
    let directions: Vec<f32> = branches(n)
        .iter()
        .map(|run| {
            let entry = branch_entry(center, run);
            let end = trace_ridge(matrix, entry, &mut visited, steps);
            normalize_angle(direction(center, end))
        })
        .collect();

    let mut best: Option<(f32, f32)> = None;
    for i in 0..directions.len() {
        for j in (i + 1)..directions.len() {
            let separation = angle_difference(directions[i], directions[j]);
            if best.is_none_or(|(s, _)| separation < s) {
                best = Some((separation, circular_mean(directions[i], directions[j])));
            }
        }
    }
    best.map(|(_, angle)| angle).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::thinning::skeletonize;
    use std::f32::consts::PI;

    fn config() -> ExtractConfig {
        ExtractConfig::default()
    }

    fn skeleton_of(width: usize, height: usize, pixels: &[(usize, usize)]) -> Skeleton {
        let mut m = BitMatrix::new(width, height);
        for &(x, y) in pixels {
            m.set(x, y, true);
        }
        skeletonize(&m, 10).unwrap()
    }

    fn y_junction() -> Vec<(usize, usize)> {
        let mut pixels = vec![(20, 20)];
        for i in 1..=10 {
            pixels.push((20 - i, 20 - i)); // left arm
            pixels.push((20 + i, 20 - i)); // right arm
            pixels.push((20, 20 + i)); // stem
        }
        pixels
    }

    #[test]
    fn test_classify() {
        let ending = [false, false, true, false, false, false, false, false];
        assert_eq!(classify(&ending), Some(MinutiaKind::RidgeEnding));
        let line = [false, false, true, false, false, false, true, false];
        assert_eq!(classify(&line), None);
        let fork = [false, true, false, false, true, false, false, true];
        assert_eq!(classify(&fork), Some(MinutiaKind::Bifurcation));
        assert_eq!(classify(&[false; 8]), None);
    }

    #[test]
    fn test_straight_line_has_two_endings() {
        let line: Vec<_> = (10..=40).map(|x| (x, 45)).collect();
        let set = extract(&skeleton_of(64, 64, &line), &config());
        assert_eq!(set.len(), 2);
        assert_eq!(set.count_kind(MinutiaKind::RidgeEnding), 2);

        let left = set.as_slice()[0];
        let right = set.as_slice()[1];
        assert_eq!((left.x, left.y), (10, 45));
        assert_eq!((right.x, right.y), (40, 45));
        assert!(angle_difference(left.angle, PI) < 1e-4);
        assert!(angle_difference(right.angle, 0.0) < 1e-4);
    }

    #[test]
    fn test_y_junction_has_one_bifurcation() {
        let set = extract(&skeleton_of(64, 64, &y_junction()), &config());
        assert_eq!(set.count_kind(MinutiaKind::Bifurcation), 1);
        assert_eq!(set.count_kind(MinutiaKind::RidgeEnding), 3);

        let fork = set
            .iter()
            .find(|m| m.kind == MinutiaKind::Bifurcation)
            .unwrap();
        assert_eq!((fork.x, fork.y), (20, 20));
        // The fork opens upwards (negative y in image coordinates)
        assert!(angle_difference(fork.angle, 1.5 * PI) < 1e-3);

        let stem_end = set.iter().find(|m| (m.x, m.y) == (20, 30)).unwrap();
        assert!(angle_difference(stem_end.angle, PI / 2.0) < 1e-4);
    }

    #[test]
    fn test_line_and_junction_together() {
        let mut pixels = y_junction();
        pixels.extend((10..=40).map(|x| (x, 45)));
        let set = extract(&skeleton_of(64, 64, &pixels), &config());
        assert_eq!(set.count_kind(MinutiaKind::Bifurcation), 1);
        assert_eq!(set.count_kind(MinutiaKind::RidgeEnding), 5);
    }

    #[test]
    fn test_border_margin_discards_edge_minutiae() {
        let line: Vec<_> = (2..=40).map(|x| (x, 30)).collect();
        let skeleton = skeleton_of(64, 64, &line);

        let set = extract(&skeleton, &config());
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].x, 40);

        let lenient = ExtractConfig {
            border_margin: 0,
            ..config()
        };
        assert_eq!(extract(&skeleton, &lenient).len(), 2);
    }

    #[test]
    fn test_blank_skeleton_is_empty() {
        let set = extract(&skeleton_of(32, 32, &[]), &config());
        assert!(set.is_empty());
        assert_eq!((set.width(), set.height()), (32, 32));
    }

    #[test]
    fn test_isolated_pixel_is_not_a_minutia() {
        let set = extract(&skeleton_of(32, 32, &[(16, 16)]), &config());
        assert!(set.is_empty());
    }

    #[test]
    fn test_minutiae_within_bounds_and_normalized() {
        let mut pixels = y_junction();
        pixels.extend((10..=40).map(|x| (x, 45)));
        let set = extract(&skeleton_of(64, 64, &pixels), &config());
        for m in &set {
            assert!(m.x < 64 && m.y < 64);
            assert!(m.angle >= 0.0 && m.angle < 2.0 * PI);
        }
    }
}
