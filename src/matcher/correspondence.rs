//! Greedy one-to-one pairing of aligned minutiae

use super::alignment::position;
use crate::config::MatchConfig;
use crate::models::{MinutiaeSet, Point};
use crate::utils::geometry::{RigidTransform, angle_difference};

/// Pair probe and reference minutiae under `transform`
///
/// Candidate pairs within the spatial and angular tolerances are taken
/// closest-first; each minutia on either side is used at most once. Returns
/// `(probe_index, reference_index)` pairs.
pub fn greedy_pairs(
    transform: &RigidTransform,
    probe: &MinutiaeSet,
    reference: &MinutiaeSet,
    config: &MatchConfig,
) -> Vec<(usize, usize)> {
    let max_dist_sq = config.position_tolerance * config.position_tolerance;
    let reference_points: Vec<Point> = reference.iter().map(position).collect();

    let mut candidates: Vec<(f32, usize, usize)> = Vec::new();
    for (i, p) in probe.iter().enumerate() {
        let moved = transform.apply(&position(p));
        let angle = transform.apply_angle(p.angle);
        for (j, (r, rp)) in reference.iter().zip(&reference_points).enumerate() {
            let dist_sq = moved.distance_squared(rp);
            if dist_sq > max_dist_sq {
                continue;
            }
            if angle_difference(angle, r.angle) >= config.angle_tolerance {
                continue;
            }
            candidates.push((dist_sq, i, j));
        }
    }

    candidates.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut probe_used = vec![false; probe.len()];
    let mut reference_used = vec![false; reference.len()];
    let mut pairs = Vec::new();
    for (_, i, j) in candidates {
        if probe_used[i] || reference_used[j] {
            continue;
        }
        probe_used[i] = true;
        reference_used[j] = true;
        pairs.push((i, j));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Minutia, MinutiaKind};

    fn set(points: &[(u32, u32)]) -> MinutiaeSet {
        MinutiaeSet::new(
            100,
            100,
            points
                .iter()
                .map(|&(x, y)| Minutia::new(x, y, 0.0, MinutiaKind::RidgeEnding))
                .collect(),
        )
        .unwrap()
    }

    fn identity() -> RigidTransform {
        RigidTransform::anchored(0.0, &Point::new(0.0, 0.0), &Point::new(0.0, 0.0))
    }

    #[test]
    fn test_no_double_counting() {
        // Two probe points compete for one reference point
        let probe = set(&[(10, 10), (12, 10)]);
        let reference = set(&[(11, 10)]);
        let pairs = greedy_pairs(&identity(), &probe, &reference, &MatchConfig::default());
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_closest_first() {
        let probe = set(&[(10, 10), (20, 10)]);
        let reference = set(&[(14, 10), (21, 10)]);
        let config = MatchConfig {
            position_tolerance: 8.0,
            ..MatchConfig::default()
        };
        let pairs = greedy_pairs(&identity(), &probe, &reference, &config);
        // (20,10)-(21,10) is closest and taken first; (10,10)-(14,10) follows
        assert_eq!(pairs, vec![(1, 1), (0, 0)]);
    }

    #[test]
    fn test_angle_tolerance_blocks_pairs() {
        let probe = set(&[(10, 10)]);
        let reference = MinutiaeSet::new(
            100,
            100,
            vec![Minutia::new(10, 10, 1.0, MinutiaKind::RidgeEnding)],
        )
        .unwrap();
        let pairs = greedy_pairs(&identity(), &probe, &reference, &MatchConfig::default());
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_translation_applied() {
        let probe = set(&[(10, 10), (30, 40)]);
        let reference = set(&[(15, 12), (35, 42)]);
        let t = RigidTransform::anchored(0.0, &Point::new(10.0, 10.0), &Point::new(15.0, 12.0));
        let config = MatchConfig {
            position_tolerance: 0.5,
            ..MatchConfig::default()
        };
        assert_eq!(greedy_pairs(&t, &probe, &reference, &config).len(), 2);
    }
}
