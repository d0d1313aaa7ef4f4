//! Candidate rigid alignments between two minutiae sets

use crate::config::MatchConfig;
use crate::models::{Minutia, MinutiaeSet, Point};
use crate::utils::geometry::{RigidTransform, angle_difference, normalize_angle};

/// Position of a minutia as a float point
pub(crate) fn position(m: &Minutia) -> Point {
    Point::new(m.x as f32, m.y as f32)
}

/// Rotations to try: `0, +step, -step, +2*step, ...` up to `max_rotation`
///
/// The grid is symmetric about zero and always contains zero. A non-positive
/// or non-finite step collapses the grid to zero alone.
pub fn rotation_grid(config: &MatchConfig) -> Vec<f32> {
    let mut grid = vec![0.0f32];
    let step = config.rotation_step;
    if !step.is_finite() || step <= 0.0 || !config.max_rotation.is_finite() {
        return grid;
    }
    let steps = (config.max_rotation / step + 1e-4).floor() as i32;
    for k in 1..=steps {
        let theta = k as f32 * step;
        grid.push(theta);
        grid.push(-theta);
    }
    grid
}

/// Every alignment anchored on a same-kind probe/reference pair whose
/// orientations agree under the rotation being tried
pub fn candidate_alignments(
    probe: &MinutiaeSet,
    reference: &MinutiaeSet,
    config: &MatchConfig,
) -> Vec<RigidTransform> {
    let mut alignments = Vec::new();
    for theta in rotation_grid(config) {
        for p in probe {
            let rotated_angle = normalize_angle(p.angle + theta);
            for r in reference {
                if p.kind != r.kind {
                    continue;
                }
                if angle_difference(rotated_angle, r.angle) >= config.angle_tolerance {
                    continue;
                }
                alignments.push(RigidTransform::anchored(
                    theta,
                    &position(p),
                    &position(r),
                ));
            }
        }
    }
    alignments
}
