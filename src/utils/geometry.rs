/// Geometry utilities for angles and rigid transforms
use crate::models::{Alignment, Point};
use std::f32::consts::{PI, TAU};

/// Wrap an angle into `[0, 2π)`
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Smallest absolute difference between two angles, in `[0, π]`
pub fn angle_difference(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI { TAU - d } else { d }
}

/// Circular mean of two directions, normalized to `[0, 2π)`
pub fn circular_mean(a: f32, b: f32) -> f32 {
    let (sa, ca) = a.sin_cos();
    let (sb, cb) = b.sin_cos();
    normalize_angle((sa + sb).atan2(ca + cb))
}

/// Rotation about the origin followed by a translation
#[derive(Debug, Clone, Copy)]
pub struct RigidTransform {
    rotation: f32,
    sin: f32,
    cos: f32,
    dx: f32,
    dy: f32,
}

impl RigidTransform {
    /// Transform with the given rotation whose translation maps `from`
    /// exactly onto `to`
    pub fn anchored(rotation: f32, from: &Point, to: &Point) -> Self {
        let (sin, cos) = rotation.sin_cos();
        let rotated = from.rotate(sin, cos);
        Self {
            rotation,
            sin,
            cos,
            dx: to.x - rotated.x,
            dy: to.y - rotated.y,
        }
    }

    /// Apply the transform to a point
    pub fn apply(&self, p: &Point) -> Point {
        p.rotate(self.sin, self.cos).translate(self.dx, self.dy)
    }

    /// Apply the rotation to an orientation
    pub fn apply_angle(&self, angle: f32) -> f32 {
        normalize_angle(angle + self.rotation)
    }

    /// Plain-data view of this transform
    pub fn to_alignment(&self) -> Alignment {
        Alignment {
            rotation: self.rotation,
            dx: self.dx,
            dy: self.dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!(normalize_angle(-1e-9) < TAU);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_angle_difference_wraps() {
        assert!((angle_difference(0.1, TAU - 0.1) - 0.2).abs() < 1e-5);
        assert!((angle_difference(PI, 0.0) - PI).abs() < 1e-6);
        assert_eq!(angle_difference(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_circular_mean_across_zero() {
        let mean = circular_mean(0.2, TAU - 0.2);
        assert!(angle_difference(mean, 0.0) < 1e-5);
    }

    #[test]
    fn test_anchored_transform_maps_anchor() {
        let from = Point::new(10.0, 5.0);
        let to = Point::new(-3.0, 7.0);
        let t = RigidTransform::anchored(0.7, &from, &to);
        let mapped = t.apply(&from);
        assert!(mapped.distance(&to) < 1e-4);
        assert!((t.apply_angle(0.0) - 0.7).abs() < 1e-6);
    }
}
