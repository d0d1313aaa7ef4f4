//! Pipeline configuration
//!
//! Every threshold is carried in an explicit value passed into each call.
//! Nothing in the core reads the environment; [`ExtractConfig::from_env`] and
//! [`MatchConfig::from_env`] exist for tooling that loads settings once at
//! startup.

use crate::error::{MinutiaeError, Result};
use std::f32::consts::PI;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_optional_usize(name: &str, default: Option<usize>) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Settings for turning an image into a minutiae set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractConfig {
    /// Minutiae closer than this many pixels to any image edge are dropped.
    pub border_margin: usize,
    /// Upper bound on thinning iterations before extraction fails.
    ///
    /// `None` derives the bound from the image size, see
    /// [`ExtractConfig::thinning_cap`].
    pub thinning_max_iterations: Option<usize>,
    /// Number of skeleton pixels followed when estimating ridge orientation.
    pub ridge_trace_length: usize,
    /// Apply 5x5 Gaussian smoothing before binarization.
    pub smoothing: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            border_margin: 5,
            thinning_max_iterations: None,
            ridge_trace_length: 8,
            smoothing: true,
        }
    }
}

impl ExtractConfig {
    /// Check that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if self.thinning_max_iterations == Some(0) {
            return Err(MinutiaeError::Configuration(
                "thinning_max_iterations must be at least 1".to_string(),
            ));
        }
        if self.ridge_trace_length == 0 {
            return Err(MinutiaeError::Configuration(
                "ridge_trace_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Iteration bound used for a `width` x `height` image
    ///
    /// Without an explicit bound this is the shorter side plus two. No ridge
    /// region is deeper than half the shorter side, and every iteration strips
    /// at least one layer from it.
    pub fn thinning_cap(&self, width: usize, height: usize) -> usize {
        self.thinning_max_iterations
            .unwrap_or_else(|| width.min(height) + 2)
    }

    /// Defaults overridden by `FP_BORDER_MARGIN`, `FP_THINNING_MAX_ITERATIONS`,
    /// `FP_RIDGE_TRACE_LENGTH` and `FP_SMOOTHING` (0/1).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            border_margin: parse_env_usize("FP_BORDER_MARGIN", defaults.border_margin),
            thinning_max_iterations: parse_env_optional_usize(
                "FP_THINNING_MAX_ITERATIONS",
                defaults.thinning_max_iterations,
            ),
            ridge_trace_length: parse_env_usize(
                "FP_RIDGE_TRACE_LENGTH",
                defaults.ridge_trace_length,
            ),
            smoothing: parse_env_bool_u8("FP_SMOOTHING", defaults.smoothing),
        }
    }
}

/// Settings for comparing two minutiae sets.
///
/// Angles are in radians, distances in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Maximum distance between corresponding minutiae after alignment.
    pub position_tolerance: f32,
    /// Corresponding minutiae must differ in orientation by less than this.
    pub angle_tolerance: f32,
    /// Minimum score for an accept decision.
    pub accept_threshold: f32,
    /// Spacing of the rotation search grid.
    pub rotation_step: f32,
    /// Largest absolute rotation tried.
    pub max_rotation: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            position_tolerance: 10.0,
            angle_tolerance: PI / 12.0,
            accept_threshold: 0.4,
            rotation_step: PI / 36.0,
            max_rotation: PI / 6.0,
        }
    }
}

impl MatchConfig {
    /// Check that every tolerance and threshold is in range.
    pub fn validate(&self) -> Result<()> {
        if !self.position_tolerance.is_finite() || self.position_tolerance < 0.0 {
            return Err(MinutiaeError::Configuration(format!(
                "position_tolerance must be a non-negative number, got {}",
                self.position_tolerance
            )));
        }
        if !self.angle_tolerance.is_finite()
            || self.angle_tolerance <= 0.0
            || self.angle_tolerance > PI
        {
            return Err(MinutiaeError::Configuration(format!(
                "angle_tolerance must be in (0, pi], got {}",
                self.angle_tolerance
            )));
        }
        if !(self.accept_threshold > 0.0 && self.accept_threshold <= 1.0) {
            return Err(MinutiaeError::Configuration(format!(
                "accept_threshold must be in (0, 1], got {}",
                self.accept_threshold
            )));
        }
        if !self.rotation_step.is_finite() || self.rotation_step <= 0.0 {
            return Err(MinutiaeError::Configuration(format!(
                "rotation_step must be positive, got {}",
                self.rotation_step
            )));
        }
        if !self.max_rotation.is_finite() || self.max_rotation < 0.0 || self.max_rotation > PI {
            return Err(MinutiaeError::Configuration(format!(
                "max_rotation must be in [0, pi], got {}",
                self.max_rotation
            )));
        }
        Ok(())
    }

    /// Defaults overridden by `FP_POSITION_TOLERANCE`, `FP_ANGLE_TOLERANCE`,
    /// `FP_ACCEPT_THRESHOLD`, `FP_ROTATION_STEP` and `FP_MAX_ROTATION`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            position_tolerance: parse_env_f32(
                "FP_POSITION_TOLERANCE",
                defaults.position_tolerance,
            ),
            angle_tolerance: parse_env_f32("FP_ANGLE_TOLERANCE", defaults.angle_tolerance),
            accept_threshold: parse_env_f32("FP_ACCEPT_THRESHOLD", defaults.accept_threshold),
            rotation_step: parse_env_f32("FP_ROTATION_STEP", defaults.rotation_step),
            max_rotation: parse_env_f32("FP_MAX_ROTATION", defaults.max_rotation),
        }
    }
}
