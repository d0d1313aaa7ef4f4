use crate::utils::geometry::normalize_angle;
use serde::{Deserialize, Serialize};

/// Type of ridge feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinutiaKind {
    /// A ridge line terminates
    RidgeEnding,
    /// A ridge line splits in two
    Bifurcation,
}

/// A single fingerprint feature point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minutia {
    /// Column in the source image
    pub x: u32,
    /// Row in the source image
    pub y: u32,
    /// Ridge orientation in radians, always in `[0, 2π)`
    pub angle: f32,
    /// Ending or bifurcation
    pub kind: MinutiaKind,
}

impl Minutia {
    /// Create a minutia; the angle is wrapped into `[0, 2π)`
    pub fn new(x: u32, y: u32, angle: f32, kind: MinutiaKind) -> Self {
        Self {
            x,
            y,
            angle: normalize_angle(angle),
            kind,
        }
    }
}

/// Minutiae extracted from one image
///
/// Order is extraction (scan) order and carries no meaning for matching.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MinutiaeSet {
    width: u32,
    height: u32,
    minutiae: Vec<Minutia>,
}

impl MinutiaeSet {
    /// Empty set for an image of the given size
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            minutiae: Vec::new(),
        }
    }

    /// Build a set; returns `None` if any minutia lies outside
    /// `width x height`.
    pub fn new(width: u32, height: u32, minutiae: Vec<Minutia>) -> Option<Self> {
        if minutiae.iter().any(|m| m.x >= width || m.y >= height) {
            return None;
        }
        Some(Self {
            width,
            height,
            minutiae,
        })
    }

    pub(crate) fn from_scan(width: u32, height: u32, minutiae: Vec<Minutia>) -> Self {
        debug_assert!(minutiae.iter().all(|m| m.x < width && m.y < height));
        Self {
            width,
            height,
            minutiae,
        }
    }

    /// Width of the source image
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the source image
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of minutiae
    pub fn len(&self) -> usize {
        self.minutiae.len()
    }

    /// True when no minutiae were found
    pub fn is_empty(&self) -> bool {
        self.minutiae.is_empty()
    }

    /// Minutiae in extraction order
    pub fn as_slice(&self) -> &[Minutia] {
        &self.minutiae
    }

    /// Iterate minutiae in extraction order
    pub fn iter(&self) -> std::slice::Iter<'_, Minutia> {
        self.minutiae.iter()
    }

    /// Count minutiae of one kind
    pub fn count_kind(&self, kind: MinutiaKind) -> usize {
        self.minutiae.iter().filter(|m| m.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a MinutiaeSet {
    type Item = &'a Minutia;
    type IntoIter = std::slice::Iter<'a, Minutia>;

    fn into_iter(self) -> Self::IntoIter {
        self.minutiae.iter()
    }
}
