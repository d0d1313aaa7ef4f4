use serde::Serialize;

/// Rigid transform that maps probe minutiae onto the reference
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Alignment {
    /// Rotation in radians, applied about the origin before translating
    pub rotation: f32,
    /// Horizontal translation in pixels
    pub dx: f32,
    /// Vertical translation in pixels
    pub dy: f32,
}

/// Outcome of comparing two minutiae sets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    /// Similarity in `[0, 1]`
    pub score: f32,
    /// Number of probe/reference correspondences under the best alignment
    pub matched_pairs: usize,
    /// Accept (`true`) or reject
    pub decision: bool,
    /// Best alignment found, `None` when no candidate alignment existed
    pub alignment: Option<Alignment>,
}

impl MatchResult {
    /// Zero-score rejection
    pub fn rejected() -> Self {
        Self {
            score: 0.0,
            matched_pairs: 0,
            decision: false,
            alignment: None,
        }
    }
}
