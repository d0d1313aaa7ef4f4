/// Accept/reject rule applied to a similarity score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    /// Minimum score for acceptance
    pub accept_threshold: f32,
}

impl DecisionPolicy {
    /// Policy with the given threshold
    pub fn new(accept_threshold: f32) -> Self {
        Self { accept_threshold }
    }

    /// Accept when at least one pair matched and the score reaches the threshold
    pub fn decide(&self, score: f32, matched_pairs: usize) -> bool {
        matched_pairs > 0 && score >= self.accept_threshold
    }
}
