//! Minutiae-set matching
//!
//! - Candidate rigid alignments from a rotation grid and anchor pairs
//! - Greedy closest-first correspondence counting
//! - Threshold decision on the resulting score

/// Rotation grid and anchor-based candidate alignments
pub mod alignment;
/// Greedy one-to-one correspondence assignment
pub mod correspondence;
/// Accept/reject threshold policy
pub mod decision;

pub use decision::DecisionPolicy;

use crate::config::MatchConfig;
use crate::models::{MatchResult, MinutiaeSet};
use alignment::candidate_alignments;
use correspondence::greedy_pairs;

/// Compare a probe set against a reference set
///
/// Tries every candidate alignment, keeps the one with the most
/// correspondences and scores it as `matched / max(|probe|, |reference|)`.
/// Empty inputs are valid and score 0.
pub fn match_minutiae(
    probe: &MinutiaeSet,
    reference: &MinutiaeSet,
    config: &MatchConfig,
) -> MatchResult {
    if probe.is_empty() || reference.is_empty() {
        tracing::debug!(
            probe = probe.len(),
            reference = reference.len(),
            "empty minutiae set, rejecting"
        );
        return MatchResult::rejected();
    }

    let alignments = candidate_alignments(probe, reference, config);
    let upper_bound = probe.len().min(reference.len());

    let mut best_pairs = 0usize;
    let mut best_alignment = None;
    for transform in &alignments {
        let pairs = greedy_pairs(transform, probe, reference, config).len();
        if pairs > best_pairs {
            best_pairs = pairs;
            best_alignment = Some(transform.to_alignment());
            if best_pairs == upper_bound {
                break;
            }
        }
    }

    let score = best_pairs as f32 / probe.len().max(reference.len()) as f32;
    let decision = DecisionPolicy::new(config.accept_threshold).decide(score, best_pairs);

    tracing::debug!(
        candidates = alignments.len(),
        matched_pairs = best_pairs,
        score,
        decision,
        "match complete"
    );

    MatchResult {
        score,
        matched_pairs: best_pairs,
        decision,
        alignment: best_alignment,
    }
}
