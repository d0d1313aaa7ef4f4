//! Feature extraction stages
//!
//! - Thinning binary ridges down to a one-pixel skeleton
//! - Crossing-number detection of ridge endings and bifurcations

/// Crossing-number minutiae detection and orientation estimation
pub mod minutiae;
/// Iterative morphological thinning
pub mod thinning;

pub use minutiae::extract;
pub use thinning::{Skeleton, skeletonize};
