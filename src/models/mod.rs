/// Single-channel intensity image
pub mod gray;
/// Alignment and match outcome
pub mod match_result;
/// Packed binary image
pub mod matrix;
/// Minutiae and minutiae sets
pub mod minutia;
/// 2D float point
pub mod point;

pub use gray::GrayImage;
pub use match_result::{Alignment, MatchResult};
pub use matrix::BitMatrix;
pub use minutia::{Minutia, MinutiaKind, MinutiaeSet};
pub use point::Point;
