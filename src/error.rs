use thiserror::Error;

/// Errors raised while extracting or loading fingerprint features.
///
/// Low scores, empty minutiae sets and zero correspondences are not errors;
/// they are reported through [`crate::MatchResult`].
#[derive(Error, Debug)]
pub enum MinutiaeError {
    /// The input image is empty, has a zero dimension, a buffer whose length
    /// does not match its declared layout, or bytes that cannot be decoded.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A threshold or tolerance is outside its valid range.
    ///
    /// Raised when configuration is validated, before any image is processed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Thinning did not reach a fixed point within the configured iteration cap.
    #[error("Thinning did not converge after {iterations} iterations")]
    ThinningDidNotConverge {
        /// Number of iterations that were run.
        iterations: usize,
    },

    /// A persisted reference template is malformed.
    #[error("Template error: {0}")]
    Template(String),

    /// Reading an image or template from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MinutiaeError>;
