//! Utility functions for image processing
//!
//! This module provides the low-level building blocks of the pipeline:
//! - Grayscale conversion (luma/RGB/RGBA to luminance)
//! - Conditioning (contrast stretch, Gaussian smoothing)
//! - Binarization (Otsu's method and threshold-based)
//! - Geometry (angles, rigid transforms)

pub mod binarization;
pub mod filter;
pub mod geometry;
pub mod grayscale;
