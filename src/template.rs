//! JSON reference templates and their digests
//!
//! A template is the minutiae set of an enrolled image:
//!
//! ```json
//! {"width":256,"height":288,"minutiae":[[40,51,1.57,"ridge_ending"],[90,60,0.3,"bifurcation"]]}
//! ```

use crate::error::{MinutiaeError, Result};
use crate::models::{Minutia, MinutiaKind, MinutiaeSet};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct ReferenceTemplate {
    width: u32,
    height: u32,
    minutiae: Vec<(u32, u32, f32, MinutiaKind)>,
}

impl From<&MinutiaeSet> for ReferenceTemplate {
    fn from(set: &MinutiaeSet) -> Self {
        Self {
            width: set.width(),
            height: set.height(),
            minutiae: set.iter().map(|m| (m.x, m.y, m.angle, m.kind)).collect(),
        }
    }
}

impl TryFrom<ReferenceTemplate> for MinutiaeSet {
    type Error = MinutiaeError;

    fn try_from(template: ReferenceTemplate) -> Result<Self> {
        let mut minutiae = Vec::with_capacity(template.minutiae.len());
        for (i, (x, y, angle, kind)) in template.minutiae.into_iter().enumerate() {
            if !angle.is_finite() || !(0.0..TAU).contains(&angle) {
                return Err(MinutiaeError::Template(format!(
                    "minutia {i} has angle {angle} outside [0, 2pi)"
                )));
            }
            if x >= template.width || y >= template.height {
                return Err(MinutiaeError::Template(format!(
                    "minutia {i} at ({x}, {y}) lies outside {}x{}",
                    template.width, template.height
                )));
            }
            minutiae.push(Minutia::new(x, y, angle, kind));
        }
        MinutiaeSet::new(template.width, template.height, minutiae)
            .ok_or_else(|| MinutiaeError::Template("minutia out of bounds".to_string()))
    }
}

/// Serialize a minutiae set as a JSON template
pub fn to_json(set: &MinutiaeSet) -> Result<String> {
    serde_json::to_string(&ReferenceTemplate::from(set))
        .map_err(|e| MinutiaeError::Template(e.to_string()))
}

/// Parse and validate a JSON template
pub fn from_json(json: &str) -> Result<MinutiaeSet> {
    let template: ReferenceTemplate =
        serde_json::from_str(json).map_err(|e| MinutiaeError::Template(e.to_string()))?;
    template.try_into()
}

/// Write a template file
pub fn save<P: AsRef<Path>>(set: &MinutiaeSet, path: P) -> Result<()> {
    fs::write(path, to_json(set)?)?;
    Ok(())
}

/// Read and validate a template file
pub fn load<P: AsRef<Path>>(path: P) -> Result<MinutiaeSet> {
    from_json(&fs::read_to_string(path)?)
}

/// Order-independent text form of a set's positions
///
/// `E:x,y;x,y|B:x,y;...` with endings and bifurcations each sorted by
/// `(x, y)`. Orientation is not part of it.
pub fn canonical_string(set: &MinutiaeSet) -> String {
    let coords = |kind: MinutiaKind| {
        let mut points: Vec<(u32, u32)> = set
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| (m.x, m.y))
            .collect();
        points.sort_unstable();
        points
            .iter()
            .map(|(x, y)| format!("{x},{y}"))
            .collect::<Vec<_>>()
            .join(";")
    };
    format!(
        "E:{}|B:{}",
        coords(MinutiaKind::RidgeEnding),
        coords(MinutiaKind::Bifurcation)
    )
}

/// Hex SHA-256 of [`canonical_string`]
pub fn digest_hex(set: &MinutiaeSet) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_string(set).as_bytes());
    format!("{:x}", hasher.finalize())
}
