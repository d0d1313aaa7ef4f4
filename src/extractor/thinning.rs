//! Morphological thinning of binary ridge images
//!
//! Guo-Hall two-subiteration scheme. Each subiteration marks every pixel whose
//! removal keeps the ridge 8-connected and deletes the marked set at once; the
//! two subiterations peel opposite sides. Thinning shortens thick strokes at
//! their tips, so each ending is then walked back out along its own direction
//! while it stays inside the binary ridge.

use crate::error::{MinutiaeError, Result};
use crate::models::BitMatrix;

/// 8-neighbour offsets in cyclic order starting north: P2..P9
pub(crate) const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Foreground flags of the 8-neighbourhood of (x, y), cyclic from north
pub(crate) fn neighborhood(matrix: &BitMatrix, x: usize, y: usize) -> [bool; 8] {
    let mut n = [false; 8];
    for (slot, (dx, dy)) in n.iter_mut().zip(NEIGHBOR_OFFSETS) {
        *slot = matrix.get_signed(x as i64 + dx, y as i64 + dy);
    }
    n
}

/// Number of background-to-foreground transitions around the cycle
///
/// Equal to the crossing number `½ Σ |P_i − P_{i+1}|`.
pub(crate) fn transitions(n: &[bool; 8]) -> usize {
    (0..8).filter(|&i| !n[i] && n[(i + 1) % 8]).count()
}

/// Connected foreground runs touching the pixel, counted side by side
///
/// A side (N, E, S or W) opens a run when it is background and one of the two
/// neighbours following it clockwise is foreground.
fn side_crossings(n: &[bool; 8]) -> usize {
    [0, 2, 4, 6]
        .into_iter()
        .filter(|&i| !n[i] && (n[i + 1] || n[(i + 2) % 8]))
        .count()
}

/// Smaller of the two counts of occupied neighbour pairs
///
/// Pairs are taken once starting at each side and once ending at it. Below
/// two the pixel is an ending, above three it is interior.
fn occupied_pairs(n: &[bool; 8]) -> usize {
    let leading = [0, 2, 4, 6]
        .into_iter()
        .filter(|&i| n[i] || n[i + 1])
        .count();
    let trailing = [0, 2, 4, 6]
        .into_iter()
        .filter(|&i| n[(i + 7) % 8] || n[i])
        .count();
    leading.min(trailing)
}

#[derive(Clone, Copy)]
enum Pass {
    First,
    Second,
}

impl Pass {
    /// Pixels this pass leaves for the other one: those backed by an east
    /// neighbour in the first pass, by a west neighbour in the second
    fn blocks(self, n: &[bool; 8]) -> bool {
        let [north, north_east, east, south_east, south, south_west, west, north_west] = *n;
        match self {
            Pass::First => (north || north_east || !south_east) && east,
            Pass::Second => (south || south_west || !north_west) && west,
        }
    }

    fn removes(self, n: &[bool; 8]) -> bool {
        side_crossings(n) == 1 && (2..=3).contains(&occupied_pairs(n)) && !self.blocks(n)
    }
}

/// A binary image thinned to one-pixel-wide ridges
///
/// Only produced by [`skeletonize`], so it is always a fixed point of thinning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    matrix: BitMatrix,
    iterations: usize,
}

impl Skeleton {
    /// Thinned ridge pixels
    pub fn as_matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    /// Iterations needed to reach the fixed point, including the final
    /// iteration that removed nothing
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Image width
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    /// Image height
    pub fn height(&self) -> usize {
        self.matrix.height()
    }
}

fn run_pass(image: &mut BitMatrix, pass: Pass) -> usize {
    let mut marked = Vec::new();
    for y in 0..image.height() {
        for x in 0..image.width() {
            if image.get(x, y) && pass.removes(&neighborhood(image, x, y)) {
                marked.push((x, y));
            }
        }
    }

    for &(x, y) in &marked {
        image.set(x, y, false);
    }
    marked.len()
}

/// Skeleton pixels with exactly one neighbour, paired with the step that
/// leads away from that neighbour
fn endings(image: &BitMatrix) -> Vec<((i64, i64), (i64, i64))> {
    let mut found = Vec::new();
    for y in 0..image.height() {
        for x in 0..image.width() {
            if !image.get(x, y) {
                continue;
            }
            let n = neighborhood(image, x, y);
            let mut occupied = n.iter().enumerate().filter(|&(_, &v)| v);
            if let (Some((slot, _)), None) = (occupied.next(), occupied.next()) {
                let (dx, dy) = NEIGHBOR_OFFSETS[slot];
                found.push(((x as i64, y as i64), (-dx, -dy)));
            }
        }
    }
    found
}

/// Extend every ending straight ahead through `binary`, at most `max_steps`
/// pixels, stopping before a pixel that would touch another ridge
fn restore_endings(image: &mut BitMatrix, binary: &BitMatrix, max_steps: usize) -> usize {
    let mut restored = 0;
    for ((mut x, mut y), (dx, dy)) in endings(image) {
        for _ in 0..max_steps {
            let (nx, ny) = (x + dx, y + dy);
            if !binary.get_signed(nx, ny) || image.get_signed(nx, ny) {
                break;
            }
            let (ux, uy) = (nx as usize, ny as usize);
            let touching = neighborhood(image, ux, uy).iter().filter(|&&v| v).count();
            if touching != 1 {
                break;
            }
            image.set(ux, uy, true);
            (x, y) = (nx, ny);
            restored += 1;
        }
    }
    restored
}

/// Thin `binary` until an iteration removes no pixel
///
/// Ridge endings are then restored to the tips of the strokes they came from.
/// Fails with [`MinutiaeError::ThinningDidNotConverge`] if the fixed point is
/// not reached within `max_iterations`.
pub fn skeletonize(binary: &BitMatrix, max_iterations: usize) -> Result<Skeleton> {
    let mut image = binary.clone();

    for iteration in 1..=max_iterations {
        let removed = run_pass(&mut image, Pass::First) + run_pass(&mut image, Pass::Second);
        if removed == 0 {
            // Two subiterations per iteration, one layer each
            let restored = restore_endings(&mut image, binary, 2 * iteration);
            tracing::debug!(
                iterations = iteration,
                ridge_pixels = image.count_ones(),
                restored,
                "thinning converged"
            );
            return Ok(Skeleton {
                matrix: image,
                iterations: iteration,
            });
        }
    }

    Err(MinutiaeError::ThinningDidNotConverge {
        iterations: max_iterations,
    })
}
