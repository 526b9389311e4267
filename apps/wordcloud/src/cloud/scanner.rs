//! Exhaustive, sampling-based search for blank rectangles.
//!
//! Every top-left origin where a `size_x × size_y` box fits is tested. Inside each box,
//! pixels are sampled every `quality` columns and rows, starting from the bottom-right
//! corner and walking back toward the origin. A sampled pixel whose color signature
//! differs from the background marks the box as occupied.
//!
//! The stride is an approximation: gaps or strokes thinner than `quality` can be missed.
//! That trade-off is intentional and `quality` is the knob that controls it.
//!
//! All blank origins are collected before one is picked, so the choice is uniform over
//! the full candidate set rather than biased toward the first hit.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cloud::canvas::Canvas;
use crate::cloud::color::color_signature;

// ────────────────────────────────────────────────────────────────────────────
// Quality
// ────────────────────────────────────────────────────────────────────────────

/// Sampling stride used when testing a box for blankness. Smaller is finer and slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    /// The finest stride allowed. Anything lower is clamped up to this.
    pub const FINEST: Quality = Quality(5);
    pub const NORMAL: Quality = Quality(10);
    pub const LOW: Quality = Quality(20);

    pub fn new(stride: u32) -> Self {
        Quality(stride.max(Self::FINEST.0))
    }

    pub fn stride(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<u32> for Quality {
    fn from(stride: u32) -> Self {
        Quality::new(stride)
    }
}

impl From<Quality> for u32 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scanning
// ────────────────────────────────────────────────────────────────────────────

/// Returns every blank top-left origin for a `size_x × size_y` box, column-major
/// (x outer, y inner).
///
/// Origins satisfy `x < width - size_x` and `y < height - size_y`, which keeps the
/// bottom-right sample (one pixel past the nominal box) inside the canvas. A box as
/// wide or as tall as the canvas therefore has no origins at all.
pub fn blank_origins(
    canvas: &Canvas,
    size_x: u32,
    size_y: u32,
    background_signature: u32,
    quality: Quality,
) -> Vec<(u32, u32)> {
    let (width, height) = (canvas.width(), canvas.height());
    if size_x >= width || size_y >= height {
        return Vec::new();
    }
    let step = quality.stride() as usize;

    let mut origins = Vec::new();
    for i in 0..width - size_x {
        for j in 0..height - size_y {
            if is_blank(canvas, i, j, size_x, size_y, background_signature, step) {
                origins.push((i, j));
            }
        }
    }
    origins
}

fn is_blank(
    canvas: &Canvas,
    i: u32,
    j: u32,
    size_x: u32,
    size_y: u32,
    background_signature: u32,
    step: usize,
) -> bool {
    for x in (i..=i + size_x).rev().step_by(step) {
        for y in (j..=j + size_y).rev().step_by(step) {
            if color_signature(&canvas.pixel(x, y)) != background_signature {
                return false;
            }
        }
    }
    true
}

/// Finds a blank region for a `size_x × size_y` box and picks one uniformly at random.
///
/// Returns `None` when the box does not fit or no blank origin exists. Never mutates
/// the canvas; the only side effect is advancing `rng`.
pub fn find_blank_region<R: Rng>(
    canvas: &Canvas,
    size_x: u32,
    size_y: u32,
    background_signature: u32,
    quality: Quality,
    rng: &mut R,
) -> Option<(u32, u32)> {
    let origins = blank_origins(canvas, size_x, size_y, background_signature, quality);
    if origins.is_empty() {
        return None;
    }
    Some(origins[rng.random_range(0..origins.len())])
}
