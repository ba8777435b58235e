//! Color-match scoring kernels.
//!
//! A kernel scores a single tile placement against the base raster. Scores
//! are the fraction of sampled, opaque tile pixels whose RGB values lie within
//! a Manhattan color tolerance of the base pixel underneath them.

use crate::image::Raster;

/// Alpha-mask and color-tolerance parameters shared by every score call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreParams {
    /// Tile pixels with alpha below this value are background and never scored.
    pub opacity_threshold: u8,
    /// A pixel matches when `|dr| + |dg| + |db|` is strictly below this value.
    pub color_tolerance: u32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            opacity_threshold: 50,
            color_tolerance: 40,
        }
    }
}

/// Kernel trait for scoring a single placement.
pub trait Kernel {
    /// Scores the tile with its top-left corner at `(x, y)` in base
    /// coordinates, examining only tile pixels on a `stride` subgrid.
    ///
    /// Offsets may be negative or overhang the base; pixels that land outside
    /// the base count as sampled but never as matches.
    fn score_at(
        base: &Raster,
        tile: &Raster,
        x: isize,
        y: isize,
        stride: usize,
        params: ScoreParams,
    ) -> f32;
}

pub mod scalar;
