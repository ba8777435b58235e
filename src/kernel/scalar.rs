//! Scalar reference kernel for alpha-masked color matching.

use crate::image::{Raster, CHANNELS};
use crate::kernel::{Kernel, ScoreParams};
use crate::util::math::sampling_stride;

/// Scalar masked color-match kernel.
pub struct ColorMatchScalar;

impl Kernel for ColorMatchScalar {
    fn score_at(
        base: &Raster,
        tile: &Raster,
        x: isize,
        y: isize,
        stride: usize,
        params: ScoreParams,
    ) -> f32 {
        let stride = stride.max(1);
        let base_width = base.width() as isize;
        let base_height = base.height() as isize;

        let mut sampled = 0u64;
        let mut matched = 0u64;
        for ty in (0..tile.height()).step_by(stride) {
            let Some(tile_row) = tile.row(ty) else {
                continue;
            };
            let by = y + ty as isize;
            let base_row = if (0..base_height).contains(&by) {
                base.row(by as usize)
            } else {
                None
            };

            for tx in (0..tile.width()).step_by(stride) {
                let t = &tile_row[tx * CHANNELS..(tx + 1) * CHANNELS];
                if t[3] < params.opacity_threshold {
                    continue;
                }
                sampled += 1;

                let Some(base_row) = base_row else {
                    continue;
                };
                let bx = x + tx as isize;
                if !(0..base_width).contains(&bx) {
                    continue;
                }
                let b = &base_row[bx as usize * CHANNELS..(bx as usize + 1) * CHANNELS];
                let diff = u32::from(t[0].abs_diff(b[0]))
                    + u32::from(t[1].abs_diff(b[1]))
                    + u32::from(t[2].abs_diff(b[2]));
                if diff < params.color_tolerance {
                    matched += 1;
                }
            }
        }

        if sampled == 0 {
            0.0
        } else {
            (matched as f64 / sampled as f64) as f32
        }
    }
}

/// Scores one placement with a sampling rate in `(0, 1]`.
///
/// The rate maps to a deterministic pixel stride of `max(1, floor(1 / rate))`;
/// the same inputs always produce the same score.
pub fn score_at(
    base: &Raster,
    tile: &Raster,
    x: isize,
    y: isize,
    sampling_rate: f32,
    params: ScoreParams,
) -> f32 {
    ColorMatchScalar::score_at(base, tile, x, y, sampling_stride(sampling_rate), params)
}

/// Counts tile pixels on the `stride` subgrid whose alpha reaches `opacity_threshold`.
pub fn opaque_sample_count(tile: &Raster, stride: usize, opacity_threshold: u8) -> usize {
    let stride = stride.max(1);
    let mut count = 0usize;
    for ty in (0..tile.height()).step_by(stride) {
        let Some(row) = tile.row(ty) else {
            continue;
        };
        count += row
            .chunks_exact(CHANNELS)
            .step_by(stride)
            .filter(|px| px[3] >= opacity_threshold)
            .count();
    }
    count
}
