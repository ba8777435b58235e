//! Strided scans over a window of placements.

use crate::candidate::best::{BestPeak, Peak};
use crate::image::Raster;
use crate::kernel::{Kernel, ScoreParams};
use crate::util::{TileFindError, TileFindResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Inclusive rectangle of top-left placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) x0: usize,
    pub(crate) y0: usize,
    pub(crate) x1: usize,
    pub(crate) y1: usize,
}

/// Wall-clock budget for one tile search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub(crate) fn after(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub(crate) fn check(&self) -> TileFindResult<()> {
        let elapsed = self.start.elapsed();
        if elapsed >= self.limit {
            return Err(TileFindError::DeadlineExceeded {
                elapsed_ms: elapsed.as_millis(),
            });
        }
        Ok(())
    }
}

/// Per-scan settings: placement step, pixel sampling stride, score params.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScanSpec {
    pub(crate) step: usize,
    pub(crate) stride: usize,
    pub(crate) params: ScoreParams,
}

fn scan_row<K: Kernel>(
    base: &Raster,
    tile: &Raster,
    window: Window,
    spec: ScanSpec,
    y: usize,
) -> Option<Peak> {
    let mut best = BestPeak::new();
    for x in (window.x0..=window.x1).step_by(spec.step.max(1)) {
        let score = K::score_at(base, tile, x as isize, y as isize, spec.stride, spec.params);
        best.offer(Peak { x, y, score });
    }
    best.get()
}

/// Scans `window` in row-major order and returns the first placement with
/// the highest score.
pub(crate) fn scan_window<K: Kernel>(
    base: &Raster,
    tile: &Raster,
    window: Window,
    spec: ScanSpec,
    deadline: Option<&Deadline>,
) -> TileFindResult<Peak> {
    let mut best = BestPeak::new();
    for y in (window.y0..=window.y1).step_by(spec.step.max(1)) {
        if let Some(deadline) = deadline {
            deadline.check()?;
        }
        if let Some(row_best) = scan_row::<K>(base, tile, window, spec, y) {
            best.offer(row_best);
        }
    }
    best.get().ok_or(TileFindError::InvalidDimensions {
        width: tile.width(),
        height: tile.height(),
    })
}

/// Row-parallel variant of [`scan_window`] with identical results.
///
/// Each row keeps its own first-found best; rows are then merged in
/// ascending `y`, which reproduces the sequential row-major tie-break.
#[cfg(feature = "rayon")]
pub(crate) fn scan_window_par<K: Kernel>(
    base: &Raster,
    tile: &Raster,
    window: Window,
    spec: ScanSpec,
    deadline: Option<&Deadline>,
) -> TileFindResult<Peak> {
    let rows: Vec<usize> = (window.y0..=window.y1)
        .step_by(spec.step.max(1))
        .collect();
    let row_results: Vec<TileFindResult<Option<Peak>>> = rows
        .par_iter()
        .map(|&y| {
            if let Some(deadline) = deadline {
                deadline.check()?;
            }
            Ok(scan_row::<K>(base, tile, window, spec, y))
        })
        .collect();

    let mut best = BestPeak::new();
    for row in row_results {
        if let Some(row_best) = row? {
            best.offer(row_best);
        }
    }
    best.get().ok_or(TileFindError::InvalidDimensions {
        width: tile.width(),
        height: tile.height(),
    })
}
