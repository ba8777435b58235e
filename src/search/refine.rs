//! Phases 2 and 3: seeded rescans around the previous best.
//!
//! The window extends `radius` placements in every direction from the seed
//! and is clamped to the valid domain. The seed keeps the score measured by
//! the previous phase. The window's best (first found among equals) replaces
//! the seed when its score is equal or greater: on a tie the denser
//! measurement wins, and a phase never returns a lower score than its seed.

use crate::candidate::best::Peak;
use crate::image::Raster;
use crate::kernel::scalar::ColorMatchScalar;
use crate::kernel::ScoreParams;
use crate::search::scan::{scan_window, Deadline, ScanSpec, Window};
use crate::trace::{trace_event, trace_span};
use crate::util::math::clamped_window;
use crate::util::TileFindResult;

/// Settings for one refinement phase.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RefinePass {
    pub(crate) name: &'static str,
    pub(crate) radius: usize,
    pub(crate) step: usize,
    pub(crate) stride: usize,
    pub(crate) params: ScoreParams,
}

pub(crate) fn window_around(seed: Peak, radius: usize, max_x: usize, max_y: usize) -> Window {
    let (x0, x1) = clamped_window(seed.x, radius, max_x);
    let (y0, y1) = clamped_window(seed.y, radius, max_y);
    Window { x0, y0, x1, y1 }
}

pub(crate) fn refine_around(
    base: &Raster,
    tile: &Raster,
    seed: Peak,
    max_x: usize,
    max_y: usize,
    pass: RefinePass,
    deadline: Option<&Deadline>,
) -> TileFindResult<Peak> {
    let _span = trace_span!("refine", phase = pass.name, radius = pass.radius).entered();

    let window = window_around(seed, pass.radius, max_x, max_y);
    let spec = ScanSpec {
        step: pass.step,
        stride: pass.stride,
        params: pass.params,
    };
    let window_best = scan_window::<ColorMatchScalar>(base, tile, window, spec, deadline)?;
    let best = keep_equal_or_better(seed, window_best);

    trace_event!("refine_best", x = best.x, y = best.y, score = best.score);
    Ok(best)
}

fn keep_equal_or_better(seed: Peak, candidate: Peak) -> Peak {
    if candidate.score >= seed.score {
        candidate
    } else {
        seed
    }
}
