//! Phase 1: sparse scan of the full placement domain.
//!
//! Every `coarse_step`-th placement in both axes is scored at the coarse
//! sampling rate. Ties resolve to the first placement in row-major order, so
//! a base with no signal at this density yields `(0, 0)`.

use crate::candidate::best::Peak;
use crate::image::Raster;
use crate::kernel::scalar::ColorMatchScalar;
#[cfg(feature = "rayon")]
use crate::search::scan::scan_window_par;
use crate::search::scan::{scan_window, Deadline, ScanSpec, Window};
use crate::search::SearchConfig;
use crate::trace::{trace_event, trace_span};
use crate::util::math::sampling_stride;
use crate::util::TileFindResult;

pub(crate) fn coarse_search(
    base: &Raster,
    tile: &Raster,
    max_x: usize,
    max_y: usize,
    cfg: &SearchConfig,
    deadline: Option<&Deadline>,
) -> TileFindResult<Peak> {
    let _span = trace_span!("coarse_search", step = cfg.coarse_step, rate = cfg.coarse_rate).entered();

    let window = Window {
        x0: 0,
        y0: 0,
        x1: max_x,
        y1: max_y,
    };
    let spec = ScanSpec {
        step: cfg.coarse_step,
        stride: sampling_stride(cfg.coarse_rate),
        params: cfg.score_params(),
    };

    #[cfg(feature = "rayon")]
    let best = if cfg.parallel {
        scan_window_par::<ColorMatchScalar>(base, tile, window, spec, deadline)?
    } else {
        scan_window::<ColorMatchScalar>(base, tile, window, spec, deadline)?
    };
    #[cfg(not(feature = "rayon"))]
    let best = scan_window::<ColorMatchScalar>(base, tile, window, spec, deadline)?;

    trace_event!("coarse_best", x = best.x, y = best.y, score = best.score);
    Ok(best)
}
