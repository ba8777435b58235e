//! Hierarchical coarse-to-fine placement search.
//!
//! `Locator` runs three phases over the placement domain
//! `[0, base_w - tile_w] x [0, base_h - tile_h]`:
//!
//! 1. coarse: every `coarse_step`-th placement at `coarse_rate` sampling;
//! 2. medium: radius `coarse_step` around the coarse best, step
//!    `medium_step`, `medium_rate` sampling;
//! 3. fine: radius `medium_step` around the medium best, every placement,
//!    every pixel.
//!
//! Each refinement phase is seeded with the previous best and replaces it
//! only with an equal or greater score, so phase scores never decrease. The
//! cascade assumes the optimum is reachable from the coarse approximation;
//! bases with repeated or near-uniform regions can yield a local optimum.

pub(crate) mod coarse;
pub(crate) mod refine;
pub(crate) mod scan;

use crate::candidate::best::Peak;
use crate::image::Raster;
use crate::kernel::ScoreParams;
use crate::search::refine::RefinePass;
use crate::search::scan::Deadline;
use crate::trace::{trace_event, trace_span};
use crate::util::math::sampling_stride;
use crate::util::{TileFindError, TileFindResult};
use std::time::Duration;

/// Search configuration for the three-phase locator.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Tile pixels with alpha below this value are ignored.
    pub opacity_threshold: u8,
    /// Strict upper bound on `|dr| + |dg| + |db|` for a matching pixel.
    pub color_tolerance: u32,
    /// Placement step of the coarse phase; also the medium window radius.
    pub coarse_step: usize,
    /// Placement step of the medium phase; also the fine window radius.
    pub medium_step: usize,
    /// Pixel sampling rate of the coarse phase, in `(0, 1]`.
    pub coarse_rate: f32,
    /// Pixel sampling rate of the medium phase, in `(0, 1]`.
    pub medium_rate: f32,
    /// Scan coarse rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let params = ScoreParams::default();
        Self {
            opacity_threshold: params.opacity_threshold,
            color_tolerance: params.color_tolerance,
            coarse_step: 32,
            medium_step: 8,
            coarse_rate: 0.125,
            medium_rate: 0.2,
            parallel: false,
        }
    }
}

impl SearchConfig {
    /// Checks that steps and rates are usable.
    pub fn validate(&self) -> TileFindResult<()> {
        if self.coarse_step == 0 || self.medium_step == 0 {
            return Err(TileFindError::InvalidConfig {
                reason: "steps must be at least 1",
            });
        }
        for rate in [self.coarse_rate, self.medium_rate] {
            if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
                return Err(TileFindError::InvalidConfig {
                    reason: "sampling rates must lie in (0, 1]",
                });
            }
        }
        if self.color_tolerance == 0 {
            return Err(TileFindError::InvalidConfig {
                reason: "color_tolerance must be > 0",
            });
        }
        Ok(())
    }

    /// Returns the alpha-mask and tolerance parameters for the scorer.
    pub fn score_params(&self) -> ScoreParams {
        ScoreParams {
            opacity_threshold: self.opacity_threshold,
            color_tolerance: self.color_tolerance,
        }
    }
}

/// Best placement for one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    /// X offset of the tile's top-left corner in the base.
    pub x: usize,
    /// Y offset of the tile's top-left corner in the base.
    pub y: usize,
    /// Match score in `[0, 1]`.
    pub score: f32,
}

impl From<Peak> for SearchResult {
    fn from(peak: Peak) -> Self {
        Self {
            x: peak.x,
            y: peak.y,
            score: peak.score,
        }
    }
}

/// Best placement after each phase; `fine` is the final answer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchTrace {
    /// Result of the coarse full-domain scan.
    pub coarse: SearchResult,
    /// Result of the medium refinement.
    pub medium: SearchResult,
    /// Result of the full-resolution refinement.
    pub fine: SearchResult,
}

/// Returns the largest valid `(x, y)` placement of `tile` inside `base`.
///
/// Fails with `TileExceedsBase` when the tile is wider or taller than the
/// base, since the placement domain is then empty.
pub fn placement_range(base: &Raster, tile: &Raster) -> TileFindResult<(usize, usize)> {
    if tile.width() > base.width() || tile.height() > base.height() {
        return Err(TileFindError::TileExceedsBase {
            tile_width: tile.width(),
            tile_height: tile.height(),
            base_width: base.width(),
            base_height: base.height(),
        });
    }
    Ok((base.width() - tile.width(), base.height() - tile.height()))
}

/// Coarse-to-fine tile locator.
#[derive(Clone, Debug, Default)]
pub struct Locator {
    cfg: SearchConfig,
}

impl Locator {
    /// Creates a locator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the search configuration.
    pub fn with_config(mut self, cfg: SearchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Finds the best placement of `tile` inside `base`.
    pub fn locate(&self, base: &Raster, tile: &Raster) -> TileFindResult<SearchResult> {
        Ok(self.run(base, tile, None)?.fine)
    }

    /// Like [`Locator::locate`], but aborts with `DeadlineExceeded` once
    /// `limit` has elapsed. The deadline is checked between scan rows.
    pub fn locate_with_deadline(
        &self,
        base: &Raster,
        tile: &Raster,
        limit: Duration,
    ) -> TileFindResult<SearchResult> {
        let deadline = Deadline::after(limit);
        Ok(self.run(base, tile, Some(&deadline))?.fine)
    }

    /// Runs the search and returns the best placement after every phase.
    pub fn locate_traced(&self, base: &Raster, tile: &Raster) -> TileFindResult<SearchTrace> {
        self.run(base, tile, None)
    }

    fn run(
        &self,
        base: &Raster,
        tile: &Raster,
        deadline: Option<&Deadline>,
    ) -> TileFindResult<SearchTrace> {
        self.cfg.validate()?;
        let (max_x, max_y) = placement_range(base, tile)?;
        let _span = trace_span!(
            "locate",
            tile_width = tile.width(),
            tile_height = tile.height(),
            max_x = max_x,
            max_y = max_y
        )
        .entered();

        let params = self.cfg.score_params();
        let coarse = coarse::coarse_search(base, tile, max_x, max_y, &self.cfg, deadline)?;

        let medium_pass = RefinePass {
            name: "medium",
            radius: self.cfg.coarse_step,
            step: self.cfg.medium_step,
            stride: sampling_stride(self.cfg.medium_rate),
            params,
        };
        let medium = refine::refine_around(base, tile, coarse, max_x, max_y, medium_pass, deadline)?;

        let fine_pass = RefinePass {
            name: "fine",
            radius: self.cfg.medium_step,
            step: 1,
            stride: 1,
            params,
        };
        let fine = refine::refine_around(base, tile, medium, max_x, max_y, fine_pass, deadline)?;

        trace_event!("located", x = fine.x, y = fine.y, score = fine.score);
        Ok(SearchTrace {
            coarse: coarse.into(),
            medium: medium.into(),
            fine: fine.into(),
        })
    }
}
