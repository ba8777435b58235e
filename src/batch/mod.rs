//! Batch placement of many tiles against one base raster.
//!
//! The base is decoded once by the caller and borrowed by every search.
//! Per-tile problems (decode failure, oversized tile, empty alpha mask,
//! expired deadline) become `error: true` records and never abort the run.

use crate::coords::{CoordinateMap, PlacementRecord};
use crate::image::Raster;
use crate::kernel::scalar::opaque_sample_count;
use crate::search::{Locator, SearchConfig, SearchResult};
use crate::trace::{trace_event, trace_span};
use crate::util::{TileFindError, TileFindResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Configuration for a batch run.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Search settings shared by every tile.
    pub search: SearchConfig,
    /// Scores below this value are flagged with `error: true`.
    pub accept_threshold: f32,
    /// Optional wall-clock budget per tile; expiry is recorded as an error.
    pub tile_deadline: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            accept_threshold: 0.6,
            tile_deadline: None,
        }
    }
}

impl BatchConfig {
    /// Checks the search settings and the acceptance threshold.
    pub fn validate(&self) -> TileFindResult<()> {
        self.search.validate()?;
        if !self.accept_threshold.is_finite() || !(0.0..=1.0).contains(&self.accept_threshold) {
            return Err(TileFindError::InvalidConfig {
                reason: "accept_threshold must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

/// Progress notification emitted once per processed tile.
///
/// In parallel runs `index` counts completions, not input positions.
#[derive(Clone, Copy, Debug)]
pub struct ProgressEvent<'a> {
    /// Zero-based count of tiles processed before this one.
    pub index: usize,
    /// Number of tiles in the batch.
    pub total: usize,
    /// Tile identifier.
    pub id: &'a str,
    /// The record that was produced.
    pub record: &'a PlacementRecord,
}

impl ProgressEvent<'_> {
    /// One-line human-readable outcome, e.g. `(37, 52) [98.44%]`.
    pub fn summary(&self) -> String {
        let record = self.record;
        if record.width == 0 && record.height == 0 {
            return "decode failed".to_string();
        }
        let flag = if record.error { " low confidence" } else { "" };
        format!(
            "({}, {}) [{:.2}%]{flag}",
            record.x, record.y, record.match_score
        )
    }
}

/// Receiver of progress notifications. Delivery is best effort.
pub trait ProgressObserver: Sync {
    fn on_tile(&self, event: &ProgressEvent<'_>);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent<'_>) + Sync,
{
    fn on_tile(&self, event: &ProgressEvent<'_>) {
        self(event)
    }
}

fn ignore_progress(_event: &ProgressEvent<'_>) {}

/// Runs the locator over a batch of tiles and builds a coordinate map.
#[derive(Clone, Debug)]
pub struct BatchLocator {
    cfg: BatchConfig,
    locator: Locator,
}

impl BatchLocator {
    /// Creates a batch locator after validating `cfg`.
    pub fn new(cfg: BatchConfig) -> TileFindResult<Self> {
        cfg.validate()?;
        let locator = Locator::new().with_config(cfg.search.clone());
        Ok(Self { cfg, locator })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.cfg
    }

    /// Places every tile. `Err` entries model tiles that failed to decode.
    pub fn run<I>(&self, base: &Raster, tiles: I) -> CoordinateMap
    where
        I: IntoIterator<Item = (String, TileFindResult<Raster>)>,
    {
        self.run_with_observer(base, tiles, &ignore_progress)
    }

    /// Like [`BatchLocator::run`], reporting each processed tile to `observer`.
    pub fn run_with_observer<I>(
        &self,
        base: &Raster,
        tiles: I,
        observer: &dyn ProgressObserver,
    ) -> CoordinateMap
    where
        I: IntoIterator<Item = (String, TileFindResult<Raster>)>,
    {
        let mut tiles: Vec<_> = tiles.into_iter().collect();
        tiles.sort_by(|a, b| a.0.cmp(&b.0));
        let total = tiles.len();
        let _span = trace_span!("batch", tiles = total).entered();

        #[cfg(feature = "rayon")]
        let map = if self.cfg.search.parallel {
            self.run_par(base, tiles, observer)
        } else {
            self.run_seq(base, tiles, observer)
        };
        #[cfg(not(feature = "rayon"))]
        let map = self.run_seq(base, tiles, observer);

        let summary = map.summary();
        trace_event!(
            "batch_done",
            total = summary.total,
            placed = summary.placed,
            flagged = summary.flagged
        );
        map
    }

    fn run_seq(
        &self,
        base: &Raster,
        tiles: Vec<(String, TileFindResult<Raster>)>,
        observer: &dyn ProgressObserver,
    ) -> CoordinateMap {
        let total = tiles.len();
        let mut map = CoordinateMap::new();
        for (index, (id, tile)) in tiles.into_iter().enumerate() {
            let record = self.place(base, &id, tile);
            observer.on_tile(&ProgressEvent {
                index,
                total,
                id: &id,
                record: &record,
            });
            map.insert(id, record);
        }
        map
    }

    #[cfg(feature = "rayon")]
    fn run_par(
        &self,
        base: &Raster,
        tiles: Vec<(String, TileFindResult<Raster>)>,
        observer: &dyn ProgressObserver,
    ) -> CoordinateMap {
        let total = tiles.len();
        let done = AtomicUsize::new(0);
        tiles
            .into_par_iter()
            .map(|(id, tile)| {
                let record = self.place(base, &id, tile);
                observer.on_tile(&ProgressEvent {
                    index: done.fetch_add(1, Ordering::Relaxed),
                    total,
                    id: &id,
                    record: &record,
                });
                (id, record)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Places one decoded tile.
    pub fn locate_tile(&self, base: &Raster, tile: &Raster) -> TileFindResult<SearchResult> {
        if opaque_sample_count(tile, 1, self.cfg.search.opacity_threshold) == 0 {
            return Err(TileFindError::EmptyMask);
        }
        match self.cfg.tile_deadline {
            Some(limit) => self.locator.locate_with_deadline(base, tile, limit),
            None => self.locator.locate(base, tile),
        }
    }

    fn place(&self, base: &Raster, id: &str, tile: TileFindResult<Raster>) -> PlacementRecord {
        let tile = match tile {
            Ok(tile) => tile,
            Err(err) => {
                let reason = err.to_string();
                trace_event!("tile_decode_failed", id = id, reason = reason.as_str());
                return PlacementRecord::decode_failure();
            }
        };

        match self.locate_tile(base, &tile) {
            Ok(result) => {
                let record = PlacementRecord::from_search(
                    result,
                    tile.width(),
                    tile.height(),
                    self.cfg.accept_threshold,
                );
                trace_event!(
                    "tile_placed",
                    id = id,
                    x = record.x,
                    y = record.y,
                    match_score = record.match_score,
                    error = record.error
                );
                record
            }
            Err(err) => {
                let reason = err.to_string();
                trace_event!("tile_unplaced", id = id, reason = reason.as_str());
                PlacementRecord::unplaced(tile.width(), tile.height())
            }
        }
    }
}
