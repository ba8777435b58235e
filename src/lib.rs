//! tilefind locates small alpha-masked RGBA tiles inside a large base raster.
//!
//! A three-phase coarse-to-fine search scores candidate placements by the
//! fraction of sampled opaque tile pixels that color-match the base, and a
//! batch layer turns a directory's worth of tiles into a coordinate map.
//! Optional features: `rayon` (parallel scans and batches), `image-io`
//! (decoding via the `image` crate), `tracing` (spans and events).

pub mod batch;
mod candidate;
pub mod coords;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use crate::image::Raster;
pub use batch::{BatchConfig, BatchLocator, ProgressEvent, ProgressObserver};
pub use coords::{CoordinateMap, MapSummary, PlacementRecord};
pub use kernel::ScoreParams;
pub use search::{placement_range, Locator, SearchConfig, SearchResult, SearchTrace};
pub use util::{TileFindError, TileFindResult};
