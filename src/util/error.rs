//! Error types for tilefind.

use thiserror::Error;

/// Result alias for tilefind operations.
pub type TileFindResult<T> = std::result::Result<T, TileFindError>;

/// Errors that can occur when loading rasters, searching, or writing output.
#[derive(Debug, Error)]
pub enum TileFindError {
    /// Raster dimensions are zero or overflow `usize`.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A tile is larger than the base raster in at least one axis.
    #[error("tile {tile_width}x{tile_height} does not fit base {base_width}x{base_height}")]
    TileExceedsBase {
        tile_width: usize,
        tile_height: usize,
        base_width: usize,
        base_height: usize,
    },
    /// The pixel buffer is shorter than `width * height * 4`.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The pixel buffer is longer than `width * height * 4`.
    #[error("buffer too large: expected {expected}, got {got}")]
    BufferTooLarge { expected: usize, got: usize },
    /// A configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// The tile has no sampled pixel at or above the opacity threshold.
    #[error("tile has no opaque pixels")]
    EmptyMask,
    /// The per-tile deadline expired before the search finished.
    #[error("search deadline exceeded after {elapsed_ms} ms")]
    DeadlineExceeded { elapsed_ms: u128 },
    /// A raster could not be decoded.
    #[error("decode failed: {reason}")]
    Decode { reason: String },
    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The coordinate map could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
