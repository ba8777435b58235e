//! RGBA raster buffers.
//!
//! `Raster` owns a contiguous, row-major RGBA8 buffer. The stride is always
//! `width * 4` bytes; there is no row padding. Rasters are immutable once
//! built, so a single base raster can be shared by reference across search
//! workers.

use crate::util::{TileFindError, TileFindResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Owned RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Wraps a row-major RGBA buffer of exactly `width * height * 4` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> TileFindResult<Self> {
        let expected = required_len(width, height)?;
        if data.len() < expected {
            return Err(TileFindError::BufferTooSmall {
                needed: expected,
                got: data.len(),
            });
        }
        if data.len() > expected {
            return Err(TileFindError::BufferTooLarge {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a raster with every pixel set to `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> TileFindResult<Self> {
        Self::from_fn(width, height, |_, _| rgba)
    }

    /// Creates a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> TileFindResult<Self>
    where
        F: FnMut(usize, usize) -> [u8; 4],
    {
        let len = required_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width * CHANNELS
    }

    /// Returns the raw RGBA buffer.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster and returns the raw RGBA buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns the RGBA value at `(x, y)` if it is within bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * CHANNELS;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Returns the bytes of row `y` (length `width * 4`).
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride();
        self.data.get(start..start + self.stride())
    }

    /// Copies a `width x height` region starting at `(x, y)` into a new raster.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> TileFindResult<Raster> {
        required_len(width, height)?;
        let end_x = x
            .checked_add(width)
            .ok_or(TileFindError::InvalidDimensions { width, height })?;
        let end_y = y
            .checked_add(height)
            .ok_or(TileFindError::InvalidDimensions { width, height })?;
        if end_x > self.width || end_y > self.height {
            return Err(TileFindError::TileExceedsBase {
                tile_width: end_x,
                tile_height: end_y,
                base_width: self.width,
                base_height: self.height,
            });
        }

        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for row_y in y..end_y {
            let row = self.row(row_y).ok_or(TileFindError::BufferTooSmall {
                needed: (row_y + 1) * self.stride(),
                got: self.data.len(),
            })?;
            data.extend_from_slice(&row[x * CHANNELS..end_x * CHANNELS]);
        }
        Raster::new(data, width, height)
    }
}

fn required_len(width: usize, height: usize) -> TileFindResult<usize> {
    if width == 0 || height == 0 {
        return Err(TileFindError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(TileFindError::InvalidDimensions { width, height })
}
