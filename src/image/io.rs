//! Convenience helpers for decoding rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::Raster;
use crate::util::{TileFindError, TileFindResult};
use std::fs;
use std::path::Path;

/// Creates a raster from an RGBA8 image buffer.
pub fn raster_from_rgba_image(img: &image::RgbaImage) -> TileFindResult<Raster> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Raster::new(img.as_raw().clone(), width, height)
}

/// Converts a dynamic image to RGBA8 and wraps it as a raster.
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> TileFindResult<Raster> {
    let rgba = img.to_rgba8();
    raster_from_rgba_image(&rgba)
}

/// Decodes an image file from disk into an RGBA raster.
pub fn load_rgba_raster<P: AsRef<Path>>(path: P) -> TileFindResult<Raster> {
    let img = image::open(path.as_ref()).map_err(|err| TileFindError::Decode {
        reason: format!("{}: {err}", path.as_ref().display()),
    })?;
    raster_from_dynamic_image(&img)
}

/// Decodes every `*.png` file in `dir`, sorted by file name.
///
/// Each entry is keyed by its file name. Files that fail to decode are kept
/// as `Err` entries so the batch can record them; only a failure to list the
/// directory itself is returned as an error.
pub fn load_tile_dir<P: AsRef<Path>>(
    dir: P,
) -> TileFindResult<Vec<(String, TileFindResult<Raster>)>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_ascii_lowercase().ends_with(".png") {
            names.push(name);
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| {
            let raster = load_rgba_raster(dir.as_ref().join(&name));
            (name, raster)
        })
        .collect())
}
