#![cfg(feature = "image-io")]

use image::{Rgba, RgbaImage};
use tilefind::io::{load_rgba_raster, load_tile_dir, raster_from_rgba_image};
use tilefind::TileFindError;

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 20) as u8, (y * 30) as u8, 7, if x == 0 { 0 } else { 255 }])
    })
}

#[test]
fn rgba_image_keeps_pixels_and_alpha() {
    let img = gradient(5, 4);
    let raster = raster_from_rgba_image(&img).unwrap();
    assert_eq!((raster.width(), raster.height()), (5, 4));
    assert_eq!(raster.pixel(3, 2), Some([60, 60, 7, 255]));
    assert_eq!(raster.pixel(0, 1), Some([0, 30, 7, 0]));
}

#[test]
fn png_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("piece.png");
    let img = gradient(6, 3);
    img.save(&path).unwrap();

    let raster = load_rgba_raster(&path).unwrap();
    assert_eq!(raster.as_raw(), img.as_raw().as_slice());
}

#[test]
fn tile_dir_lists_png_files_sorted_and_keeps_decode_failures() {
    let dir = tempfile::tempdir().unwrap();
    gradient(4, 4).save(dir.path().join("b_piece.png")).unwrap();
    gradient(3, 2).save(dir.path().join("a_piece.png")).unwrap();
    std::fs::write(dir.path().join("c_broken.png"), b"not a png").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let tiles = load_tile_dir(dir.path()).unwrap();
    let names: Vec<&str> = tiles.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["a_piece.png", "b_piece.png", "c_broken.png"]);

    let a = tiles[0].1.as_ref().unwrap();
    assert_eq!((a.width(), a.height()), (3, 2));
    assert!(matches!(tiles[2].1, Err(TileFindError::Decode { .. })));
}

#[test]
fn missing_base_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_rgba_raster(dir.path().join("missing.png")).err().unwrap();
    assert!(matches!(err, TileFindError::Decode { .. }));
}
