use tilefind::{Raster, TileFindError};

#[test]
fn raster_rejects_invalid_dimensions() {
    let err = Raster::new(Vec::new(), 0, 1).err().unwrap();
    assert!(matches!(
        err,
        TileFindError::InvalidDimensions {
            width: 0,
            height: 1
        }
    ));

    let err = Raster::filled(3, 0, [0, 0, 0, 255]).err().unwrap();
    assert!(matches!(
        err,
        TileFindError::InvalidDimensions {
            width: 3,
            height: 0
        }
    ));
}

#[test]
fn raster_rejects_wrong_buffer_length() {
    let err = Raster::new(vec![0u8; 15], 2, 2).err().unwrap();
    assert!(matches!(
        err,
        TileFindError::BufferTooSmall { needed: 16, got: 15 }
    ));

    let err = Raster::new(vec![0u8; 17], 2, 2).err().unwrap();
    assert!(matches!(
        err,
        TileFindError::BufferTooLarge {
            expected: 16,
            got: 17
        }
    ));
}

#[test]
fn raster_pixels_are_row_major_rgba() {
    let raster = Raster::from_fn(3, 2, |x, y| [x as u8, y as u8, 7, 255]).unwrap();
    assert_eq!(raster.stride(), 12);
    assert_eq!(raster.as_raw().len(), 24);
    assert_eq!(raster.pixel(2, 1), Some([2, 1, 7, 255]));
    assert_eq!(raster.pixel(3, 0), None);
    assert_eq!(raster.pixel(0, 2), None);
    assert_eq!(
        raster.row(1).unwrap(),
        &[0, 1, 7, 255, 1, 1, 7, 255, 2, 1, 7, 255]
    );
    assert!(raster.row(2).is_none());
}

#[test]
fn crop_copies_the_requested_region() {
    let raster = Raster::from_fn(8, 8, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
    let crop = raster.crop(3, 5, 4, 2).unwrap();
    assert_eq!((crop.width(), crop.height()), (4, 2));
    assert_eq!(crop.pixel(0, 0), Some([3, 5, 0, 255]));
    assert_eq!(crop.pixel(3, 1), Some([6, 6, 0, 255]));

    let err = raster.crop(6, 0, 4, 4).err().unwrap();
    assert!(matches!(err, TileFindError::TileExceedsBase { .. }));
}

#[test]
fn into_raw_returns_the_original_buffer() {
    let data: Vec<u8> = (0u8..16).collect();
    let raster = Raster::new(data.clone(), 2, 2).unwrap();
    assert_eq!(raster.into_raw(), data);
}
