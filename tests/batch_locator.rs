use std::sync::Mutex;
use std::time::Duration;
use tilefind::{
    BatchConfig, BatchLocator, PlacementRecord, ProgressEvent, ProgressObserver, Raster,
    TileFindError, TileFindResult,
};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// 160x160 white base with three 40x40 squares.
fn three_square_base() -> Raster {
    Raster::from_fn(160, 160, |x, y| {
        let inside = |rx: usize, ry: usize| (rx..rx + 40).contains(&x) && (ry..ry + 40).contains(&y);
        if inside(10, 20) {
            RED
        } else if inside(90, 30) {
            GREEN
        } else if inside(50, 100) {
            BLUE
        } else {
            WHITE
        }
    })
    .unwrap()
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(usize, usize, String, String)>>,
}

impl ProgressObserver for Recorder {
    fn on_tile(&self, event: &ProgressEvent<'_>) {
        self.seen.lock().unwrap().push((
            event.index,
            event.total,
            event.id.to_string(),
            event.summary(),
        ));
    }
}

fn decode_error() -> TileFindError {
    TileFindError::Decode {
        reason: "truncated png".to_string(),
    }
}

fn square_tiles(base: &Raster) -> Vec<(String, TileFindResult<Raster>)> {
    vec![
        ("c_blue.png".to_string(), base.crop(50, 100, 40, 40)),
        ("a_red.png".to_string(), base.crop(10, 20, 40, 40)),
        ("b_green.png".to_string(), base.crop(90, 30, 40, 40)),
    ]
}

#[test]
fn one_decode_failure_does_not_abort_the_batch() {
    let base = three_square_base();
    let mut tiles = square_tiles(&base);
    tiles.push(("broken.png".to_string(), Err(decode_error())));

    let batch = BatchLocator::new(BatchConfig::default()).unwrap();
    let map = batch.run(&base, tiles);

    assert_eq!(map.len(), 4);
    let placed: Vec<_> = map.iter().filter(|(_, r)| !r.error).collect();
    assert_eq!(placed.len(), 3);

    let broken = map.get("broken.png").unwrap();
    assert_eq!(*broken, PlacementRecord::decode_failure());
    assert_eq!((broken.width, broken.height), (0, 0));
    assert!(broken.error);
}

#[test]
fn squares_are_placed_exactly() {
    let base = three_square_base();
    let batch = BatchLocator::new(BatchConfig::default()).unwrap();
    let map = batch.run(&base, square_tiles(&base));

    for (id, x, y) in [("a_red.png", 10, 20), ("b_green.png", 90, 30), ("c_blue.png", 50, 100)] {
        let record = map.get(id).unwrap();
        assert_eq!(
            *record,
            PlacementRecord {
                x,
                y,
                width: 40,
                height: 40,
                match_score: 100.0,
                error: false,
            },
            "{id}"
        );
    }
    assert_eq!(map.summary().placed, 3);
    assert_eq!(map.flagged_ids().count(), 0);
}

#[test]
fn keys_and_progress_follow_id_order() {
    let base = three_square_base();
    let mut tiles = square_tiles(&base);
    tiles.push(("broken.png".to_string(), Err(decode_error())));

    let recorder = Recorder::default();
    let batch = BatchLocator::new(BatchConfig::default()).unwrap();
    let map = batch.run_with_observer(&base, tiles, &recorder);

    let keys: Vec<&str> = map.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(keys, ["a_red.png", "b_green.png", "broken.png", "c_blue.png"]);

    let seen = recorder.seen.into_inner().unwrap();
    let ids: Vec<&str> = seen.iter().map(|(_, _, id, _)| id.as_str()).collect();
    assert_eq!(ids, keys);
    for (index, (event_index, total, _, _)) in seen.iter().enumerate() {
        assert_eq!(*event_index, index);
        assert_eq!(*total, 4);
    }
    assert_eq!(seen[0].3, "(10, 20) [100.00%]");
    assert_eq!(seen[2].3, "decode failed");
}

#[test]
fn absent_color_is_low_confidence() {
    let base = three_square_base();
    let yellow = Raster::filled(20, 20, [255, 255, 0, 255]).unwrap();

    let batch = BatchLocator::new(BatchConfig::default()).unwrap();
    let map = batch.run(&base, vec![("yellow.png".to_string(), Ok(yellow))]);

    let record = map.get("yellow.png").unwrap();
    assert!(record.error);
    assert_eq!(record.match_score, 0.0);
    assert_eq!((record.width, record.height), (20, 20));
    assert_eq!(map.flagged_ids().collect::<Vec<_>>(), ["yellow.png"]);
}

#[test]
fn partial_match_is_flagged_below_threshold() {
    // Half of the tile is red, half is a color the base lacks.
    let base = three_square_base();
    let tile = Raster::from_fn(40, 40, |x, _| if x < 20 { RED } else { [10, 10, 10, 255] })
        .unwrap();

    let batch = BatchLocator::new(BatchConfig::default()).unwrap();
    let map = batch.run(&base, vec![("half.png".to_string(), Ok(tile))]);
    let record = map.get("half.png").unwrap();
    assert!(record.error);
    assert!(record.match_score <= 50.0);

    let lenient = BatchLocator::new(BatchConfig {
        accept_threshold: 0.0,
        ..BatchConfig::default()
    })
    .unwrap();
    let tile = Raster::from_fn(40, 40, |x, _| if x < 20 { RED } else { [10, 10, 10, 255] })
        .unwrap();
    let map = lenient.run(&base, vec![("half.png".to_string(), Ok(tile))]);
    assert!(!map.get("half.png").unwrap().error);
}

#[test]
fn oversized_and_transparent_tiles_become_error_records() {
    let base = three_square_base();
    let wide = Raster::filled(161, 10, RED).unwrap();
    let clear = Raster::filled(12, 8, [255, 0, 0, 0]).unwrap();

    let batch = BatchLocator::new(BatchConfig::default()).unwrap();
    let map = batch.run(
        &base,
        vec![
            ("wide.png".to_string(), Ok(wide)),
            ("clear.png".to_string(), Ok(clear)),
        ],
    );

    assert_eq!(*map.get("wide.png").unwrap(), PlacementRecord::unplaced(161, 10));
    assert_eq!(*map.get("clear.png").unwrap(), PlacementRecord::unplaced(12, 8));

    let clear = Raster::filled(12, 8, [255, 0, 0, 0]).unwrap();
    let err = batch.locate_tile(&base, &clear).err().unwrap();
    assert!(matches!(err, TileFindError::EmptyMask));
}

#[test]
fn expired_deadline_is_recorded_like_a_failure() {
    let base = three_square_base();
    let batch = BatchLocator::new(BatchConfig {
        tile_deadline: Some(Duration::ZERO),
        ..BatchConfig::default()
    })
    .unwrap();
    let map = batch.run(&base, square_tiles(&base));

    assert_eq!(map.len(), 3);
    for (_, record) in &map {
        assert!(record.error);
        assert_eq!((record.width, record.height), (40, 40));
    }
    assert_eq!(map.summary().flagged, 3);
}

#[test]
fn invalid_threshold_is_rejected() {
    let err = BatchLocator::new(BatchConfig {
        accept_threshold: 1.5,
        ..BatchConfig::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, TileFindError::InvalidConfig { .. }));
}

#[test]
fn empty_batch_yields_empty_map() {
    let base = three_square_base();
    let batch = BatchLocator::new(BatchConfig::default()).unwrap();
    let map = batch.run(&base, Vec::new());
    assert!(map.is_empty());
}
