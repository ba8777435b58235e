//! The coordinate map written for downstream consumers.
//!
//! Serialized as a JSON object keyed by tile id in lexicographic order:
//!
//! ```json
//! {
//!   "city_01.png": { "x": 37, "y": 52, "width": 64, "height": 64, "matchScore": 98.44, "error": false }
//! }
//! ```
//!
//! Consumers must treat `error: true` entries as unplaceable.

use crate::search::SearchResult;
use crate::util::math::percent_2dp;
use crate::util::TileFindResult;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Placement of one tile in base coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Score as a percentage, rounded to two decimals.
    #[serde(default)]
    pub match_score: f64,
    pub error: bool,
}

impl PlacementRecord {
    /// Builds a record from a search result.
    ///
    /// `error` is set when the score falls below `accept_threshold`; the
    /// best-effort coordinates are kept for manual review.
    pub fn from_search(
        result: SearchResult,
        width: usize,
        height: usize,
        accept_threshold: f32,
    ) -> Self {
        Self {
            x: result.x,
            y: result.y,
            width,
            height,
            match_score: percent_2dp(result.score),
            error: result.score < accept_threshold,
        }
    }

    /// Record for a tile that could not be decoded.
    pub fn decode_failure() -> Self {
        Self::unplaced(0, 0)
    }

    /// Record for a decoded tile that could not be searched.
    pub fn unplaced(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            match_score: 0.0,
            error: true,
        }
    }
}

/// Counts of accepted and flagged records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapSummary {
    pub total: usize,
    pub placed: usize,
    pub flagged: usize,
}

/// Tile id to placement, ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateMap {
    records: BTreeMap<String, PlacementRecord>,
}

impl CoordinateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the previous one for the same id.
    pub fn insert(&mut self, id: impl Into<String>, record: PlacementRecord) -> Option<PlacementRecord> {
        self.records.insert(id.into(), record)
    }

    pub fn get(&self, id: &str) -> Option<&PlacementRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in id order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PlacementRecord> {
        self.records.iter()
    }

    /// Ids of records flagged with `error: true`, in id order.
    pub fn flagged_ids(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|(_, record)| record.error)
            .map(|(id, _)| id.as_str())
    }

    pub fn summary(&self) -> MapSummary {
        let flagged = self.records.values().filter(|r| r.error).count();
        MapSummary {
            total: self.records.len(),
            placed: self.records.len() - flagged,
            flagged,
        }
    }

    /// Serializes the map as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> TileFindResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a map from JSON.
    pub fn from_json(text: &str) -> TileFindResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes the map as pretty-printed JSON, creating parent directories.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> TileFindResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a map written by [`CoordinateMap::write_to`].
    pub fn read_from<P: AsRef<Path>>(path: P) -> TileFindResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl FromIterator<(String, PlacementRecord)> for CoordinateMap {
    fn from_iter<I: IntoIterator<Item = (String, PlacementRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CoordinateMap {
    type Item = (String, PlacementRecord);
    type IntoIter = btree_map::IntoIter<String, PlacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a CoordinateMap {
    type Item = (&'a String, &'a PlacementRecord);
    type IntoIter = btree_map::Iter<'a, String, PlacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
