//! Grid-cell point index.
//!
//! Points are bucketed into fixed-size lat/lon cells. A radius query visits
//! only the cells the bounding box overlaps, computes exact haversine
//! distances for the candidates and returns the survivors nearest-first.

use super::bounds::BoundingBox;
use super::config::{GeoIndexConfig, GeoIndexError};
use super::distance::haversine_meters;
use shared_types::GeoPoint;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::trace;

type CellKey = (i32, i32);

/// Spatial index from keys to points.
#[derive(Debug, Clone)]
pub struct GeoIndex<K> {
    cell_size: f64,
    cells: HashMap<CellKey, HashMap<K, GeoPoint>>,
    positions: HashMap<K, (CellKey, GeoPoint)>,
}

impl<K> Default for GeoIndex<K> {
    fn default() -> Self {
        Self {
            cell_size: GeoIndexConfig::default().cell_size_degrees,
            cells: HashMap::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K> GeoIndex<K>
where
    K: Copy + Eq + Hash + Ord,
{
    pub fn new(config: GeoIndexConfig) -> Result<Self, GeoIndexError> {
        config.validate()?;
        Ok(Self {
            cell_size: config.cell_size_degrees,
            ..Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<GeoPoint> {
        self.positions.get(key).map(|(_, point)| *point)
    }

    /// Insert or move `key` to `point`.
    pub fn insert(&mut self, key: K, point: GeoPoint) {
        self.remove(&key);
        let cell = self.cell_of(&point);
        self.cells.entry(cell).or_default().insert(key, point);
        self.positions.insert(key, (cell, point));
    }

    /// Remove `key`, returning its last point.
    pub fn remove(&mut self, key: &K) -> Option<GeoPoint> {
        let (cell, point) = self.positions.remove(key)?;
        if let Some(bucket) = self.cells.get_mut(&cell) {
            bucket.remove(key);
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
        Some(point)
    }

    /// Every key within `radius_m` meters of `center`, nearest first.
    ///
    /// Equal distances are ordered by key. A negative or NaN radius matches
    /// nothing.
    pub fn within(&self, center: &GeoPoint, radius_m: f64) -> Vec<(K, f64)> {
        if radius_m.is_nan() || radius_m < 0.0 || self.is_empty() {
            return Vec::new();
        }

        let bbox = BoundingBox::around(center, radius_m);
        let candidate_cells = self.cells_overlapping(&bbox);

        let mut hits: Vec<(K, f64)> = Vec::new();
        let mut scanned = 0usize;
        let mut visit = |bucket: &HashMap<K, GeoPoint>| {
            for (key, point) in bucket {
                scanned += 1;
                let distance = haversine_meters(center, point);
                if distance <= radius_m {
                    hits.push((*key, distance));
                }
            }
        };

        match candidate_cells {
            Some(cells) => {
                for cell in cells {
                    if let Some(bucket) = self.cells.get(&cell) {
                        visit(bucket);
                    }
                }
            }
            // Box spans more cells than are occupied: walk the occupied ones.
            None => {
                for bucket in self.cells.values() {
                    visit(bucket);
                }
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        trace!(
            scanned,
            matched = hits.len(),
            radius_m,
            "geo index radius query"
        );
        hits
    }

    fn cell_of(&self, point: &GeoPoint) -> CellKey {
        (
            (point.latitude() / self.cell_size).floor() as i32,
            (point.longitude() / self.cell_size).floor() as i32,
        )
    }

    /// Cells overlapping `bbox`, or `None` when enumerating them would cost
    /// more than scanning every occupied cell.
    fn cells_overlapping(&self, bbox: &BoundingBox) -> Option<HashSet<CellKey>> {
        let row_lo = (bbox.min_lat / self.cell_size).floor() as i64;
        let row_hi = (bbox.max_lat / self.cell_size).floor() as i64;
        let rows = row_hi - row_lo + 1;

        let cols: i64 = bbox
            .spans
            .iter()
            .map(|s| {
                (s.max / self.cell_size).floor() as i64 - (s.min / self.cell_size).floor() as i64
                    + 1
            })
            .sum();

        if rows.saturating_mul(cols) > self.cells.len() as i64 {
            return None;
        }

        let mut out = HashSet::new();
        for row in row_lo..=row_hi {
            for span in &bbox.spans {
                let col_lo = (span.min / self.cell_size).floor() as i64;
                let col_hi = (span.max / self.cell_size).floor() as i64;
                for col in col_lo..=col_hi {
                    out.insert((row as i32, col as i32));
                }
            }
        }
        Some(out)
    }
}
