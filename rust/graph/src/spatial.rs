// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid spatial hash over edges.
//!
//! Each edge is registered in every grid cell its bounding box covers,
//! so a bounding-box query touches only the cells under the query box.
//! Candidates are returned deduplicated; exact collision tests are the
//! caller's job.

use rustc_hash::{FxHashMap, FxHashSet};
use umbra_core::Aabb;

use crate::keys::EdgeKey;

/// Grid cell side, in canvas units. Scenes are hundreds-to-thousands of
/// units across; 128 keeps typical walls in a handful of cells.
pub const CELL_SIZE: f64 = 128.0;

#[derive(Debug, Default)]
pub struct EdgeIndex {
    grid: FxHashMap<(i64, i64), Vec<EdgeKey>>,
}

impl EdgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell_of(v: f64) -> i64 {
        (v / CELL_SIZE).floor() as i64
    }

    fn cells_covering(bounds: &Aabb) -> impl Iterator<Item = (i64, i64)> {
        let x0 = Self::cell_of(bounds.min.x);
        let x1 = Self::cell_of(bounds.max.x);
        let y0 = Self::cell_of(bounds.min.y);
        let y1 = Self::cell_of(bounds.max.y);
        (x0..=x1).flat_map(move |cx| (y0..=y1).map(move |cy| (cx, cy)))
    }

    /// Registers an edge under every cell its bounds cover.
    pub fn insert(&mut self, key: EdgeKey, bounds: &Aabb) {
        for cell in Self::cells_covering(bounds) {
            self.grid.entry(cell).or_default().push(key);
        }
    }

    /// Removes an edge from the cells its bounds cover.
    pub fn remove(&mut self, key: EdgeKey, bounds: &Aabb) {
        for cell in Self::cells_covering(bounds) {
            if let Some(keys) = self.grid.get_mut(&cell) {
                keys.retain(|&k| k != key);
                if keys.is_empty() {
                    self.grid.remove(&cell);
                }
            }
        }
    }

    /// Candidate edges whose cells intersect the query bounds.
    pub fn query(&self, bounds: &Aabb) -> Vec<EdgeKey> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for cell in Self::cells_covering(bounds) {
            if let Some(keys) = self.grid.get(&cell) {
                for &k in keys {
                    if seen.insert(k) {
                        out.push(k);
                    }
                }
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }
}
