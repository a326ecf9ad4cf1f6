// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall registration: collision resolution and edge splitting.
//!
//! Registering a wall finds every collision against the existing edges
//! (shared endpoints, proper crossings, collinear overlaps), splits the
//! new wall at the collision parameters, and splits the existing edges
//! at theirs. Afterward no two edges cross in their interiors — all
//! crossings are shared vertices — which is the invariant the face
//! tracer depends on.
//!
//! Collinear duplicate walls are deliberately NOT merged: both walls
//! keep their own edges sharing the same vertices.
//!
//! Mutation order is load-bearing: split, then register vertices, then
//! revalidate connectivity. A query between those steps would observe a
//! half-split wall, so callers must treat each operation as atomic.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use umbra_core::quant::QuantKey;
use umbra_core::segment::{intersect_segments, orient, SegmentHit};
use umbra_core::{Wall, WallId};

use crate::error::{Error, Result};
use crate::graph::WallGraph;
use crate::keys::{EdgeKey, VertexKey};

/// Absolute coordinate tolerance for collision classification.
pub const COLLISION_TOL: f64 = 1e-6;

/// Acknowledgement of one wall mutation: the wall's current edges and
/// whether the connected set changed (callers use the flag to decide
/// whether cached visibility results must be invalidated).
#[derive(Debug, Clone, Default)]
pub struct WallUpdate {
    pub edges: Vec<EdgeKey>,
    pub connectivity_changed: bool,
}

impl WallGraph {
    /// Registers a new wall, splitting it and any colliding edges at
    /// their mutual intersection points.
    pub fn register_wall(&mut self, wall: Wall) -> Result<WallUpdate> {
        let id = wall.id;
        if self.walls.contains_key(&id) {
            return Err(Error::DuplicateWall(id));
        }

        let seg = wall.segment();
        let finite = seg.a.x.is_finite()
            && seg.a.y.is_finite()
            && seg.b.x.is_finite()
            && seg.b.y.is_finite();
        if !finite || seg.is_degenerate() {
            // Best-effort: keep the record, derive no geometry.
            debug!("wall {id:?} is degenerate or non-finite, registering without edges");
            self.walls.insert(id, wall);
            return Ok(WallUpdate::default());
        }

        // 1. Candidate edges by bounding box.
        let candidates = self.spatial.query(&seg.bounds().pad(COLLISION_TOL));

        // 2. Classify collisions; collect cut parameters on the new
        //    wall and split positions on existing edges.
        let mut cuts: Vec<f64> = vec![0.0, 1.0];
        let mut edge_splits: FxHashMap<EdgeKey, Vec<f64>> = FxHashMap::default();
        for key in candidates {
            let target = match self.edge_segment(key) {
                Some(t) => t,
                None => continue,
            };
            match intersect_segments(&seg, &target, COLLISION_TOL) {
                Some(SegmentHit::Touch { t, u }) => {
                    cuts.push(t);
                    if interior(u) {
                        edge_splits.entry(key).or_default().push(u);
                    }
                }
                Some(SegmentHit::Crossing { t, u }) => {
                    cuts.push(t);
                    edge_splits.entry(key).or_default().push(u);
                }
                Some(SegmentHit::Overlap { t0, t1, u0, u1 }) => {
                    cuts.push(t0);
                    cuts.push(t1);
                    for u in [u0, u1] {
                        if interior(u) {
                            edge_splits.entry(key).or_default().push(u);
                        }
                    }
                }
                None => {
                    // Bounding boxes overlapped; if the segments also
                    // straddle each other an intersection was expected.
                    let s1 = orient(&seg.a, &seg.b, &target.a) * orient(&seg.a, &seg.b, &target.b);
                    let s2 = orient(&target.a, &target.b, &seg.a) * orient(&target.a, &target.b, &seg.b);
                    if s1 < 0.0 && s2 < 0.0 {
                        warn!(
                            "expected intersection between wall {id:?} and edge {key:?} \
                             not found numerically; treating as non-colliding"
                        );
                    }
                }
            }
        }

        self.walls.insert(id, wall);

        // 3. Split the colliding existing edges at their positions. An
        //    edge hit more than once (a contained collinear overlap)
        //    splits at every position in one pass.
        let mut new_edges: Vec<EdgeKey> = Vec::new();
        for (key, positions) in edge_splits {
            new_edges.extend(self.split_edge_at(key, &positions));
        }

        // 4. Build the new wall's own sub-edges between consecutive
        //    cut parameters.
        cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        cuts.dedup_by(|a, b| (*a - *b).abs() <= f64::EPSILON);
        for pair in cuts.windows(2) {
            let (t0, t1) = (pair[0].clamp(0.0, 1.0), pair[1].clamp(0.0, 1.0));
            if t1 <= t0 {
                continue;
            }
            // insert_edge drops spans that quantize to a single vertex.
            if let Some(key) = self.insert_edge(id, t0, t1) {
                new_edges.push(key);
            }
        }

        // 5. Revalidate connectivity over everything just created.
        let connectivity_changed = self.refresh_after_insert(&new_edges);

        Ok(WallUpdate {
            edges: self.wall_edge_keys(id),
            connectivity_changed,
        })
    }

    /// Deletes a wall and every edge derived from it, cascading the
    /// connectivity revalidation. Edges of other walls that were split
    /// at crossings with this wall stay split.
    pub fn remove_wall(&mut self, id: WallId) -> Result<WallUpdate> {
        if self.walls.remove(&id).is_none() {
            return Err(Error::UnknownWall(id));
        }
        let keys: Vec<EdgeKey> = self
            .wall_edges
            .remove(&id)
            .map(|s| s.into_iter().collect())
            .unwrap_or_default();

        let mut touched: Vec<VertexKey> = Vec::new();
        let mut removed_connected = false;
        for key in keys {
            removed_connected |= self.is_connected(key);
            if let Some(data) = self.remove_edge(key) {
                touched.push(data.a);
                touched.push(data.b);
            }
        }

        let cascaded = self.refresh_after_removal(&touched);
        Ok(WallUpdate {
            edges: Vec::new(),
            connectivity_changed: removed_connected || cascaded,
        })
    }

    /// Applies new geometry/flags for an existing wall: full removal
    /// followed by re-registration, in that order.
    pub fn update_wall(&mut self, wall: Wall) -> Result<WallUpdate> {
        let removed = self.remove_wall(wall.id)?;
        let mut update = self.register_wall(wall)?;
        update.connectivity_changed |= removed.connectivity_changed;
        Ok(update)
    }

    /// Splits one edge at every parameter in `positions` (each in the
    /// edge's own 0..1 range), replacing it with the sub-edges between
    /// consecutive split points. Positions that land on an endpoint are
    /// ignored; with nothing left to do the edge is untouched.
    fn split_edge_at(&mut self, key: EdgeKey, positions: &[f64]) -> Vec<EdgeKey> {
        let (wall_id, t0, t1, a, b) = match self.edges.get(key) {
            Some(d) => (d.wall, d.t0, d.t1, d.a, d.b),
            None => {
                debug!("edge {key:?} vanished before split; skipping");
                return Vec::new();
            }
        };
        let wall_seg = match self.walls.get(&wall_id) {
            Some(w) => w.segment(),
            None => {
                warn!("edge {key:?} references unknown wall {wall_id:?}");
                return Vec::new();
            }
        };
        let endpoint_keys = [
            self.vertices.get(a).map(|v| v.key),
            self.vertices.get(b).map(|v| v.key),
        ];

        let mut ts: Vec<f64> = Vec::with_capacity(positions.len());
        for &u in positions {
            let t_split = t0 + u * (t1 - t0);
            let split_key = QuantKey::of(&wall_seg.point_at(t_split));
            if endpoint_keys.contains(&Some(split_key)) {
                // Collision snaps to an existing vertex — no split.
                continue;
            }
            ts.push(t_split);
        }
        if ts.is_empty() {
            return Vec::new();
        }
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        ts.dedup_by(|a, b| (*a - *b).abs() <= f64::EPSILON);

        self.remove_edge(key);
        let mut bounds = Vec::with_capacity(ts.len() + 2);
        bounds.push(t0);
        bounds.extend(ts);
        bounds.push(t1);
        let mut out = Vec::new();
        for pair in bounds.windows(2) {
            out.extend(self.insert_edge(wall_id, pair[0], pair[1]));
        }
        out
    }
}

/// Parametric position strictly inside (0, 1).
fn interior(u: f64) -> bool {
    u > f64::EPSILON && u < 1.0 - f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::Point2;

    fn wall(id: u64, ax: f64, ay: f64, bx: f64, by: f64) -> Wall {
        Wall::solid(WallId(id), Point2::new(ax, ay), Point2::new(bx, by))
    }

    #[test]
    fn crossing_walls_split_both() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        let update = g.register_wall(wall(2, 50.0, -50.0, 50.0, 50.0)).unwrap();

        assert_eq!(g.wall_edge_keys(WallId(1)).len(), 2);
        assert_eq!(update.edges.len(), 2);
        assert_eq!(g.edge_count(), 4);

        // Both walls share exactly one vertex, at the crossing.
        let crossing = g.vertex_at(&Point2::new(50.0, 0.0));
        assert_eq!(g.degree(crossing), 4);
    }

    #[test]
    fn shared_endpoint_does_not_split() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        g.register_wall(wall(2, 100.0, 0.0, 100.0, 100.0)).unwrap();

        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.vertex_count(), 3);
    }

    #[test]
    fn t_junction_splits_the_through_wall_only() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        let update = g.register_wall(wall(2, 50.0, 0.0, 50.0, 100.0)).unwrap();

        assert_eq!(g.wall_edge_keys(WallId(1)).len(), 2);
        assert_eq!(update.edges.len(), 1);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn multiple_crossings_split_in_order() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 20.0, -10.0, 20.0, 10.0)).unwrap();
        g.register_wall(wall(2, 60.0, -10.0, 60.0, 10.0)).unwrap();
        let update = g.register_wall(wall(3, 0.0, 0.0, 100.0, 0.0)).unwrap();

        // Split at x=20 and x=60 into three pieces.
        assert_eq!(update.edges.len(), 3);
        assert_eq!(g.edge_count(), 3 + 2 + 2);
    }

    #[test]
    fn collinear_duplicates_kept_separate() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        g.register_wall(wall(2, 0.0, 0.0, 100.0, 0.0)).unwrap();

        // Two logical walls, two edges, shared vertices.
        assert_eq!(g.wall_edge_keys(WallId(1)).len(), 1);
        assert_eq!(g.wall_edge_keys(WallId(2)).len(), 1);
        assert_eq!(g.vertex_count(), 2);
    }

    #[test]
    fn partial_collinear_overlap_splits_both() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        let update = g.register_wall(wall(2, 40.0, 0.0, 160.0, 0.0)).unwrap();

        // Wall 1 splits at x=40; wall 2 splits at x=100.
        assert_eq!(g.wall_edge_keys(WallId(1)).len(), 2);
        assert_eq!(update.edges.len(), 2);
    }

    #[test]
    fn contained_collinear_overlap_splits_at_both_ends() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        // Fully inside wall 1: both overlap boundaries are interior to
        // the same existing edge, so that edge must split twice.
        let update = g.register_wall(wall(2, 40.0, 0.0, 60.0, 0.0)).unwrap();

        assert_eq!(g.wall_edge_keys(WallId(1)).len(), 3);
        assert_eq!(update.edges.len(), 1);

        let mut spans: Vec<(f64, f64)> = g
            .wall_edge_keys(WallId(1))
            .iter()
            .filter_map(|&k| g.edge_segment(k))
            .map(|s| {
                let (x0, x1) = (s.a.x.min(s.b.x), s.a.x.max(s.b.x));
                (x0, x1)
            })
            .collect();
        spans.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert_eq!(spans, vec![(0.0, 40.0), (40.0, 60.0), (60.0, 100.0)]);

        // Wall 2's endpoints are shared vertices with degree 3 each.
        let v40 = g.vertex_at(&Point2::new(40.0, 0.0));
        let v60 = g.vertex_at(&Point2::new(60.0, 0.0));
        assert_eq!(g.degree(v40), 3);
        assert_eq!(g.degree(v60), 3);
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        assert!(matches!(
            g.register_wall(wall(1, 0.0, 0.0, 50.0, 0.0)),
            Err(Error::DuplicateWall(_))
        ));
    }

    #[test]
    fn remove_unknown_wall_is_an_error() {
        let mut g = WallGraph::new();
        assert!(matches!(
            g.remove_wall(WallId(42)),
            Err(Error::UnknownWall(_))
        ));
    }

    #[test]
    fn degenerate_wall_registers_without_edges() {
        let mut g = WallGraph::new();
        let update = g.register_wall(wall(1, 5.0, 5.0, 5.0, 5.0)).unwrap();
        assert!(update.edges.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.wall_count(), 1);
    }

    #[test]
    fn delete_and_recreate_converges() {
        let build = |g: &mut WallGraph| {
            g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
            g.register_wall(wall(2, 50.0, -50.0, 50.0, 50.0)).unwrap();
            g.register_wall(wall(3, 0.0, 0.0, 0.0, 100.0)).unwrap();
        };

        let mut direct = WallGraph::new();
        build(&mut direct);

        let mut churned = WallGraph::new();
        build(&mut churned);
        churned.remove_wall(WallId(1)).unwrap();
        churned
            .register_wall(wall(1, 0.0, 0.0, 100.0, 0.0))
            .unwrap();

        assert_eq!(direct.edge_count(), churned.edge_count());
        assert_eq!(direct.vertex_count(), churned.vertex_count());
        assert_eq!(
            direct.wall_edge_keys(WallId(1)).len(),
            churned.wall_edge_keys(WallId(1)).len()
        );
        assert_eq!(
            direct.connected_edges().len(),
            churned.connected_edges().len()
        );
        assert!(churned.verify_connectivity());
    }

    #[test]
    fn update_wall_moves_geometry() {
        let mut g = WallGraph::new();
        g.register_wall(wall(1, 0.0, 0.0, 100.0, 0.0)).unwrap();
        let update = g.update_wall(wall(1, 0.0, 50.0, 100.0, 50.0)).unwrap();

        assert_eq!(update.edges.len(), 1);
        let seg = g.edge_segment(update.edges[0]).unwrap();
        assert_eq!(seg.a.y, 50.0);
    }
}
