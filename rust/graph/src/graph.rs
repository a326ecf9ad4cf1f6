// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena storage for the wall graph of one scene.
//!
//! [`WallGraph`] owns everything: vertices and edges in slot maps, the
//! quantized vertex registry, the per-wall edge sets, the spatial index
//! and the connectivity states. One instance per active scene, passed
//! explicitly — there are no process-wide singletons.
//!
//! Vertices are canonical by quantized coordinate: `vertex_at` returns
//! the same key for any two points within the quantization step, and a
//! vertex is evicted as soon as its last incident edge releases it.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;
use umbra_core::quant::QuantKey;
use umbra_core::{Point2, Segment2, Wall, WallId};

use crate::connectivity::LinkState;
use crate::keys::{EdgeKey, VertexKey};
use crate::spatial::EdgeIndex;

/// A canonical graph vertex: quantized position plus incident edges.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: Point2<f64>,
    pub key: QuantKey,
    pub edges: SmallVec<[EdgeKey; 4]>,
}

/// A maximal non-crossing sub-segment of one wall.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub wall: WallId,
    /// Parametric range along the owning wall (0 = endpoint A, 1 = B).
    pub t0: f64,
    pub t1: f64,
    pub a: VertexKey,
    pub b: VertexKey,
    /// Cached direction angle of A→B, radians.
    pub angle: f64,
}

/// The planar subdivision of one scene's walls.
#[derive(Debug, Default)]
pub struct WallGraph {
    pub(crate) vertices: SlotMap<VertexKey, VertexData>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    /// Quantized coordinate → canonical vertex.
    pub(crate) registry: FxHashMap<QuantKey, VertexKey>,
    pub(crate) walls: FxHashMap<WallId, Wall>,
    pub(crate) wall_edges: FxHashMap<WallId, FxHashSet<EdgeKey>>,
    pub(crate) spatial: EdgeIndex,
    pub(crate) link_state: SecondaryMap<EdgeKey, LinkState>,
}

impl WallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex registry (get-or-create, reference counted) ---

    /// Returns the canonical vertex for a point, creating it on first
    /// reference. Two points within the quantization step yield the
    /// SAME key.
    pub fn vertex_at(&mut self, point: &Point2<f64>) -> VertexKey {
        let key = QuantKey::of(point);
        if let Some(&vk) = self.registry.get(&key) {
            return vk;
        }
        let vk = self.vertices.insert(VertexData {
            point: key.point(),
            key,
            edges: SmallVec::new(),
        });
        self.registry.insert(key, vk);
        vk
    }

    /// Drops one edge reference from a vertex; evicts the vertex when
    /// its incident set empties.
    pub(crate) fn release_edge_ref(&mut self, vertex: VertexKey, edge: EdgeKey) {
        let empty = match self.vertices.get_mut(vertex) {
            Some(v) => {
                v.edges.retain(|&mut e| e != edge);
                v.edges.is_empty()
            }
            None => return,
        };
        if empty {
            if let Some(v) = self.vertices.remove(vertex) {
                self.registry.remove(&v.key);
            }
        }
    }

    // --- Edge lifecycle ---

    /// Creates one edge for the parametric range `[t0, t1]` of a
    /// registered wall. Returns `None` when the range quantizes to a
    /// single vertex (zero-length sub-edges are discarded).
    pub(crate) fn insert_edge(&mut self, wall_id: WallId, t0: f64, t1: f64) -> Option<EdgeKey> {
        let wall = self.walls.get(&wall_id)?;
        let seg = wall.segment();
        let pa = seg.point_at(t0);
        let pb = seg.point_at(t1);

        let va = self.vertex_at(&pa);
        let vb = self.vertex_at(&pb);
        if va == vb {
            // The span collapsed to a point; a vertex created just for
            // it must not linger at degree zero.
            if self.vertices.get(va).is_some_and(|v| v.edges.is_empty()) {
                if let Some(v) = self.vertices.remove(va) {
                    self.registry.remove(&v.key);
                }
            }
            return None;
        }

        let a_point = self.vertices[va].point;
        let b_point = self.vertices[vb].point;
        let edge_seg = Segment2::new(a_point, b_point);
        let key = self.edges.insert(EdgeData {
            wall: wall_id,
            t0,
            t1,
            a: va,
            b: vb,
            angle: edge_seg.angle(),
        });

        self.vertices[va].edges.push(key);
        self.vertices[vb].edges.push(key);
        self.wall_edges.entry(wall_id).or_default().insert(key);
        self.spatial.insert(key, &edge_seg.bounds());
        self.link_state.insert(key, LinkState::Unknown);
        Some(key)
    }

    /// Removes an edge and its vertex back-references. Does not touch
    /// connectivity — callers cascade separately.
    pub(crate) fn remove_edge(&mut self, key: EdgeKey) -> Option<EdgeData> {
        let data = self.edges.remove(key)?;
        if let Some(seg) = Self::segment_of(&self.vertices, &data) {
            self.spatial.remove(key, &seg.bounds());
        }
        self.release_edge_ref(data.a, key);
        self.release_edge_ref(data.b, key);
        if let Some(set) = self.wall_edges.get_mut(&data.wall) {
            set.remove(&key);
        }
        self.link_state.remove(key);
        Some(data)
    }

    fn segment_of(
        vertices: &SlotMap<VertexKey, VertexData>,
        data: &EdgeData,
    ) -> Option<Segment2> {
        let a = vertices.get(data.a)?.point;
        let b = vertices.get(data.b)?.point;
        Some(Segment2::new(a, b))
    }

    // --- Accessors ---

    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    pub fn edge_segment(&self, key: EdgeKey) -> Option<Segment2> {
        Self::segment_of(&self.vertices, self.edges.get(key)?)
    }

    pub fn vertex_point(&self, key: VertexKey) -> Option<Point2<f64>> {
        self.vertices.get(key).map(|v| v.point)
    }

    /// Edges incident to a vertex.
    pub fn edges_at(&self, vertex: VertexKey) -> &[EdgeKey] {
        self.vertices
            .get(vertex)
            .map(|v| v.edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn degree(&self, vertex: VertexKey) -> usize {
        self.edges_at(vertex).len()
    }

    /// The far endpoint of an edge relative to one of its vertices.
    pub fn other_vertex(&self, edge: EdgeKey, vertex: VertexKey) -> Option<VertexKey> {
        let e = self.edges.get(edge)?;
        if e.a == vertex {
            Some(e.b)
        } else if e.b == vertex {
            Some(e.a)
        } else {
            None
        }
    }

    pub fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(&id)
    }

    /// Current edge keys of a wall, in unspecified order.
    pub fn wall_edge_keys(&self, id: WallId) -> Vec<EdgeKey> {
        self.wall_edges
            .get(&id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// All live edge keys.
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::Wall;

    #[test]
    fn vertex_canonicalization_within_step() {
        let mut graph = WallGraph::new();
        let v0 = graph.vertex_at(&Point2::new(5.2, 10.3));
        let v1 = graph.vertex_at(&Point2::new(4.9, 9.8));
        assert_eq!(v0, v1);
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn distinct_vertices_beyond_step() {
        let mut graph = WallGraph::new();
        let v0 = graph.vertex_at(&Point2::new(5.0, 10.0));
        let v1 = graph.vertex_at(&Point2::new(7.0, 10.0));
        assert_ne!(v0, v1);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn edge_insert_registers_both_endpoints() {
        let mut graph = WallGraph::new();
        let wall = Wall::solid(WallId(1), Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        graph.walls.insert(wall.id, wall);

        let key = graph.insert_edge(WallId(1), 0.0, 1.0).unwrap();
        let data = graph.edge(key).unwrap();
        assert_eq!(graph.degree(data.a), 1);
        assert_eq!(graph.degree(data.b), 1);
        assert_eq!(graph.wall_edge_keys(WallId(1)), vec![key]);
    }

    #[test]
    fn zero_length_subedge_discarded() {
        let mut graph = WallGraph::new();
        let wall = Wall::solid(WallId(1), Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        graph.walls.insert(wall.id, wall);

        // Both ends quantize to the same vertex.
        assert!(graph.insert_edge(WallId(1), 0.5, 0.51).is_none());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.vertex_count(), 0);
        assert!(graph.registry.is_empty());
    }

    #[test]
    fn collapsed_span_keeps_preexisting_vertex() {
        let mut graph = WallGraph::new();
        let w1 = Wall::solid(WallId(1), Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let w2 = Wall::solid(WallId(2), Point2::new(5.0, 0.0), Point2::new(5.0, 10.0));
        graph.walls.insert(w1.id, w1);
        graph.walls.insert(w2.id, w2);

        // w2's start vertex at (5, 0) is already referenced by an edge.
        graph.insert_edge(WallId(2), 0.0, 1.0).unwrap();
        assert!(graph.insert_edge(WallId(1), 0.5, 0.51).is_none());
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn removing_last_edge_evicts_vertices() {
        let mut graph = WallGraph::new();
        let wall = Wall::solid(WallId(1), Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        graph.walls.insert(wall.id, wall);

        let key = graph.insert_edge(WallId(1), 0.0, 1.0).unwrap();
        graph.remove_edge(key);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.vertex_count(), 0);
        assert!(graph.registry.is_empty());
    }

    #[test]
    fn shared_vertex_survives_partial_removal() {
        let mut graph = WallGraph::new();
        let w1 = Wall::solid(WallId(1), Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let w2 = Wall::solid(WallId(2), Point2::new(10.0, 0.0), Point2::new(10.0, 10.0));
        graph.walls.insert(w1.id, w1);
        graph.walls.insert(w2.id, w2);

        let e1 = graph.insert_edge(WallId(1), 0.0, 1.0).unwrap();
        let e2 = graph.insert_edge(WallId(2), 0.0, 1.0).unwrap();
        let shared = graph.edge(e1).unwrap().b;
        assert_eq!(graph.degree(shared), 2);

        graph.remove_edge(e1);
        assert!(graph.vertex_point(shared).is_some());
        assert_eq!(graph.degree(shared), 1);
        graph.remove_edge(e2);
        assert_eq!(graph.vertex_count(), 0);
    }
}
