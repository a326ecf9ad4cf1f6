// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face tracing: the minimal closed boundary enclosing a query point,
//! plus any hole polygons nested inside it.
//!
//! A westward ray from the query point picks candidate boundary edges
//! nearest-first. From each candidate, a clockwise keep-right walk runs
//! over the connected set: at every vertex the walk leaves along the
//! edge whose direction is the smallest clockwise rotation from the
//! reversed incoming direction. A walk that re-enters a directed edge
//! it already used has closed a cycle; re-entering the same edge in the
//! opposite direction means the walk doubled back along the inside of
//! the boundary and that branch is rejected. The walk state machine is
//! iterative — no call-stack recursion.

use rustc_hash::FxHashSet;
use umbra_core::bool2d;
use umbra_core::contour::{
    clean_contour, point_in_contour, same_cycle, signed_area, Contour, TaggedPolygon,
};
use umbra_core::Point2;

use crate::graph::WallGraph;
use crate::keys::{EdgeKey, VertexKey};

/// A traced closed boundary and the edges it runs along.
#[derive(Debug, Clone)]
pub struct TracedFace {
    pub points: Contour,
    pub edges: FxHashSet<EdgeKey>,
}

impl TracedFace {
    pub fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }
}

/// A directed traversal of one edge: `true` = A→B.
type DirectedEdge = (EdgeKey, bool);

impl WallGraph {
    /// The minimal closed polygon (from the connected set) enclosing
    /// `origin`, or `None` when the point is not inside any closed
    /// figure.
    pub fn encompassing_polygon(&self, origin: &Point2<f64>) -> Option<Contour> {
        self.encompassing_face(origin).map(|f| f.points)
    }

    /// Like [`encompassing_polygon`](Self::encompassing_polygon), also
    /// reporting the boundary's edge set for hole discovery.
    pub fn encompassing_face(&self, origin: &Point2<f64>) -> Option<TracedFace> {
        for (edge, _dist) in self.ray_west_hits(origin) {
            let forward = self.trace_loop(edge, true);
            let backward = self.trace_loop(edge, false);
            let candidate = match (
                self.accept(forward, origin),
                self.accept(backward, origin),
            ) {
                (Some(f), Some(b)) => Some(if f.area() <= b.area() { f } else { b }),
                (Some(f), None) => Some(f),
                (None, Some(b)) => Some(b),
                (None, None) => None,
            };
            // First success from the nearest candidate wins; do not
            // exhaust the remaining candidates.
            if candidate.is_some() {
                return candidate;
            }
        }
        None
    }

    /// The enclosing boundary with nested hole polygons subtracted:
    /// a solid polygon followed by its holes, or `None` when `origin`
    /// is not enclosed.
    pub fn encompassing_polygon_with_holes(
        &self,
        origin: &Point2<f64>,
    ) -> Option<Vec<TaggedPolygon>> {
        let boundary = self.encompassing_face(origin)?;

        let mut hole_contours: Vec<Contour> = Vec::new();
        let mut consumed: FxHashSet<EdgeKey> = FxHashSet::default();

        for edge in self.connected_edges() {
            if boundary.edges.contains(&edge) || consumed.contains(&edge) {
                continue;
            }
            let midpoint = match self.edge_segment(edge) {
                Some(seg) => seg.midpoint(),
                None => continue,
            };
            if !point_in_contour(&midpoint, &boundary.points) {
                continue;
            }

            let forward = self.trace_loop(edge, true);
            let backward = self.trace_loop(edge, false);
            let hole = [forward, backward]
                .into_iter()
                .flatten()
                .filter(|face| !same_cycle(&face.points, &boundary.points, 0.5))
                .filter(|face| !point_in_contour(origin, &face.points))
                .min_by(|a, b| {
                    a.area()
                        .partial_cmp(&b.area())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            if let Some(face) = hole {
                consumed.extend(face.edges.iter().copied());
                hole_contours.push(face.points);
            }
        }

        if hole_contours.is_empty() {
            return Some(vec![TaggedPolygon::solid(clean_contour(&boundary.points))]);
        }

        let union = bool2d::union_positive(&hole_contours);
        let hole_solids: Vec<Contour> = union.iter().map(|s| s[0].clone()).collect();
        let subject = bool2d::contours_to_shapes(&[boundary.points]);
        let result = bool2d::difference(&subject, &hole_solids);
        Some(bool2d::shapes_to_tagged(&result))
    }

    // --- Candidate discovery ---

    /// Connected edges crossed by the westward ray from `origin`,
    /// sorted nearest-first.
    fn ray_west_hits(&self, origin: &Point2<f64>) -> Vec<(EdgeKey, f64)> {
        let mut hits: Vec<(EdgeKey, f64)> = Vec::new();
        for edge in self.connected_edges() {
            let seg = match self.edge_segment(edge) {
                Some(s) => s,
                None => continue,
            };
            let (a, b) = (seg.a, seg.b);
            // Half-open vertical span so a vertex shared by two edges
            // counts exactly once.
            if (a.y > origin.y) == (b.y > origin.y) {
                continue;
            }
            let x = a.x + (origin.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x <= origin.x {
                hits.push((edge, origin.x - x));
            }
        }
        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        hits
    }

    // --- The clockwise walk ---

    fn accept(&self, face: Option<TracedFace>, origin: &Point2<f64>) -> Option<TracedFace> {
        let face = face?;
        if face.points.len() < 3 || !point_in_contour(origin, &face.points) {
            return None;
        }
        Some(face)
    }

    /// Walks clockwise from `edge` (direction given by `forward`) until
    /// a directed edge repeats. Returns the closed face, or `None` on a
    /// dead end or an opposite-direction revisit.
    fn trace_loop(&self, edge: EdgeKey, forward: bool) -> Option<TracedFace> {
        let mut path: Vec<DirectedEdge> = Vec::new();
        let mut visited: FxHashSet<DirectedEdge> = FxHashSet::default();
        let mut current: DirectedEdge = (edge, forward);
        let step_cap = 2 * self.edge_count() + 1;

        for _ in 0..step_cap {
            let (e, fwd) = current;
            if visited.contains(&current) {
                // Cycle closed: keep the loop from the first occurrence.
                let start = path.iter().position(|&d| d == current)?;
                return self.build_face(&path[start..]);
            }
            if visited.contains(&(e, !fwd)) {
                // Doubled back along the inside — reject this branch.
                return None;
            }
            visited.insert(current);
            path.push(current);

            let data = self.edge(e)?;
            let arrival: VertexKey = if fwd { data.b } else { data.a };
            let incoming_angle = if fwd {
                data.angle
            } else {
                opposite(data.angle)
            };
            // Direction pointing back where we came from.
            let back_angle = opposite(incoming_angle);

            let mut best: Option<(f64, DirectedEdge)> = None;
            for &next in self.edges_at(arrival) {
                if next == e || !self.is_connected(next) {
                    continue;
                }
                let next_data = match self.edge(next) {
                    Some(d) => d,
                    None => continue,
                };
                let leaves_from_a = next_data.a == arrival;
                let out_angle = if leaves_from_a {
                    next_data.angle
                } else {
                    opposite(next_data.angle)
                };
                let turn = clockwise_turn(back_angle, out_angle);
                if best.map(|(t, _)| turn < t).unwrap_or(true) {
                    best = Some((turn, (next, leaves_from_a)));
                }
            }
            current = best?.1;
        }
        None
    }

    fn build_face(&self, cycle: &[DirectedEdge]) -> Option<TracedFace> {
        if cycle.len() < 3 {
            return None;
        }
        let mut points: Contour = Vec::with_capacity(cycle.len());
        let mut edges: FxHashSet<EdgeKey> = FxHashSet::default();
        for &(e, fwd) in cycle {
            let data = self.edge(e)?;
            let start = if fwd { data.a } else { data.b };
            points.push(self.vertex_point(start)?);
            edges.insert(e);
        }
        // Distinct-vertex requirement: a doubled 2-edge "cycle" is not
        // a face.
        let mut distinct = points.clone();
        distinct.sort_by(|a, b| {
            (a.x, a.y)
                .partial_cmp(&(b.x, b.y))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        distinct.dedup_by(|a, b| a == b);
        if distinct.len() < 3 {
            return None;
        }
        Some(TracedFace { points, edges })
    }
}

/// Angle rotated by pi, normalized into `(-pi, pi]`.
fn opposite(angle: f64) -> f64 {
    normalize_angle(angle + std::f64::consts::PI)
}

fn normalize_angle(angle: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut a = angle % two_pi;
    if a > std::f64::consts::PI {
        a -= two_pi;
    } else if a <= -std::f64::consts::PI {
        a += two_pi;
    }
    a
}

/// Clockwise rotation carrying `from` onto `to`, in `(0, 2*pi]`.
fn clockwise_turn(from: f64, to: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut delta = (from - to) % two_pi;
    if delta <= 0.0 {
        delta += two_pi;
    }
    delta
}
