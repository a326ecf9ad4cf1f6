// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Incremental maintenance of the connected-edge set.
//!
//! An edge is *connected* when it lies on at least one cycle: removing
//! it still leaves a path between its endpoints. Only connected edges
//! can bound a closed region, so the face tracer walks exclusively over
//! this set.
//!
//! The membership test is a depth-first search with an explicit work
//! stack (no call-stack recursion — pathological wall graphs get deep).
//! A single mutation can flip the membership of edges far from the
//! mutation site (breaking one ring disconnects the whole ring), so
//! revalidation walks the affected component rather than only the
//! immediate neighbors. Because the test depends only on topology, one
//! pass over the affected component reaches the fixed point.

use rustc_hash::FxHashSet;

use crate::graph::WallGraph;
use crate::keys::{EdgeKey, VertexKey};

/// Cycle-membership state of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Just created, not yet tested.
    #[default]
    Unknown,
    /// Lies on at least one cycle.
    Connected,
    /// Tested, not on any cycle.
    NotConnected,
}

impl WallGraph {
    /// Whether an edge currently belongs to the connected set.
    pub fn is_connected(&self, edge: EdgeKey) -> bool {
        matches!(self.link_state.get(edge), Some(LinkState::Connected))
    }

    /// All edges currently in the connected set.
    pub fn connected_edges(&self) -> Vec<EdgeKey> {
        self.edges
            .keys()
            .filter(|&k| self.is_connected(k))
            .collect()
    }

    /// Tests whether `edge` lies on a cycle: its endpoints must remain
    /// reachable from each other with the edge itself banned.
    pub(crate) fn cycle_test(&self, edge: EdgeKey) -> bool {
        let data = match self.edges.get(edge) {
            Some(d) => d,
            None => return false,
        };
        let (from, to) = (data.a, data.b);

        let mut visited: FxHashSet<VertexKey> = FxHashSet::default();
        let mut stack = vec![from];
        visited.insert(from);

        while let Some(v) = stack.pop() {
            for &e in self.edges_at(v) {
                if e == edge {
                    continue;
                }
                let next = match self.other_vertex(e, v) {
                    Some(n) => n,
                    None => continue,
                };
                if next == to {
                    return true;
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Every edge in the component containing `start`.
    fn component_edges(&self, start: VertexKey) -> Vec<EdgeKey> {
        let mut edges: FxHashSet<EdgeKey> = FxHashSet::default();
        let mut visited: FxHashSet<VertexKey> = FxHashSet::default();
        let mut stack = vec![start];
        visited.insert(start);

        while let Some(v) = stack.pop() {
            for &e in self.edges_at(v) {
                edges.insert(e);
                if let Some(next) = self.other_vertex(e, v) {
                    if visited.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }
        edges.into_iter().collect()
    }

    /// Revalidates after new edges were inserted. Insertion can only
    /// promote edges into the connected set, so only edges not already
    /// connected are retested. Returns `true` if the connected set
    /// changed.
    pub(crate) fn refresh_after_insert(&mut self, new_edges: &[EdgeKey]) -> bool {
        let mut changed = false;
        let mut promoted_roots: Vec<VertexKey> = Vec::new();

        for &edge in new_edges {
            let data = match self.edges.get(edge) {
                Some(d) => d,
                None => continue, // superseded by a later split
            };
            let root = data.a;
            let on_cycle = self.cycle_test(edge);
            let state = if on_cycle {
                LinkState::Connected
            } else {
                LinkState::NotConnected
            };
            if self.link_state.get(edge).copied() != Some(state) {
                self.link_state.insert(edge, state);
                if on_cycle {
                    changed = true;
                    promoted_roots.push(root);
                }
            }
        }

        // A promoted edge may have closed a cycle through edges that
        // previously tested negative — retest its whole component.
        for root in promoted_roots {
            if self.vertices.get(root).is_none() {
                continue;
            }
            for edge in self.component_edges(root) {
                if self.is_connected(edge) {
                    continue;
                }
                if self.cycle_test(edge) {
                    self.link_state.insert(edge, LinkState::Connected);
                    changed = true;
                } else {
                    self.link_state.insert(edge, LinkState::NotConnected);
                }
            }
        }
        changed
    }

    /// Revalidates after removals. Removal can only demote edges, so
    /// connected edges in the touched components are retested. The
    /// caller passes the surviving vertices adjacent to the removed
    /// edges. Returns `true` if the connected set changed.
    pub(crate) fn refresh_after_removal(&mut self, touched: &[VertexKey]) -> bool {
        let mut changed = false;
        let mut seen_roots: FxHashSet<VertexKey> = FxHashSet::default();

        for &root in touched {
            if self.vertices.get(root).is_none() || !seen_roots.insert(root) {
                continue;
            }
            for edge in self.component_edges(root) {
                if !self.is_connected(edge) {
                    continue;
                }
                if !self.cycle_test(edge) {
                    self.link_state.insert(edge, LinkState::NotConnected);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Correctness oracle: recomputes every edge's membership from
    /// scratch and compares against the maintained states.
    #[cfg(any(test, debug_assertions))]
    pub fn verify_connectivity(&self) -> bool {
        self.edges.keys().all(|k| {
            let expected = self.cycle_test(k);
            self.is_connected(k) == expected
                && self.link_state.get(k).copied() != Some(LinkState::Unknown)
        })
    }
}
