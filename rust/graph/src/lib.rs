// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Incremental planar wall graph.
//!
//! Walls are registered one at a time; each registration splits the new
//! wall and any colliding edges so the graph stays a planar subdivision
//! with crossings only at shared vertices. On top of that subdivision
//! the crate maintains the connected-edge set (edges lying on a cycle)
//! and traces the minimal closed face around a query point, holes
//! included.
//!
//! All state lives in [`WallGraph`]; there is one instance per scene.

pub mod connectivity;
pub mod error;
pub mod graph;
pub mod keys;
pub mod spatial;
pub mod split;
pub mod trace;

pub use connectivity::LinkState;
pub use error::{Error, Result};
pub use graph::{EdgeData, VertexData, WallGraph};
pub use keys::{EdgeKey, VertexKey};
pub use split::WallUpdate;
pub use trace::TracedFace;
