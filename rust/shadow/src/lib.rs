// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # umbra-shadow
//!
//! Shadow geometry for a top-down scene: projection of vertical
//! occluder faces onto horizontal reference planes, trimming of limited
//! occluders against normal ones, positive-fill combination against a
//! visibility boundary, and the pit/background region model with
//! elevation-ordered multi-plane accumulation.
//!
//! Everything is synchronous pure computation over the caller's state.
//! Degenerate geometry yields empty results, never panics.

pub mod combine;
pub mod error;
pub mod limited;
pub mod plane;
pub mod project;
pub mod region;
pub mod source;

pub use combine::{combine, combined_shadow};
pub use error::{Error, Result};
pub use limited::trim_limited_occluder;
pub use plane::{ReferencePlane, VerticalFrame};
pub use project::{project_shadow, OccluderFace};
pub use region::{
    accumulate_layers, is_pit, pit_rim_faces, shadows_on_plane, BackgroundModel, OccluderLayer,
};
pub use source::{select_occluders, OccluderSet};
