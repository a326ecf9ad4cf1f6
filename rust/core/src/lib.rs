// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # umbra-core
//!
//! Shared geometry primitives for the umbra shadow engine: coordinate
//! quantization, 2D segment collision math, contour utilities, polygon
//! boolean operations, and the wall/source/region input records the
//! engine consumes from its host scene.

pub mod bool2d;
pub mod bounds;
pub mod contour;
pub mod error;
pub mod quant;
pub mod segment;
pub mod wall;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use bounds::Aabb;
pub use contour::{Contour, TaggedPolygon};
pub use error::{Error, Result};
pub use quant::QuantKey;
pub use segment::{Segment2, SegmentHit};
pub use wall::{
    DirectionConstraint, ElevationSource, FlatGround, Region, SenseBlocking, SenseTable, Source,
    SourceKind, Wall, WallId,
};
