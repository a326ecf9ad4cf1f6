// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference planes and the in-plane coordinate frame of a vertical
//! occluder.
//!
//! Shadows always land on a horizontal reference plane — the scene
//! ground, or a region's own top when layered regions are processed.
//! Elevations are normalized relative to the plane before any
//! projective arithmetic. Every coordinate produced by a transform is
//! rounded to the fixed transform precision so endpoints that should
//! coincide compare exactly equal.

use umbra_core::quant::{round_places, round_point2, TRANSFORM_PLACES};
use umbra_core::{Point2, Point3, Vector2};

/// A horizontal plane shadows are projected onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePlane {
    pub elevation: f64,
}

impl ReferencePlane {
    /// The scene ground at elevation zero.
    pub fn ground() -> Self {
        Self { elevation: 0.0 }
    }

    pub fn horizontal(elevation: f64) -> Self {
        Self { elevation }
    }

    /// Height of an absolute elevation above this plane.
    pub fn height_of(&self, z: f64) -> f64 {
        z - self.elevation
    }

    /// Lifts a 2D point into 3D at an absolute elevation.
    pub fn lift(&self, p: &Point2<f64>, z: f64) -> Point3<f64> {
        Point3::new(p.x, p.y, z)
    }
}

/// Orthonormal 2D frame on the vertical plane through a wall segment.
///
/// Local x runs along the wall from its A endpoint, local y is absolute
/// elevation normalized to the reference plane. Used by limited
/// occluder trimming, where blocker silhouettes are intersected against
/// the occluder's own face in these coordinates.
#[derive(Debug, Clone, Copy)]
pub struct VerticalFrame {
    origin: Point2<f64>,
    /// Unit direction along the wall.
    dir: Vector2<f64>,
    /// In-plane 2D normal of the wall line.
    normal: Vector2<f64>,
    plane_elevation: f64,
}

impl VerticalFrame {
    /// Frame along `a -> b`, or `None` for a degenerate segment.
    pub fn along(a: &Point2<f64>, b: &Point2<f64>, plane: &ReferencePlane) -> Option<Self> {
        let delta = b - a;
        let len = delta.norm();
        if len <= f64::EPSILON {
            return None;
        }
        let dir = delta / len;
        Some(Self {
            origin: *a,
            dir,
            normal: Vector2::new(-dir.y, dir.x),
            plane_elevation: plane.elevation,
        })
    }

    /// Local coordinates of a 3D point assumed to lie on the frame's
    /// vertical plane.
    pub fn to_local(&self, p: &Point3<f64>) -> Point2<f64> {
        let flat = Point2::new(p.x, p.y);
        round_point2(&Point2::new(
            (flat - self.origin).dot(&self.dir),
            p.z - self.plane_elevation,
        ))
    }

    /// Back from local coordinates to a 2D scene point plus absolute
    /// elevation.
    pub fn from_local(&self, local: &Point2<f64>) -> (Point2<f64>, f64) {
        let p = self.origin + self.dir * local.x;
        (
            round_point2(&p),
            round_places(local.y + self.plane_elevation, TRANSFORM_PLACES),
        )
    }

    /// Casts a ray from `source` through `corner` and intersects it
    /// with this vertical plane, returning local coordinates. `None`
    /// when the ray is parallel to the plane or the plane lies behind
    /// the source.
    pub fn cast_onto(&self, source: &Point3<f64>, corner: &Point3<f64>) -> Option<Point2<f64>> {
        let s = Point2::new(source.x, source.y);
        let c = Point2::new(corner.x, corner.y);
        let denom = (c - s).dot(&self.normal);
        if denom.abs() <= f64::EPSILON {
            return None;
        }
        let t = (self.origin - s).dot(&self.normal) / denom;
        if t <= 0.0 {
            return None;
        }
        let hit = source + (corner - source) * t;
        Some(self.to_local(&hit))
    }
}
