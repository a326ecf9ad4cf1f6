// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shadow projection of one vertical occluder face.
//!
//! With the source at height `ve` above the reference plane and the
//! occluder top at `te`, a ray from the source over the top edge meets
//! the plane at `ve / (ve - te)` times the horizontal distance to the
//! occluder. Each endpoint gets its own hypotenuse scale from the same
//! ratio, which is the similar-triangles construction over the
//! perpendicular foot without computing the foot explicitly.
//!
//! Degenerate configurations return `None` — a missing shadow for one
//! pathological occluder must not prevent rendering the rest.

use umbra_core::quant::{round_point2, COORD_EPS};
use umbra_core::segment::orient;
use umbra_core::{Contour, Point2, Point3, Segment2, Source, Wall};

use crate::plane::ReferencePlane;

/// The vertical face of one occluder: 2D footprint segment plus its
/// elevation span. Immutable; rebuilt whenever the wall changes.
#[derive(Debug, Clone, PartialEq)]
pub struct OccluderFace {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    pub top_z: f64,
    pub bottom_z: f64,
}

impl OccluderFace {
    pub fn from_wall(wall: &Wall) -> Self {
        Self {
            a: wall.a,
            b: wall.b,
            top_z: wall.top_z,
            bottom_z: wall.bottom_z,
        }
    }

    pub fn segment(&self) -> Segment2 {
        Segment2::new(self.a, self.b)
    }

    /// The four 3D corners: A-top, A-bottom, B-top, B-bottom.
    pub fn corners(&self) -> [Point3<f64>; 4] {
        [
            Point3::new(self.a.x, self.a.y, self.top_z),
            Point3::new(self.a.x, self.a.y, self.bottom_z),
            Point3::new(self.b.x, self.b.y, self.top_z),
            Point3::new(self.b.x, self.b.y, self.bottom_z),
        ]
    }
}

/// The shadow quadrilateral this face casts on the reference plane, or
/// `None` when no shadow exists:
/// - the source does not cast (infinite elevation) or sits at/below the
///   plane or at/below the occluder top (the area beyond is uniformly
///   blocked, not shadowed);
/// - the face does not rise above the plane;
/// - the segment is degenerate or the source is collinear with it.
pub fn project_shadow(
    face: &OccluderFace,
    source: &Source,
    plane: &ReferencePlane,
) -> Option<Contour> {
    if !source.casts_shadows() {
        return None;
    }
    let ve = plane.height_of(source.elevation);
    let te = plane.height_of(face.top_z);
    if ve <= 0.0 || te <= 0.0 || ve <= te {
        return None;
    }

    let seg = face.segment();
    if seg.is_degenerate() {
        return None;
    }
    // Edge-on view: the face has no visible extent from the source.
    if orient(&face.a, &face.b, &source.position).abs() <= COORD_EPS * seg.length() {
        return None;
    }

    let pos = source.position;
    let k_top = ve / (ve - te);
    let far_a = round_point2(&(pos + (face.a - pos) * k_top));
    let far_b = round_point2(&(pos + (face.b - pos) * k_top));

    // A raised bottom lets light pass underneath: the near edge starts
    // where rays over the bottom edge land, not at the footprint.
    let be = plane.height_of(face.bottom_z).max(0.0);
    let (near_a, near_b) = if be > 0.0 {
        let k_bot = ve / (ve - be);
        (
            round_point2(&(pos + (face.a - pos) * k_bot)),
            round_point2(&(pos + (face.b - pos) * k_bot)),
        )
    } else {
        (round_point2(&face.a), round_point2(&face.b))
    };

    Some(vec![near_a, far_a, far_b, near_b])
}
