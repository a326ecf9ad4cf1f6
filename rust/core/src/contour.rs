// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simple polygon (contour) utilities.
//!
//! A contour is an ordered list of vertices without an explicit closing
//! point. [`TaggedPolygon`] is the public output type of the shadow
//! pipeline: a contour plus its hole flag, where holes are always
//! nested inside some non-hole polygon of the same set.

use nalgebra::Point2;

use crate::bounds::Aabb;
use crate::error::{Error, Result};

/// An ordered polygon boundary (not explicitly closed).
pub type Contour = Vec<Point2<f64>>;

/// Polygons smaller than this are considered degenerate noise.
pub const MIN_AREA_THRESHOLD: f64 = 1e-6;

/// Epsilon used when collapsing near-duplicate consecutive vertices.
pub const CLEAN_EPS: f64 = 1e-4;

/// A contour tagged as solid or hole.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedPolygon {
    pub points: Contour,
    pub is_hole: bool,
}

impl TaggedPolygon {
    pub fn solid(points: Contour) -> Self {
        Self {
            points,
            is_hole: false,
        }
    }

    pub fn hole(points: Contour) -> Self {
        Self {
            points,
            is_hole: true,
        }
    }

    /// Unsigned area of this contour.
    pub fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }
}

/// Net filled area of a tagged set (solids minus holes).
pub fn filled_area(polygons: &[TaggedPolygon]) -> f64 {
    polygons
        .iter()
        .map(|p| if p.is_hole { -p.area() } else { p.area() })
        .sum()
}

/// Signed area: positive for counter-clockwise winding.
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }
    let n = contour.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }
    area * 0.5
}

/// Returns the contour with counter-clockwise winding.
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Contour {
    if signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Returns the contour with clockwise winding.
pub fn ensure_cw(contour: &[Point2<f64>]) -> Contour {
    if signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ray-cast point-in-polygon test (boundary behavior unspecified).
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }
    let n = contour.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Checks the contract every polygon input must satisfy: at least
/// three vertices, all coordinates finite.
pub fn validate_contour(contour: &[Point2<f64>]) -> Result<()> {
    for p in contour {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(Error::NonFiniteCoordinate(format!("({}, {})", p.x, p.y)));
        }
    }
    if contour.len() < 3 {
        return Err(Error::InvalidPolygon(format!(
            "{} vertices, need at least 3",
            contour.len()
        )));
    }
    Ok(())
}

/// Returns `true` if every vertex of `inner` lies inside `outer`.
pub fn contour_inside_contour(inner: &[Point2<f64>], outer: &[Point2<f64>]) -> bool {
    !inner.is_empty() && inner.iter().all(|p| point_in_contour(p, outer))
}

/// Removes near-duplicate consecutive vertices (the combiner's "clean"
/// step). Degenerate results collapse to an empty contour.
pub fn clean_contour(contour: &[Point2<f64>]) -> Contour {
    let mut result: Contour = Vec::with_capacity(contour.len());
    for p in contour {
        if let Some(last) = result.last() {
            if (p - last).norm() <= CLEAN_EPS {
                continue;
            }
        }
        result.push(*p);
    }
    // Closing duplicate
    while result.len() > 1 {
        let first = result[0];
        let last = result[result.len() - 1];
        if (first - last).norm() <= CLEAN_EPS {
            result.pop();
        } else {
            break;
        }
    }
    if result.len() < 3 || signed_area(&result).abs() <= MIN_AREA_THRESHOLD {
        return Vec::new();
    }
    result
}

/// Drops vertices collinear with their neighbors.
pub fn simplify_contour(contour: &[Point2<f64>], epsilon: f64) -> Contour {
    if contour.len() <= 3 {
        return contour.to_vec();
    }
    let n = contour.len();
    let mut result = Vec::with_capacity(n);
    for i in 0..n {
        let prev = &contour[(i + n - 1) % n];
        let curr = &contour[i];
        let next = &contour[(i + 1) % n];
        let cross = (curr.x - prev.x) * (next.y - prev.y) - (curr.y - prev.y) * (next.x - prev.x);
        if cross.abs() > epsilon {
            result.push(*curr);
        }
    }
    if result.len() < 3 {
        return contour.to_vec();
    }
    result
}

/// Bounding box of a contour, or `None` if empty.
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<Aabb> {
    Aabb::from_points(contour)
}

/// Same vertex cycle regardless of starting offset and direction.
pub fn same_cycle(a: &[Point2<f64>], b: &[Point2<f64>], tol: f64) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return a.len() == b.len();
    }
    let n = a.len();
    let matches_from = |offset: usize, reversed: bool| {
        (0..n).all(|i| {
            let bi = if reversed {
                (offset + n - i) % n
            } else {
                (offset + i) % n
            };
            (a[i] - b[bi]).norm() <= tol
        })
    };
    (0..n).any(|off| matches_from(off, false) || matches_from(off, true))
}
