// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D line segments and segment-segment collision classification.
//!
//! The splitter needs more than a yes/no intersection test: every
//! collision is reported with its parametric position on *both*
//! segments, and collinear overlaps report the 0, 1 or 2 boundary
//! points of the shared range. All parameters are clamped to `[0, 1]`.

use nalgebra::{Point2, Vector2};

use crate::bounds::Aabb;
use crate::quant::PARAM_EPS;

/// A directed 2D line segment from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
}

/// Orientation of `c` relative to the directed line `a -> b`.
///
/// Positive when `c` lies to the left, negative to the right, ~0 when
/// collinear (standard 2D cross product).
pub fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// One collision between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentHit {
    /// The segments meet at a single shared point that is an endpoint of
    /// at least one of them (within tolerance).
    Touch { t: f64, u: f64 },
    /// A proper crossing in both interiors.
    Crossing { t: f64, u: f64 },
    /// Collinear overlap. `t0 <= t1` are the overlap boundary parameters
    /// on the probe, `u0`/`u1` the corresponding parameters on the
    /// target (not necessarily sorted — the target may run the other
    /// way).
    Overlap { t0: f64, t1: f64, u0: f64, u1: f64 },
}

impl Segment2 {
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self { a, b }
    }

    pub fn delta(&self) -> Vector2<f64> {
        self.b - self.a
    }

    pub fn length(&self) -> f64 {
        self.delta().norm()
    }

    /// Zero-length segments cannot participate in collisions or tracing.
    pub fn is_degenerate(&self) -> bool {
        self.length() <= PARAM_EPS
    }

    /// Point at parameter `t` (0 = `a`, 1 = `b`).
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        self.a + self.delta() * t
    }

    pub fn midpoint(&self) -> Point2<f64> {
        self.point_at(0.5)
    }

    /// Direction angle in radians, in `(-pi, pi]`.
    pub fn angle(&self) -> f64 {
        let d = self.delta();
        d.y.atan2(d.x)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_corners(self.a, self.b)
    }

    /// Parameter of the closest point on the *infinite* line through
    /// this segment to `p` (unclamped).
    pub fn line_param_of(&self, p: &Point2<f64>) -> f64 {
        let d = self.delta();
        let len_sq = d.norm_squared();
        if len_sq <= PARAM_EPS * PARAM_EPS {
            return 0.0;
        }
        (p - self.a).dot(&d) / len_sq
    }

    /// Foot of the perpendicular from `p` onto the infinite line.
    pub fn perpendicular_foot(&self, p: &Point2<f64>) -> Point2<f64> {
        self.point_at(self.line_param_of(p))
    }
}

/// Intersection point of the infinite lines through `a` and `b`, or
/// `None` when (nearly) parallel.
pub fn line_line_intersection(a: &Segment2, b: &Segment2) -> Option<Point2<f64>> {
    let d1 = a.delta();
    let d2 = b.delta();
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() <= PARAM_EPS {
        return None;
    }
    let w = b.a - a.a;
    let t = (w.x * d2.y - w.y * d2.x) / denom;
    Some(a.point_at(t))
}

/// Classifies the collision between `probe` and `target`.
///
/// `tol` is an absolute coordinate tolerance used to decide whether a
/// single-point hit counts as an endpoint touch. Returns `None` when
/// the segments do not meet.
pub fn intersect_segments(probe: &Segment2, target: &Segment2, tol: f64) -> Option<SegmentHit> {
    if probe.is_degenerate() || target.is_degenerate() {
        return None;
    }

    let d1 = probe.delta();
    let d2 = target.delta();
    let denom = d1.x * d2.y - d1.y * d2.x;
    let w = target.a - probe.a;

    // Relative threshold: treat as parallel when the cross of the
    // directions is negligible against the segment scales.
    let scale = d1.norm() * d2.norm();
    if denom.abs() <= PARAM_EPS * scale.max(1.0) {
        return collinear_overlap(probe, target, tol);
    }

    let t = (w.x * d2.y - w.y * d2.x) / denom;
    let u = (w.x * d1.y - w.y * d1.x) / denom;

    // Allow a little slack so hits at endpoints are not lost to noise.
    let t_slack = tol / d1.norm().max(PARAM_EPS);
    let u_slack = tol / d2.norm().max(PARAM_EPS);
    if t < -t_slack || t > 1.0 + t_slack || u < -u_slack || u > 1.0 + u_slack {
        return None;
    }

    let t = t.clamp(0.0, 1.0);
    let u = u.clamp(0.0, 1.0);

    let endpointish = |v: f64, slack: f64| v <= slack || v >= 1.0 - slack;
    if endpointish(t, t_slack) || endpointish(u, u_slack) {
        Some(SegmentHit::Touch { t, u })
    } else {
        Some(SegmentHit::Crossing { t, u })
    }
}

/// Resolves the collinear/parallel branch: either no contact, a single
/// shared endpoint, or a proper overlap range.
fn collinear_overlap(probe: &Segment2, target: &Segment2, tol: f64) -> Option<SegmentHit> {
    // Parallel but offset lines never meet.
    let off = orient(&probe.a, &probe.b, &target.a).abs() / probe.length().max(PARAM_EPS);
    if off > tol {
        return None;
    }

    // Project target endpoints onto the probe's parameter space.
    let ua = probe.line_param_of(&target.a);
    let ub = probe.line_param_of(&target.b);
    let (lo, hi) = if ua <= ub { (ua, ub) } else { (ub, ua) };

    let t0 = lo.max(0.0);
    let t1 = hi.min(1.0);
    let span_tol = tol / probe.length().max(PARAM_EPS);
    if t1 < t0 - span_tol {
        return None;
    }

    if (t1 - t0).abs() <= span_tol {
        // Endpoint-to-endpoint touch.
        let t = t0.clamp(0.0, 1.0);
        let u = target.line_param_of(&probe.point_at(t)).clamp(0.0, 1.0);
        return Some(SegmentHit::Touch { t, u });
    }

    let u0 = target.line_param_of(&probe.point_at(t0)).clamp(0.0, 1.0);
    let u1 = target.line_param_of(&probe.point_at(t1)).clamp(0.0, 1.0);
    Some(SegmentHit::Overlap { t0, t1, u0, u1 })
}
