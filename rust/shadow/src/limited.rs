// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trimming of limited ("terrain") occluders.
//!
//! A limited occluder must not re-shadow area that a normal occluder
//! between it and the source already shadows. The portion of the
//! limited occluder's face covered by a blocker's silhouette is cut
//! away, and only the remaining sub-faces cast further.
//!
//! The cut happens in the limited occluder's own vertical plane: each
//! relevant blocker is clipped to its in-front portion, its silhouette
//! corners are ray-cast onto the plane, and the resulting local
//! polygons are subtracted from the occluder's local quad. The
//! remainder comes back as vertical-strip sub-faces (x-extent along the
//! wall, constant top/bottom elevation per strip).

use log::debug;
use umbra_core::contour::{clean_contour, point_in_contour, signed_area, Contour};
use umbra_core::quant::{round_point2, COORD_EPS};
use umbra_core::segment::{intersect_segments, line_line_intersection, orient};
use umbra_core::{bool2d, Point2, Point3, Segment2, Source};

use crate::plane::{ReferencePlane, VerticalFrame};
use crate::project::OccluderFace;

/// Returns the sub-faces of `limited` that still cast after every
/// blocker's shadow on the face is removed. With no interfering
/// blockers the face comes back unchanged; a fully covered face yields
/// an empty set.
pub fn trim_limited_occluder(
    limited: &OccluderFace,
    blockers: &[OccluderFace],
    source: &Source,
    plane: &ReferencePlane,
) -> Vec<OccluderFace> {
    let identity = || vec![limited.clone()];

    if blockers.is_empty() || !source.casts_shadows() || !limited.top_z.is_finite() {
        return identity();
    }
    let seg = limited.segment();
    if seg.is_degenerate() {
        return identity();
    }
    let frame = match VerticalFrame::along(&limited.a, &limited.b, plane) {
        Some(f) => f,
        None => return identity(),
    };

    let top = plane.height_of(limited.top_z);
    let bottom = plane.height_of(limited.bottom_z).max(0.0);
    if top <= bottom {
        return Vec::new();
    }
    let len = seg.length();
    let quad: Contour = vec![
        Point2::new(0.0, bottom),
        Point2::new(len, bottom),
        Point2::new(len, top),
        Point2::new(0.0, top),
    ];

    // Collinear source sees the face edge-on; nothing meaningful to cut.
    let source_side = orient(&limited.a, &limited.b, &source.position);
    if source_side.abs() <= f64::EPSILON * len.max(1.0) {
        return identity();
    }

    let triangle: Contour = vec![source.position, limited.a, limited.b];
    let source3 = Point3::new(source.position.x, source.position.y, source.elevation);

    let mut cast_shadows: Vec<Contour> = Vec::new();
    for blocker in blockers {
        if !in_visibility_triangle(blocker, &triangle) {
            continue;
        }
        let clipped = match clip_to_front(blocker, &seg, source_side) {
            Some(c) => c,
            None => continue,
        };
        if let Some(local) =
            silhouette_on_face(&clipped, blocker, source, &source3, &frame, plane, top)
        {
            let cleaned = clean_contour(&local);
            if !cleaned.is_empty() {
                cast_shadows.push(cleaned);
            }
        }
    }

    if cast_shadows.is_empty() {
        return identity();
    }

    let remainder = bool2d::difference(&bool2d::contours_to_shapes(&[quad]), &cast_shadows);
    if remainder.is_empty() {
        debug!("limited occluder fully covered by blockers");
        return Vec::new();
    }

    remainder
        .iter()
        .flat_map(|shape| sub_faces(limited, &frame, plane, shape))
        .collect()
}

/// A blocker interferes only when it reaches into the triangle spanned
/// by the source and the limited occluder's endpoints.
fn in_visibility_triangle(blocker: &OccluderFace, triangle: &Contour) -> bool {
    if point_in_contour(&blocker.a, triangle) || point_in_contour(&blocker.b, triangle) {
        return true;
    }
    let seg = blocker.segment();
    let n = triangle.len();
    (0..n).any(|i| {
        let side = Segment2::new(triangle[i], triangle[(i + 1) % n]);
        intersect_segments(&seg, &side, COORD_EPS).is_some()
    })
}

/// Clips the blocker's footprint segment to the part on the source's
/// side of the limited occluder's line. `None` when the blocker is
/// entirely behind.
fn clip_to_front(
    blocker: &OccluderFace,
    limited_seg: &Segment2,
    source_side: f64,
) -> Option<Segment2> {
    let front = |p: &Point2<f64>| orient(&limited_seg.a, &limited_seg.b, p) * source_side > 0.0;
    let (fa, fb) = (front(&blocker.a), front(&blocker.b));
    match (fa, fb) {
        (true, true) => Some(blocker.segment()),
        (false, false) => None,
        _ => {
            let cross = line_line_intersection(&blocker.segment(), limited_seg)?;
            if fa {
                Some(Segment2::new(blocker.a, cross))
            } else {
                Some(Segment2::new(cross, blocker.b))
            }
        }
    }
}

/// The blocker's silhouette polygon in the limited occluder's local
/// plane coordinates. A blocker top at or above the source blocks all
/// the way up, so its silhouette extends to the face's top.
fn silhouette_on_face(
    clipped: &Segment2,
    blocker: &OccluderFace,
    source: &Source,
    source3: &Point3<f64>,
    frame: &VerticalFrame,
    plane: &ReferencePlane,
    face_top: f64,
) -> Option<Contour> {
    if clipped.is_degenerate() {
        return None;
    }
    // An open bottom grounds at the reference plane.
    let bottom_z = blocker.bottom_z.max(plane.elevation);
    let lb0 = frame.cast_onto(source3, &Point3::new(clipped.a.x, clipped.a.y, bottom_z))?;
    let lb1 = frame.cast_onto(source3, &Point3::new(clipped.b.x, clipped.b.y, bottom_z))?;

    if blocker.top_z >= source.elevation {
        return Some(vec![
            lb0,
            lb1,
            round_point2(&Point2::new(lb1.x, face_top)),
            round_point2(&Point2::new(lb0.x, face_top)),
        ]);
    }

    let lt0 = frame.cast_onto(source3, &Point3::new(clipped.a.x, clipped.a.y, blocker.top_z))?;
    let lt1 = frame.cast_onto(source3, &Point3::new(clipped.b.x, clipped.b.y, blocker.top_z))?;
    Some(vec![lb0, lb1, lt1, lt0])
}

/// Converts one remainder shape (local coordinates, holes included)
/// back into sub-faces of the limited occluder.
///
/// The shape is cut into vertical strips at every vertex x, so within a
/// strip the top and bottom run straight. Each strip piece becomes one
/// face spanning the strip's inscribed rectangle: a slanted span is
/// inscribed, never circumscribed, so trimmed face area never re-casts.
fn sub_faces(
    limited: &OccluderFace,
    frame: &VerticalFrame,
    plane: &ReferencePlane,
    shape: &bool2d::Shape,
) -> Vec<OccluderFace> {
    let mut xs: Vec<f64> = shape.iter().flatten().map(|p| p.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    xs.dedup_by(|a, b| (*a - *b).abs() <= COORD_EPS);
    let (min_y, max_y) = shape
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });

    let mut out = Vec::new();
    for pair in xs.windows(2) {
        let (x0, x1) = (pair[0], pair[1]);
        if x1 - x0 <= COORD_EPS {
            continue;
        }
        let strip: Contour = vec![
            Point2::new(x0, min_y - 1.0),
            Point2::new(x1, min_y - 1.0),
            Point2::new(x1, max_y + 1.0),
            Point2::new(x0, max_y + 1.0),
        ];
        for piece in bool2d::intersect(&[shape.clone()], &[strip]) {
            if let Some(face) = strip_face(limited, frame, plane, x0, x1, &piece[0]) {
                out.push(face);
            }
        }
    }
    out
}

/// The inscribed rectangle of one strip piece as a face. The piece has
/// vertices only on the strip's two sides, so the rectangle runs from
/// the higher bottom corner to the lower top corner.
fn strip_face(
    limited: &OccluderFace,
    frame: &VerticalFrame,
    plane: &ReferencePlane,
    x0: f64,
    x1: f64,
    contour: &Contour,
) -> Option<OccluderFace> {
    if contour.len() < 3 || signed_area(contour).abs() <= umbra_core::contour::MIN_AREA_THRESHOLD {
        return None;
    }
    let mid = 0.5 * (x0 + x1);
    let (mut left_top, mut left_bot) = (f64::NEG_INFINITY, f64::INFINITY);
    let (mut right_top, mut right_bot) = (f64::NEG_INFINITY, f64::INFINITY);
    for p in contour {
        if p.x <= mid {
            left_top = left_top.max(p.y);
            left_bot = left_bot.min(p.y);
        } else {
            right_top = right_top.max(p.y);
            right_bot = right_bot.min(p.y);
        }
    }
    let top = left_top.min(right_top);
    let bottom = left_bot.max(right_bot);
    if top - bottom <= COORD_EPS {
        return None;
    }
    let (a, _) = frame.from_local(&Point2::new(x0, 0.0));
    let (b, _) = frame.from_local(&Point2::new(x1, 0.0));
    Some(OccluderFace {
        a,
        b,
        top_z: (plane.elevation + top).min(limited.top_z),
        bottom_z: (plane.elevation + bottom).max(limited.bottom_z),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn limited() -> OccluderFace {
        OccluderFace {
            a: Point2::new(0.0, 0.0),
            b: Point2::new(10.0, 0.0),
            top_z: 10.0,
            bottom_z: f64::NEG_INFINITY,
        }
    }

    fn source() -> Source {
        Source::new(Point2::new(5.0, -10.0), 20.0)
    }

    fn plane() -> ReferencePlane {
        ReferencePlane::ground()
    }

    fn blocker(ax: f64, ay: f64, bx: f64, by: f64, top_z: f64) -> OccluderFace {
        OccluderFace {
            a: Point2::new(ax, ay),
            b: Point2::new(bx, by),
            top_z,
            bottom_z: f64::NEG_INFINITY,
        }
    }

    #[test]
    fn no_blockers_is_identity() {
        let faces = trim_limited_occluder(&limited(), &[], &source(), &plane());
        assert_eq!(faces, vec![limited()]);
    }

    #[test]
    fn tall_blocker_splits_the_face() {
        // A tall blocker halfway between the source and the face covers
        // the middle of the face; two side remnants survive.
        let b = blocker(4.0, -5.0, 6.0, -5.0, 100.0);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());

        assert_eq!(faces.len(), 2);
        let mut spans: Vec<(f64, f64)> = faces.iter().map(|f| (f.a.x, f.b.x)).collect();
        spans.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert_relative_eq!(spans[0].0, 0.0, epsilon = 1e-3);
        assert_relative_eq!(spans[0].1, 3.0, epsilon = 1e-3);
        assert_relative_eq!(spans[1].0, 7.0, epsilon = 1e-3);
        assert_relative_eq!(spans[1].1, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn covering_blocker_removes_the_face() {
        let b = blocker(-1.0, -5.0, 11.0, -5.0, 100.0);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());
        assert!(faces.is_empty());
    }

    #[test]
    fn blocker_behind_the_face_is_ignored() {
        let b = blocker(4.0, 5.0, 6.0, 5.0, 100.0);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());
        assert_eq!(faces, vec![limited()]);
    }

    #[test]
    fn blocker_outside_visibility_triangle_is_ignored() {
        let b = blocker(40.0, -5.0, 50.0, -5.0, 100.0);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());
        assert_eq!(faces, vec![limited()]);
    }

    #[test]
    fn short_blocker_does_not_remove_the_face() {
        // A blocker with a finite top below the source cuts a notch
        // from the bottom of the face; the face keeps casting and its
        // top stays intact.
        let b = blocker(4.0, -1.0, 6.0, -1.0, 5.0);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());

        assert!(!faces.is_empty());
        assert!(faces.iter().any(|f| f.top_z >= 10.0 - 1e-6));
    }

    #[test]
    fn distant_short_blocker_silhouette_misses_the_face() {
        // The blocker top is low and far from the face: rays over it
        // land below the reference plane before reaching the face, so
        // nothing is trimmed.
        let b = blocker(4.0, -5.0, 6.0, -5.0, 10.0);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());
        assert_eq!(faces, vec![limited()]);
    }

    #[test]
    fn slanted_silhouette_does_not_recast_covered_spans() {
        // Blocker endpoints at different distances from the source, so
        // its silhouette top slants across the face (local tops 5 and
        // 10.625, crossing the face top inside the covered x-range).
        // No remnant may reach into the covered span.
        let b = blocker(3.0, -5.0, 6.0, -2.0, 12.5);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());

        assert!(!faces.is_empty());
        for f in &faces {
            assert!(
                f.b.x <= 1.0 + 1e-3 || f.a.x >= 6.25 - 1e-3,
                "remnant {:?} overlaps the silhouette",
                f
            );
        }
    }

    #[test]
    fn floating_blocker_leaves_only_the_band_below() {
        // A blocker with a raised bottom shades the face from local
        // elevation 3.33 upward; the middle span survives only below.
        let mut b = blocker(4.0, -1.0, 6.0, -1.0, 100.0);
        b.bottom_z = 5.0;
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());

        let mid: Vec<&OccluderFace> = faces
            .iter()
            .filter(|f| f.a.x > 3.0 && f.b.x < 7.0)
            .collect();
        assert!(!mid.is_empty());
        for f in mid {
            assert!(f.top_z <= 3.3334);
        }
    }

    #[test]
    fn straddling_blocker_uses_front_part_only() {
        // Crosses the face's line; the behind part must not contribute.
        // The front part is edge-on from the source, so nothing is cut.
        let b = blocker(5.0, -5.0, 5.0, 5.0, 100.0);
        let faces = trim_limited_occluder(&limited(), &[b], &source(), &plane());
        assert_eq!(faces, vec![limited()]);
    }
}
