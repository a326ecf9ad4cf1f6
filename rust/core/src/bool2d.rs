// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D polygon boolean operations over the i_overlay crate.
//!
//! The union entry point uses the non-zero winding rule on
//! same-orientation inputs. This is mandatory for shadow combination:
//! an even-odd union of overlapping shadow quads cancels where an even
//! number of shadows stack, producing checkerboard gaps in what should
//! be solid shadow.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

use crate::contour::{
    clean_contour, ensure_ccw, ensure_cw, signed_area, Contour, TaggedPolygon, MIN_AREA_THRESHOLD,
};

/// One output shape: outer contour first, holes after.
pub type Shape = Vec<Contour>;

fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_contour(path: &[[f64; 2]]) -> Contour {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

fn shapes_from_raw(raw: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<Shape> {
    raw.into_iter()
        .map(|shape| shape.iter().map(|path| path_to_contour(path)).collect())
        .filter(|shape: &Shape| !shape.is_empty())
        .collect()
}

/// Unions an arbitrary pile of same-orientation contours, any-nonzero
/// winding counting as filled.
pub fn union_positive(contours: &[Contour]) -> Vec<Shape> {
    let valid: Vec<&Contour> = contours.iter().filter(|c| c.len() >= 3).collect();
    match valid.len() {
        0 => return Vec::new(),
        1 => return vec![vec![ensure_ccw(valid[0])]],
        _ => {}
    }

    let subject: Vec<Vec<[f64; 2]>> = vec![contour_to_path(&ensure_ccw(valid[0]))];
    let clip: Vec<Vec<[f64; 2]>> = valid[1..]
        .iter()
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    let raw = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
    shapes_from_raw(raw)
}

/// `subject - clip` where the subject may already carry holes.
pub fn difference(subject: &[Shape], clip: &[Contour]) -> Vec<Shape> {
    let subject_paths = shapes_to_paths(subject);
    if subject_paths.is_empty() {
        return Vec::new();
    }
    let clip_paths: Vec<Vec<[f64; 2]>> = clip
        .iter()
        .filter(|c| c.len() >= 3)
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();
    if clip_paths.is_empty() {
        return subject.to_vec();
    }
    let raw = subject_paths.overlay(&clip_paths, OverlayRule::Difference, FillRule::NonZero);
    shapes_from_raw(raw)
}

/// `subject - clip` where both sides may carry holes.
pub fn difference_shapes(subject: &[Shape], clip: &[Shape]) -> Vec<Shape> {
    let subject_paths = shapes_to_paths(subject);
    if subject_paths.is_empty() {
        return Vec::new();
    }
    let clip_paths = shapes_to_paths(clip);
    if clip_paths.is_empty() {
        return subject.to_vec();
    }
    let raw = subject_paths.overlay(&clip_paths, OverlayRule::Difference, FillRule::NonZero);
    shapes_from_raw(raw)
}

/// `subject ∪ clip` where both sides may carry holes.
pub fn union_shapes(subject: &[Shape], clip: &[Shape]) -> Vec<Shape> {
    let subject_paths = shapes_to_paths(subject);
    let clip_paths = shapes_to_paths(clip);
    if subject_paths.is_empty() {
        return clip.to_vec();
    }
    if clip_paths.is_empty() {
        return subject.to_vec();
    }
    let raw = subject_paths.overlay(&clip_paths, OverlayRule::Union, FillRule::NonZero);
    shapes_from_raw(raw)
}

/// `subject ∩ clip` where both sides may carry holes.
pub fn intersect_shapes(subject: &[Shape], clip: &[Shape]) -> Vec<Shape> {
    let subject_paths = shapes_to_paths(subject);
    let clip_paths = shapes_to_paths(clip);
    if subject_paths.is_empty() || clip_paths.is_empty() {
        return Vec::new();
    }
    let raw = subject_paths.overlay(&clip_paths, OverlayRule::Intersect, FillRule::NonZero);
    shapes_from_raw(raw)
}

/// `subject ∩ clip`.
pub fn intersect(subject: &[Shape], clip: &[Contour]) -> Vec<Shape> {
    let subject_paths = shapes_to_paths(subject);
    let clip_paths: Vec<Vec<[f64; 2]>> = clip
        .iter()
        .filter(|c| c.len() >= 3)
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();
    if subject_paths.is_empty() || clip_paths.is_empty() {
        return Vec::new();
    }
    let raw = subject_paths.overlay(&clip_paths, OverlayRule::Intersect, FillRule::NonZero);
    shapes_from_raw(raw)
}

/// Flattens shapes into a tagged polygon set: the first contour of each
/// shape is solid, the rest are holes. Everything is cleaned, and
/// contours below the area threshold are dropped.
pub fn shapes_to_tagged(shapes: &[Shape]) -> Vec<TaggedPolygon> {
    let mut out = Vec::new();
    for shape in shapes {
        for (i, contour) in shape.iter().enumerate() {
            let cleaned = clean_contour(contour);
            if cleaned.is_empty() || signed_area(&cleaned).abs() <= MIN_AREA_THRESHOLD {
                continue;
            }
            if i == 0 {
                out.push(TaggedPolygon::solid(ensure_ccw(&cleaned)));
            } else {
                out.push(TaggedPolygon::hole(ensure_cw(&cleaned)));
            }
        }
    }
    out
}

/// Converts a tagged set back into shape paths (outers CCW, holes CW).
fn shapes_to_paths(shapes: &[Shape]) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::new();
    for shape in shapes {
        for (i, contour) in shape.iter().enumerate() {
            if contour.len() < 3 {
                continue;
            }
            let oriented = if i == 0 {
                ensure_ccw(contour)
            } else {
                ensure_cw(contour)
            };
            paths.push(contour_to_path(&oriented));
        }
    }
    paths
}

/// Wraps loose solid contours as hole-free shapes.
pub fn contours_to_shapes(contours: &[Contour]) -> Vec<Shape> {
    contours
        .iter()
        .filter(|c| c.len() >= 3)
        .map(|c| vec![c.clone()])
        .collect()
}

/// Extracts every solid outer contour of a tagged set.
pub fn solid_contours(polygons: &[TaggedPolygon]) -> Vec<Contour> {
    polygons
        .iter()
        .filter(|p| !p.is_hole)
        .map(|p| p.points.clone())
        .collect()
}

/// Rebuilds shapes from a tagged set by nesting each hole under the
/// solid that contains it.
pub fn tagged_to_shapes(polygons: &[TaggedPolygon]) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = polygons
        .iter()
        .filter(|p| !p.is_hole)
        .map(|p| vec![p.points.clone()])
        .collect();
    for hole in polygons.iter().filter(|p| p.is_hole) {
        if let Some(owner) = shapes
            .iter_mut()
            .find(|s| crate::contour::contour_inside_contour(&hole.points, &s[0]))
        {
            owner.push(hole.points.clone());
        }
    }
    shapes
}
