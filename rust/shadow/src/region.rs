// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Region pits, the derived background ground, and multi-plane shadow
//! accumulation.
//!
//! A region whose top sits below the scene's background ground is a
//! pit: an opening down to a lower floor. The background occluder set
//! is the scene rectangle minus all pit footprints and must be rebuilt
//! whenever a pit-affecting region changes.
//!
//! When blocking volumes exist at several elevations they are processed
//! lowest top first with a running shadow accumulator. A layer above
//! the source is opaque from any angle and contributes its whole
//! footprint; a layer at or below the source gets its own reference
//! plane, with the accumulator pre-subtracted from the footprint so
//! overlapping layers are never double-shadowed.

use umbra_core::bool2d::{self, Shape};
use umbra_core::contour::Contour;
use umbra_core::{Aabb, Region, Source, SourceKind, TaggedPolygon, Wall};

use crate::limited::trim_limited_occluder;
use crate::plane::ReferencePlane;
use crate::project::{project_shadow, OccluderFace};
use crate::source::select_occluders;

/// Whether a region opens a pit below the background ground.
pub fn is_pit(region: &Region, ground_elevation: f64) -> bool {
    matches!(region.top_elevation, Some(top) if top < ground_elevation)
}

/// The derived scene background: ground everywhere except over pits.
#[derive(Debug, Clone)]
pub struct BackgroundModel {
    pub polygons: Vec<TaggedPolygon>,
    pub elevation: f64,
}

impl BackgroundModel {
    /// Recomputes the background occluder set. Called whenever any
    /// region's shape, elevation or blocking flag changes.
    pub fn rebuild(scene_rect: &Aabb, ground_elevation: f64, regions: &[Region]) -> Self {
        let ground = bool2d::contours_to_shapes(&[scene_rect.contour()]);
        let mut openings: Vec<Shape> = Vec::new();
        for region in regions {
            if is_pit(region, ground_elevation) {
                openings.extend(bool2d::tagged_to_shapes(&region.polygons));
            }
        }
        let shapes = bool2d::difference_shapes(&ground, &openings);
        Self {
            polygons: bool2d::shapes_to_tagged(&shapes),
            elevation: ground_elevation,
        }
    }

    pub fn layer(&self) -> OccluderLayer {
        OccluderLayer {
            footprint: self.polygons.clone(),
            top_elevation: self.elevation,
        }
    }
}

/// Synthesized occluder faces along a pit's rim: the drop from the
/// background ground down to the pit floor. Hole contours (islands
/// inside the pit) get rim faces too.
pub fn pit_rim_faces(region: &Region, ground_elevation: f64) -> Vec<OccluderFace> {
    let floor = match region.top_elevation {
        Some(top) if top < ground_elevation => top,
        _ => return Vec::new(),
    };
    let mut faces = Vec::new();
    for polygon in &region.polygons {
        let pts = &polygon.points;
        let n = pts.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            faces.push(OccluderFace {
                a: pts[i],
                b: pts[(i + 1) % n],
                top_z: ground_elevation,
                bottom_z: floor,
            });
        }
    }
    faces
}

/// One blocking volume in the elevation-ordered pass.
#[derive(Debug, Clone)]
pub struct OccluderLayer {
    pub footprint: Vec<TaggedPolygon>,
    pub top_elevation: f64,
}

impl OccluderLayer {
    /// A vision-blocking region becomes a layer; others do not
    /// participate.
    pub fn from_region(region: &Region) -> Option<Self> {
        let top = region.top_elevation?;
        if !region.blocks_vision {
            return None;
        }
        Some(Self {
            footprint: region.polygons.clone(),
            top_elevation: top,
        })
    }
}

/// All wall shadows cast onto one reference plane, limited occluders
/// trimmed against the normal ones first.
pub fn shadows_on_plane(
    source: &Source,
    kind: SourceKind,
    walls: &[Wall],
    plane: &ReferencePlane,
) -> Vec<Contour> {
    let set = select_occluders(walls, kind, source);
    let normal_faces: Vec<OccluderFace> =
        set.normal.iter().map(|w| OccluderFace::from_wall(w)).collect();

    let mut shadows: Vec<Contour> = Vec::new();
    for face in &normal_faces {
        shadows.extend(project_shadow(face, source, plane));
    }
    for wall in &set.limited {
        let face = OccluderFace::from_wall(wall);
        for remnant in trim_limited_occluder(&face, &normal_faces, source, plane) {
            shadows.extend(project_shadow(&remnant, source, plane));
        }
    }
    shadows
}

/// Runs the elevation-ordered accumulation over all layers, returning
/// the combined shadow shapes. An infinite-elevation source shadows
/// nothing.
pub fn accumulate_layers(
    source: &Source,
    kind: SourceKind,
    walls: &[Wall],
    layers: &[OccluderLayer],
) -> Vec<Shape> {
    if !source.casts_shadows() {
        return Vec::new();
    }

    let mut ordered: Vec<&OccluderLayer> = layers.iter().collect();
    ordered.sort_by(|a, b| {
        a.top_elevation
            .partial_cmp(&b.top_elevation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut accumulator: Vec<Shape> = Vec::new();
    for layer in ordered {
        let footprint = bool2d::tagged_to_shapes(&layer.footprint);
        if layer.top_elevation > source.elevation {
            // Opaque from any angle at this height.
            accumulator = bool2d::union_shapes(&accumulator, &footprint);
            continue;
        }

        let plane = ReferencePlane::horizontal(layer.top_elevation);
        let remaining = bool2d::difference_shapes(&footprint, &accumulator);
        if remaining.is_empty() {
            continue;
        }
        let shadows = shadows_on_plane(source, kind, walls, &plane);
        if shadows.is_empty() {
            continue;
        }
        let unioned = bool2d::union_positive(&shadows);
        let trimmed = bool2d::intersect_shapes(&unioned, &remaining);
        accumulator = bool2d::union_shapes(&accumulator, &trimmed);
    }
    accumulator
}
