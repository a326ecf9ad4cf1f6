// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input records consumed from scene collaborators: walls, sources and
//! regions, plus the elevation-query seam.
//!
//! These are plain values — the engine never owns or persists them. A
//! wall's elevation range uses `f64::INFINITY` / `NEG_INFINITY` for
//! unbounded tops/bottoms, and a source with infinite elevation casts
//! no shadows at all.

use nalgebra::Point2;

use crate::contour::TaggedPolygon;
use crate::segment::{orient, Segment2};

/// Stable identity of a wall across create/update/delete events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallId(pub u64);

/// What a source perceives, as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Light,
    Vision,
    Sound,
    Movement,
}

/// How strongly a wall blocks one sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenseBlocking {
    #[default]
    None,
    /// Blocks partially; requires shadow trimming against other
    /// occluders before casting (the "terrain wall" case).
    Limited,
    Normal,
}

/// Per-sense blocking flags of a wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenseTable {
    pub light: SenseBlocking,
    pub vision: SenseBlocking,
    pub sound: SenseBlocking,
    pub movement: SenseBlocking,
}

impl SenseTable {
    /// Blocks all senses at the given level.
    pub fn uniform(level: SenseBlocking) -> Self {
        Self {
            light: level,
            vision: level,
            sound: level,
            movement: level,
        }
    }

    pub fn get(&self, kind: SourceKind) -> SenseBlocking {
        match kind {
            SourceKind::Light => self.light,
            SourceKind::Vision => self.vision,
            SourceKind::Sound => self.sound,
            SourceKind::Movement => self.movement,
        }
    }
}

/// Which side(s) of the wall the blocking applies to, relative to the
/// wall's A→B direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionConstraint {
    #[default]
    Both,
    /// Blocks only sources on the left of A→B.
    Left,
    /// Blocks only sources on the right of A→B.
    Right,
}

/// An undirected 2D wall segment with a vertical elevation range.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub id: WallId,
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    pub top_z: f64,
    pub bottom_z: f64,
    pub sense: SenseTable,
    pub direction: DirectionConstraint,
}

impl Wall {
    /// A full-height wall blocking all senses — the common case.
    pub fn solid(id: WallId, a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            id,
            a,
            b,
            top_z: f64::INFINITY,
            bottom_z: f64::NEG_INFINITY,
            sense: SenseTable::uniform(SenseBlocking::Normal),
            direction: DirectionConstraint::Both,
        }
    }

    pub fn segment(&self) -> Segment2 {
        Segment2::new(self.a, self.b)
    }

    /// Blocking level of this wall against a source of `kind` at
    /// `position`, honoring the direction constraint.
    pub fn blocking_for(&self, kind: SourceKind, position: &Point2<f64>) -> SenseBlocking {
        let level = self.sense.get(kind);
        if level == SenseBlocking::None {
            return SenseBlocking::None;
        }
        let side = orient(&self.a, &self.b, position);
        let applies = match self.direction {
            DirectionConstraint::Both => true,
            DirectionConstraint::Left => side > 0.0,
            DirectionConstraint::Right => side < 0.0,
        };
        if applies {
            level
        } else {
            SenseBlocking::None
        }
    }
}

/// A point light/vision/etc. source above the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub position: Point2<f64>,
    /// Elevation above the scene's zero plane. `INFINITY` means the
    /// source is unlimited and casts no shadows.
    pub elevation: f64,
    pub radius: Option<f64>,
}

impl Source {
    pub fn new(position: Point2<f64>, elevation: f64) -> Self {
        Self {
            position,
            elevation,
            radius: None,
        }
    }

    pub fn casts_shadows(&self) -> bool {
        self.elevation.is_finite()
    }
}

/// A blocking volume: a polygon-with-holes footprint plus a top
/// elevation (bottom defaults to scene minimum).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub polygons: Vec<TaggedPolygon>,
    pub top_elevation: Option<f64>,
    pub blocks_vision: bool,
}

/// Ground-elevation queries supplied by the elevation-raster
/// collaborator.
pub trait ElevationSource {
    fn elevation_at(&self, point: &Point2<f64>) -> f64;
    fn average_elevation_within(&self, shape: &[TaggedPolygon]) -> f64;
}

/// Uniform ground at a fixed elevation; the test stand-in.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround(pub f64);

impl ElevationSource for FlatGround {
    fn elevation_at(&self, _point: &Point2<f64>) -> f64 {
        self.0
    }

    fn average_elevation_within(&self, _shape: &[TaggedPolygon]) -> f64 {
        self.0
    }
}
