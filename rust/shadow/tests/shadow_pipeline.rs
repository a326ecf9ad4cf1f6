// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end shadow scenarios: walls to lit polygons, including the
//! traced room boundary as the visibility clip.

use approx::assert_relative_eq;
use umbra_core::contour::{filled_area, point_in_contour, Contour};
use umbra_core::{Point2, SenseBlocking, SenseTable, Source, SourceKind, Wall, WallId};
use umbra_graph::WallGraph;
use umbra_shadow::{
    combine, project_shadow, shadows_on_plane, OccluderFace, ReferencePlane,
};

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

fn short_wall(id: u64, ax: f64, ay: f64, bx: f64, by: f64, top_z: f64) -> Wall {
    let mut w = Wall::solid(WallId(id), Point2::new(ax, ay), Point2::new(bx, by));
    w.top_z = top_z;
    w
}

#[test]
fn torch_in_a_room_with_a_low_wall() {
    // Room traced by the graph becomes the boundary; a waist-high wall
    // inside the room casts a shadow away from the torch.
    let mut g = WallGraph::new();
    g.register_wall(Wall::solid(
        WallId(1),
        Point2::new(0.0, 0.0),
        Point2::new(100.0, 0.0),
    ))
    .unwrap();
    g.register_wall(Wall::solid(
        WallId(2),
        Point2::new(100.0, 0.0),
        Point2::new(100.0, 100.0),
    ))
    .unwrap();
    g.register_wall(Wall::solid(
        WallId(3),
        Point2::new(100.0, 100.0),
        Point2::new(0.0, 100.0),
    ))
    .unwrap();
    g.register_wall(Wall::solid(
        WallId(4),
        Point2::new(0.0, 100.0),
        Point2::new(0.0, 0.0),
    ))
    .unwrap();

    let boundary = g.encompassing_polygon(&Point2::new(50.0, 50.0)).unwrap();
    assert_relative_eq!(
        umbra_core::contour::signed_area(&boundary).abs(),
        10_000.0,
        epsilon = 1e-6
    );

    let torch = Source::new(Point2::new(50.0, 20.0), 20.0);
    let low_wall = short_wall(10, 40.0, 40.0, 60.0, 40.0, 10.0);
    let shadows = shadows_on_plane(
        &torch,
        SourceKind::Light,
        &[low_wall],
        &ReferencePlane::ground(),
    );
    assert_eq!(shadows.len(), 1);

    let lit = combine(&boundary, &shadows).unwrap();
    let lit_area = filled_area(&lit);
    assert!(lit_area < 10_000.0);
    assert!(lit_area > 0.0);

    // The torch side of the wall stays lit, the far side is shadowed.
    let shadow = &shadows[0];
    assert!(point_in_contour(&Point2::new(50.0, 50.0), shadow));
    assert!(!point_in_contour(&Point2::new(50.0, 30.0), shadow));
}

#[test]
fn combine_identity_round_trip() {
    let boundary = square(0.0, 0.0, 100.0, 100.0);
    let result = combine(&boundary, &[]).unwrap();
    assert_eq!(result.len(), 1);
    assert!(!result[0].is_hole);
    assert_relative_eq!(filled_area(&result), 10_000.0, epsilon = 1e-6);
}

#[test]
fn duplicated_shadow_is_idempotent_end_to_end() {
    let torch = Source::new(Point2::new(50.0, 20.0), 20.0);
    let wall = short_wall(1, 40.0, 40.0, 60.0, 40.0, 10.0);
    let face = OccluderFace::from_wall(&wall);
    let quad = project_shadow(&face, &torch, &ReferencePlane::ground()).unwrap();

    let boundary = square(0.0, 0.0, 100.0, 100.0);
    let once = combine(&boundary, &[quad.clone()]).unwrap();
    let twice = combine(&boundary, &[quad.clone(), quad]).unwrap();
    assert_relative_eq!(filled_area(&once), filled_area(&twice), epsilon = 1e-6);
}

#[test]
fn shadow_grows_as_the_source_descends() {
    let wall = short_wall(1, 40.0, 40.0, 60.0, 40.0, 10.0);
    let face = OccluderFace::from_wall(&wall);
    let boundary = square(0.0, 0.0, 100.0, 100.0);

    let lit_at = |elevation: f64| {
        let torch = Source::new(Point2::new(50.0, 20.0), elevation);
        let quad = project_shadow(&face, &torch, &ReferencePlane::ground()).unwrap();
        filled_area(&combine(&boundary, &[quad]).unwrap())
    };

    // Lower source, longer shadow, less lit area.
    assert!(lit_at(12.0) < lit_at(20.0));
    assert!(lit_at(20.0) < lit_at(100.0));
}

#[test]
fn limited_wall_shadow_is_trimmed_by_a_blocking_wall() {
    // A terrain wall behind a normal wall: the shadowed middle of the
    // terrain wall must not cast again, so the lit result with both
    // walls equals the result with the normal wall plus only the
    // terrain wall's uncovered flanks.
    let torch = Source::new(Point2::new(50.0, 0.0), 20.0);
    let normal = short_wall(1, 45.0, 10.0, 55.0, 10.0, 30.0);
    let mut terrain = short_wall(2, 30.0, 20.0, 70.0, 20.0, 10.0);
    terrain.sense = SenseTable::uniform(SenseBlocking::Limited);

    let shadows = shadows_on_plane(
        &torch,
        SourceKind::Light,
        &[normal.clone(), terrain.clone()],
        &ReferencePlane::ground(),
    );

    // The normal wall is taller than the source, so only the terrain
    // wall's remnants contribute quads.
    assert!(!shadows.is_empty());
    for quad in &shadows {
        // No remnant shadow may originate from the covered middle span
        // of the terrain wall.
        let near_xs: Vec<f64> = quad.iter().filter(|p| p.y <= 20.0 + 1e-6).map(|p| p.x).collect();
        assert!(near_xs
            .iter()
            .all(|&x| x <= 45.0 + 1e-3 || x >= 55.0 - 1e-3));
    }
}

#[test]
fn one_sided_wall_shadows_only_its_active_side() {
    let mut wall = short_wall(1, 40.0, 40.0, 60.0, 40.0, 10.0);
    wall.direction = umbra_core::DirectionConstraint::Left;

    // Left of A->B (pointing +x) is +y: a source above the wall is
    // blocked, one below is not.
    let above = Source::new(Point2::new(50.0, 60.0), 20.0);
    let below = Source::new(Point2::new(50.0, 20.0), 20.0);
    let plane = ReferencePlane::ground();

    assert_eq!(
        shadows_on_plane(&above, SourceKind::Light, &[wall.clone()], &plane).len(),
        1
    );
    assert!(shadows_on_plane(&below, SourceKind::Light, &[wall], &plane).is_empty());
}
