// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-source occluder selection.
//!
//! A wall occludes a specific source kind at one of three levels, and a
//! direction-constrained wall only blocks sources on its active side.
//! Limited occluders go through the trimming pass before they cast, so
//! they are collected separately from normal ones.

use umbra_core::{SenseBlocking, Source, SourceKind, Wall};

/// Normal and limited occluders relevant to one source.
#[derive(Debug, Default)]
pub struct OccluderSet<'a> {
    pub normal: Vec<&'a Wall>,
    pub limited: Vec<&'a Wall>,
}

impl<'a> OccluderSet<'a> {
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.limited.is_empty()
    }
}

/// Selects the walls that occlude `kind` for this source. A source
/// with infinite elevation casts no shadows and selects nothing; a
/// ranged source ignores walls entirely outside its radius.
pub fn select_occluders<'a, I>(walls: I, kind: SourceKind, source: &Source) -> OccluderSet<'a>
where
    I: IntoIterator<Item = &'a Wall>,
{
    let mut set = OccluderSet::default();
    if !source.casts_shadows() {
        return set;
    }
    for wall in walls {
        if let Some(radius) = source.radius {
            if segment_distance(wall, source) > radius {
                continue;
            }
        }
        match wall.blocking_for(kind, &source.position) {
            SenseBlocking::None => {}
            SenseBlocking::Limited => set.limited.push(wall),
            SenseBlocking::Normal => set.normal.push(wall),
        }
    }
    set
}

/// Distance from the source position to the wall segment.
fn segment_distance(wall: &Wall, source: &Source) -> f64 {
    let seg = wall.segment();
    if seg.is_degenerate() {
        return (source.position - wall.a).norm();
    }
    let t = seg.line_param_of(&source.position).clamp(0.0, 1.0);
    (source.position - seg.point_at(t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::{DirectionConstraint, Point2, SenseTable, WallId};

    fn wall(id: u64, ax: f64, ay: f64, bx: f64, by: f64) -> Wall {
        Wall::solid(WallId(id), Point2::new(ax, ay), Point2::new(bx, by))
    }

    #[test]
    fn solid_walls_selected_as_normal() {
        let walls = vec![wall(1, 0.0, 0.0, 10.0, 0.0)];
        let source = Source::new(Point2::new(5.0, 5.0), 20.0);
        let set = select_occluders(&walls, SourceKind::Light, &source);
        assert_eq!(set.normal.len(), 1);
        assert!(set.limited.is_empty());
    }

    #[test]
    fn limited_walls_kept_apart() {
        let mut w = wall(1, 0.0, 0.0, 10.0, 0.0);
        w.sense = SenseTable::uniform(SenseBlocking::Limited);
        let walls = [w];
        let source = Source::new(Point2::new(5.0, 5.0), 20.0);
        let set = select_occluders(&walls, SourceKind::Light, &source);
        assert!(set.normal.is_empty());
        assert_eq!(set.limited.len(), 1);
    }

    #[test]
    fn infinite_source_selects_nothing() {
        let walls = vec![wall(1, 0.0, 0.0, 10.0, 0.0)];
        let source = Source::new(Point2::new(5.0, 5.0), f64::INFINITY);
        assert!(select_occluders(&walls, SourceKind::Light, &source).is_empty());
    }

    #[test]
    fn direction_constraint_excludes_wrong_side() {
        let mut w = wall(1, 0.0, 0.0, 10.0, 0.0);
        w.direction = DirectionConstraint::Left;
        let below = Source::new(Point2::new(5.0, -5.0), 20.0);
        assert!(select_occluders(&[w], SourceKind::Light, &below).is_empty());
    }

    #[test]
    fn radius_excludes_distant_walls() {
        let walls = vec![wall(1, 100.0, 100.0, 110.0, 100.0)];
        let mut source = Source::new(Point2::new(0.0, 0.0), 20.0);
        source.radius = Some(50.0);
        assert!(select_occluders(&walls, SourceKind::Light, &source).is_empty());

        source.radius = Some(200.0);
        assert_eq!(
            select_occluders(&walls, SourceKind::Light, &source)
                .normal
                .len(),
            1
        );
    }
}
