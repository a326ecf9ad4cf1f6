// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned 2D bounding boxes.

use nalgebra::Point2;

/// An axis-aligned bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Aabb {
    /// Creates a bounding box from two corner points in any order.
    pub fn from_corners(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates the bounding box of a point set, or `None` if empty.
    pub fn from_points(points: &[Point2<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::from_corners(*first, *first);
        for p in &points[1..] {
            bounds.expand(p);
        }
        Some(bounds)
    }

    /// Grows the box to include a point.
    pub fn expand(&mut self, p: &Point2<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Grows the box outward by `margin` on every side.
    pub fn pad(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Returns `true` if the two boxes overlap (touching counts).
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Returns `true` if the point lies inside or on the box.
    pub fn contains_point(&self, p: &Point2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// The four corners as a counter-clockwise rectangle contour.
    pub fn contour(&self) -> Vec<Point2<f64>> {
        vec![
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_normalize() {
        let b = Aabb::from_corners(Point2::new(10.0, 0.0), Point2::new(0.0, 10.0));
        assert_eq!(b.min, Point2::new(0.0, 0.0));
        assert_eq!(b.max, Point2::new(10.0, 10.0));
    }

    #[test]
    fn overlap_and_separation() {
        let a = Aabb::from_corners(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let b = Aabb::from_corners(Point2::new(5.0, 5.0), Point2::new(15.0, 15.0));
        let c = Aabb::from_corners(Point2::new(20.0, 20.0), Point2::new(30.0, 30.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::from_corners(Point2::new(0.0, 0.0), Point2::new(5.0, 5.0));
        let b = Aabb::from_corners(Point2::new(5.0, 0.0), Point2::new(10.0, 5.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn pad_grows_every_side() {
        let b = Aabb::from_corners(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)).pad(2.0);
        assert_eq!(b.min, Point2::new(-2.0, -2.0));
        assert_eq!(b.max, Point2::new(3.0, 3.0));
    }

    #[test]
    fn contains_point_boundary_inclusive() {
        let b = Aabb::from_corners(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        assert!(b.contains_point(&Point2::new(0.0, 5.0)));
        assert!(b.contains_point(&Point2::new(5.0, 5.0)));
        assert!(!b.contains_point(&Point2::new(10.1, 5.0)));
    }
}
