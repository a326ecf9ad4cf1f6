// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate quantization and floating point hygiene.
//!
//! Vertices of the wall graph are identified by their quantized
//! coordinates: two points that round to the same key ARE the same
//! vertex. Without this, nearly-coincident intersection points fail to
//! merge into shared graph vertices and face tracing produces spurious
//! open paths.
//!
//! Two fixed policies apply scene-wide:
//! - graph vertices quantize to the nearest whole canvas unit
//!   ([`QUANT_STEP`]);
//! - coordinates produced by plane transforms round to
//!   [`TRANSFORM_PLACES`] decimal places so matching endpoints compare
//!   exactly equal.

use nalgebra::{Point2, Point3};

/// Quantization step for graph vertex identity, in canvas units.
pub const QUANT_STEP: f64 = 1.0;

/// Decimal places kept after projective/plane transforms.
pub const TRANSFORM_PLACES: u32 = 4;

/// Epsilon for parametric (0..1) comparisons along a segment.
pub const PARAM_EPS: f64 = 1e-8;

/// Epsilon for absolute coordinate comparisons.
pub const COORD_EPS: f64 = 1e-6;

/// Quantized vertex identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantKey(pub i64, pub i64);

impl QuantKey {
    /// Quantizes a point to its vertex identity key.
    pub fn of(p: &Point2<f64>) -> Self {
        QuantKey(
            (p.x / QUANT_STEP).round() as i64,
            (p.y / QUANT_STEP).round() as i64,
        )
    }

    /// The canonical point this key represents.
    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.0 as f64 * QUANT_STEP, self.1 as f64 * QUANT_STEP)
    }
}

/// Rounds a value to `places` decimal places.
pub fn round_places(v: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (v * scale).round() / scale
}

/// Rounds a 2D point to the transform precision.
pub fn round_point2(p: &Point2<f64>) -> Point2<f64> {
    Point2::new(
        round_places(p.x, TRANSFORM_PLACES),
        round_places(p.y, TRANSFORM_PLACES),
    )
}

/// Rounds a 3D point to the transform precision.
pub fn round_point3(p: &Point3<f64>) -> Point3<f64> {
    Point3::new(
        round_places(p.x, TRANSFORM_PLACES),
        round_places(p.y, TRANSFORM_PLACES),
        round_places(p.z, TRANSFORM_PLACES),
    )
}

/// Absolute-epsilon equality for coordinates.
pub fn almost_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= COORD_EPS
}

/// Absolute-epsilon equality for 2D points.
pub fn points_almost_eq(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    almost_eq(a.x, b.x) && almost_eq(a.y, b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_points_share_a_key() {
        let a = Point2::new(5.49, 10.0);
        let b = Point2::new(5.0, 10.49);
        assert_eq!(QuantKey::of(&a), QuantKey::of(&b));
    }

    #[test]
    fn distant_points_get_distinct_keys() {
        let a = Point2::new(5.0, 10.0);
        let b = Point2::new(6.0, 10.0);
        assert_ne!(QuantKey::of(&a), QuantKey::of(&b));
    }

    #[test]
    fn key_point_is_canonical() {
        let key = QuantKey::of(&Point2::new(4.7, -2.3));
        assert_eq!(key.point(), Point2::new(5.0, -2.0));
    }

    #[test]
    fn round_places_four() {
        assert_eq!(round_places(1.00004999, 4), 1.0);
        assert_eq!(round_places(1.00005001, 4), 1.0001);
        assert_eq!(round_places(-3.141592653, 4), -3.1416);
    }

    #[test]
    fn negative_coordinates_quantize() {
        let key = QuantKey::of(&Point2::new(-0.4, -0.6));
        assert_eq!(key, QuantKey(0, -1));
    }
}
