// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shadow combination against the visibility boundary.
//!
//! All per-occluder shadows are unioned with the non-zero winding rule
//! before subtraction. The rule is load-bearing: even-odd union of
//! overlapping same-orientation shadow quads cancels wherever an even
//! number of shadows stack, leaving checkerboard gaps in what must be
//! solid shadow.

use umbra_core::bool2d::{self, Shape};
use umbra_core::contour::{clean_contour, validate_contour, Contour, TaggedPolygon};

use crate::error::{Error, Result};

/// `boundary - shadows` as a tagged polygon set. An empty shadow list
/// returns the cleaned boundary. A boundary with non-finite or too few
/// vertices, or one that cleans down to nothing, is a contract
/// violation and errors out.
pub fn combine(boundary: &Contour, shadows: &[Contour]) -> Result<Vec<TaggedPolygon>> {
    validate_contour(boundary)?;
    let cleaned = clean_contour(boundary);
    if cleaned.is_empty() {
        return Err(Error::DegenerateBoundary);
    }
    if shadows.is_empty() {
        return Ok(vec![TaggedPolygon::solid(cleaned)]);
    }

    let subject = bool2d::contours_to_shapes(&[cleaned]);
    let result = if shadows.len() == 1 {
        bool2d::difference(&subject, shadows)
    } else {
        let unioned = bool2d::union_positive(shadows);
        bool2d::difference_shapes(&subject, &unioned)
    };
    Ok(bool2d::shapes_to_tagged(&result))
}

/// The union of all shadows alone, without a boundary clip.
pub fn combined_shadow(shadows: &[Contour]) -> Vec<TaggedPolygon> {
    bool2d::shapes_to_tagged(&bool2d::union_positive(shadows))
}

/// Shape-level variant used by the layered region accumulator.
pub fn combine_shapes(boundary: &[Shape], shadows: &[Shape]) -> Vec<TaggedPolygon> {
    bool2d::shapes_to_tagged(&bool2d::difference_shapes(boundary, shadows))
}
