// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for core geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core geometry layer.
///
/// Geometric degeneracies (collinear points, zero-length segments,
/// source at or below an occluder top) are not errors; operations that
/// can degenerate return `Option` or empty collections instead. These
/// variants cover genuine contract violations only.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Non-finite coordinate encountered: {0}")]
    NonFiniteCoordinate(String),
}
