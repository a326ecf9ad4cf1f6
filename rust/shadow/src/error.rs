// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error type of the shadow engine.
//!
//! Geometric degeneracy is not an error here: a projection that cannot
//! produce a polygon returns `None` and the scene renders without that
//! one shadow. `Error` covers contract violations only.

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    /// The visibility boundary is unusable (fewer than 3 vertices or
    /// zero area after cleaning).
    #[error("degenerate visibility boundary")]
    DegenerateBoundary,

    #[error(transparent)]
    Core(#[from] umbra_core::Error),
}
