// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for wall graph operations.

use umbra_core::WallId;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during graph mutation.
///
/// Geometric oddities (missed intersections, zero-length sub-edges)
/// are not errors — they degrade with a logged warning. These variants
/// cover caller contract violations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wall id was expected to be registered but is not.
    #[error("wall not registered: {0:?}")]
    UnknownWall(WallId),

    /// A wall id was registered twice without an intervening removal.
    #[error("wall already registered: {0:?}")]
    DuplicateWall(WallId),
}
