// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena key types for the wall graph.
//!
//! Keys are generational slotmap indices: stable across unrelated
//! insertions and removals, and safe to hold across splits (a stale key
//! simply fails lookup instead of aliasing a new edge).

use slotmap::new_key_type;

new_key_type! {
    /// Key for a canonical (quantized) graph vertex.
    pub struct VertexKey;

    /// Key for a non-crossing sub-segment of one wall.
    pub struct EdgeKey;
}
