// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node keys for arena-based storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid (or detectably
//! stale) when other nodes are removed.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a node in a [`SceneGraph`](crate::SceneGraph).
    pub struct NodeKey;
}
