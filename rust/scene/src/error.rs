// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene ingestion and graph edits.

use crate::keys::NodeKey;

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or editing a scene.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced node was not found in the arena.
    #[error("scene node not found: {0:?}")]
    NodeNotFound(NodeKey),

    /// Attaching the child would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeKey, child: NodeKey },

    /// Material opacity outside `0.0..=1.0` or not a number.
    #[error("material opacity {0} is outside 0..=1")]
    InvalidOpacity(f32),

    /// Material color component outside `0.0..=1.0` or not a number.
    #[error("material color component {0} is outside 0..=1")]
    InvalidColor(f32),

    /// A material kind that cannot carry the given channel.
    #[error("material kind {kind} has no {channel} channel")]
    UnsupportedChannel {
        kind: &'static str,
        channel: &'static str,
    },

    /// A geometry node declared without any material.
    #[error("geometry node has no material")]
    MissingMaterial,

    /// A snapshot index does not name a node.
    #[error("snapshot node index {index} out of range ({len} nodes)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A snapshot node listed as a child of more than one parent.
    #[error("snapshot node {0} has more than one parent")]
    MultipleParents(usize),

    /// Invalid mesh buffers or transform.
    #[error("geometry error: {0}")]
    Geometry(#[from] ifc_viewport_geometry::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
