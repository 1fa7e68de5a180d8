// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Viewport Scene
//!
//! The data a model loader hands to the viewer once an IFC file has been
//! parsed: a retained scene graph, the parser's geometry item table and the
//! camera that frames the result.
//!
//! Nodes live in an arena ([`SceneGraph`]) and are addressed by generational
//! [`NodeKey`]s. Geometry items reference mesh nodes by key, so a mesh can
//! exist in the arena without being attached under the model root, which is
//! exactly the state the post-load reconciliation repairs.

pub mod camera;
pub mod error;
pub mod graph;
pub mod items;
pub mod keys;
pub mod material;
pub mod snapshot;
pub mod traversal;

pub use camera::{CameraFrame, CameraState};
pub use error::{Error, Result};
pub use graph::{GeometryPayload, NodeData, SceneGraph};
pub use items::{GeometryItem, ItemId, ItemTable};
pub use keys::NodeKey;
pub use material::{FaceSide, MaterialKind, MaterialState, RawMaterial, Rgb};
pub use snapshot::{LoadedScene, SceneSnapshot};
