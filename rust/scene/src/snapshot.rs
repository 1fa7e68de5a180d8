// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON scene snapshots.
//!
//! A snapshot captures what the loader handed over after a parse: nodes with
//! index-based child lists, the root index, the geometry item table and the
//! camera. It is the portable form used to replay a failed load outside the
//! viewer. Node indices map to arena keys on ingestion, and every buffer,
//! transform and material is validated there.

use ifc_viewport_geometry::{transform_from_column_major, Mesh};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::camera::CameraState;
use crate::error::{Error, Result};
use crate::graph::{GeometryPayload, NodeData, SceneGraph};
use crate::items::{ItemId, ItemTable};
use crate::keys::NodeKey;
use crate::material::{MaterialState, RawMaterial};

/// Serializable representation of a loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    /// Index of the model root in `nodes`
    pub root: usize,
    #[serde(default)]
    pub items: Vec<ItemSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub frustum_culled: bool,
    /// 16 column-major values; identity when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Vec<f64>>,
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshSnapshot>,
    /// One entry per mesh part; a mesh without materials gets the default
    #[serde(default)]
    pub materials: Vec<RawMaterial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSnapshot {
    pub positions: Vec<f32>,
    #[serde(default)]
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    /// Index of the item's mesh node in `nodes`
    #[serde(default)]
    pub node: Option<usize>,
}

fn default_true() -> bool {
    true
}

/// A snapshot turned into live scene data.
#[derive(Debug)]
pub struct LoadedScene {
    pub graph: SceneGraph,
    pub root: NodeKey,
    pub items: ItemTable,
    pub camera: Option<CameraState>,
}

impl SceneSnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Validates the snapshot and builds the scene graph and item table.
    pub fn into_scene(self) -> Result<LoadedScene> {
        let len = self.nodes.len();
        let check = |index: usize| -> Result<usize> {
            if index < len {
                Ok(index)
            } else {
                Err(Error::IndexOutOfRange { index, len })
            }
        };

        check(self.root)?;

        let mut graph = SceneGraph::new();
        let mut keys: Vec<NodeKey> = Vec::with_capacity(len);
        let mut child_lists: Vec<Vec<usize>> = Vec::with_capacity(len);

        for node in self.nodes {
            let mut data = NodeData::group().with_visible(node.visible);
            data.frustum_culled = node.frustum_culled;
            if let Some(name) = node.name {
                data = data.with_name(name);
            }
            if let Some(values) = node.transform {
                data = data.with_transform(transform_from_column_major(&values)?);
            }
            if let Some(mesh) = node.mesh {
                let mesh = Mesh::from_buffers(mesh.positions, mesh.indices)?;
                let materials = node
                    .materials
                    .into_iter()
                    .map(MaterialState::try_from)
                    .collect::<Result<Vec<_>>>()?;
                let payload = if materials.is_empty() {
                    GeometryPayload::new(mesh, MaterialState::default())
                } else {
                    GeometryPayload::multi(mesh, materials)?
                };
                data = data.with_geometry(payload);
            } else if !node.materials.is_empty() {
                tracing::debug!(
                    materials = node.materials.len(),
                    "Ignoring materials on snapshot node without mesh"
                );
            }
            keys.push(graph.add_node(data));
            child_lists.push(node.children);
        }

        let mut parent_of: FxHashMap<usize, usize> = FxHashMap::default();
        for (parent, children) in child_lists.iter().enumerate() {
            for &child in children {
                check(child)?;
                if parent_of.insert(child, parent).is_some() {
                    return Err(Error::MultipleParents(child));
                }
                graph.append_child(keys[parent], keys[child])?;
            }
        }

        let mut items = ItemTable::new();
        for item in self.items {
            let mesh = item.node.map(check).transpose()?.map(|i| keys[i]);
            items.insert(item.id, mesh);
        }

        Ok(LoadedScene {
            graph,
            root: keys[self.root],
            items,
            camera: self.camera,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETACHED: &str = r#"{
        "nodes": [
            { "name": "model" },
            { "mesh": { "positions": [0,0,0, 1,0,0, 0,1,0], "indices": [0,1,2] },
              "materials": [{ "opacity": 0.0, "transparent": true }] },
            { "mesh": { "positions": [0,0,0, 2,2,2] } }
        ],
        "root": 0,
        "items": [ { "id": 101, "node": 1 }, { "id": 102, "node": 2 }, { "id": 103 } ]
    }"#;

    #[test]
    fn loads_detached_meshes() {
        let scene = SceneSnapshot::from_json(DETACHED).unwrap().into_scene().unwrap();
        assert_eq!(scene.graph.len(), 3);
        assert!(scene.graph.children(scene.root).is_empty());
        assert_eq!(scene.items.len(), 3);
        assert_eq!(scene.items.mesh_count(), 2);
        assert!(scene.camera.is_none());

        let mesh_key = scene.items.get(ItemId(101)).unwrap().mesh.unwrap();
        let node = scene.graph.node(mesh_key).unwrap();
        let geometry = node.geometry.as_ref().unwrap();
        assert_eq!(geometry.mesh.triangle_count(), 1);
        assert_eq!(geometry.materials[0].opacity, 0.0);

        // mesh without explicit materials gets the default one
        let second = scene.items.get(ItemId(102)).unwrap().mesh.unwrap();
        let materials = &scene.graph.node(second).unwrap().geometry.as_ref().unwrap().materials;
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0], MaterialState::default());
    }

    #[test]
    fn links_children_in_order() {
        let json = r#"{ "nodes": [ { "children": [2, 1] }, {}, {} ], "root": 0 }"#;
        let scene = SceneSnapshot::from_json(json).unwrap().into_scene().unwrap();
        let children = scene.graph.children(scene.root);
        assert_eq!(children.len(), 2);
        assert_eq!(scene.graph.parent(children[0]), Some(scene.root));
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let json = r#"{ "nodes": [ { "children": [5] } ], "root": 0 }"#;
        let err = SceneSnapshot::from_json(json).unwrap().into_scene().unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 1 }));

        let json = r#"{ "nodes": [ {} ], "root": 3 }"#;
        assert!(SceneSnapshot::from_json(json).unwrap().into_scene().is_err());

        let json = r#"{ "nodes": [ {} ], "root": 0, "items": [ { "id": 1, "node": 9 } ] }"#;
        assert!(SceneSnapshot::from_json(json).unwrap().into_scene().is_err());
    }

    #[test]
    fn rejects_shared_children_and_cycles() {
        let json = r#"{ "nodes": [ { "children": [2] }, { "children": [2] }, {} ], "root": 0 }"#;
        let err = SceneSnapshot::from_json(json).unwrap().into_scene().unwrap_err();
        assert!(matches!(err, Error::MultipleParents(2)));

        let json = r#"{ "nodes": [ { "children": [1] }, { "children": [0] } ], "root": 0 }"#;
        let err = SceneSnapshot::from_json(json).unwrap().into_scene().unwrap_err();
        assert!(matches!(err, Error::Cycle { .. }));
    }

    #[test]
    fn rejects_invalid_geometry_and_materials() {
        let json = r#"{ "nodes": [ { "mesh": { "positions": [0,0] } } ], "root": 0 }"#;
        let err = SceneSnapshot::from_json(json).unwrap().into_scene().unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));

        let json = r#"{ "nodes": [ { "transform": [1,0,0] } ], "root": 0 }"#;
        let err = SceneSnapshot::from_json(json).unwrap().into_scene().unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));

        let json = r#"{ "nodes": [ { "mesh": { "positions": [0,0,0] },
                                     "materials": [ { "color": [2, 0, 0] } ] } ], "root": 0 }"#;
        let err = SceneSnapshot::from_json(json).unwrap().into_scene().unwrap_err();
        assert!(matches!(err, Error::InvalidColor(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            SceneSnapshot::from_json("{ nodes: }"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let snapshot = SceneSnapshot::from_json(DETACHED).unwrap();
        let again = SceneSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(again.nodes.len(), 3);
        assert_eq!(again.items.len(), 3);
        assert_eq!(again.root, 0);
    }
}
