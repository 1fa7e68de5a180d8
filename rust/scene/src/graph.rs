// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based retained scene graph.
//!
//! The [`SceneGraph`] owns every node the loader created, attached or not.
//! Parent and child links are kept in both directions and only change through
//! [`SceneGraph::append_child`] and [`SceneGraph::detach`], which keep the two
//! directions consistent and refuse to create cycles.

use ifc_viewport_geometry::{Mesh, Transform};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::keys::NodeKey;
use crate::material::MaterialState;

/// Renderable content of a node: one mesh drawn with one material, or with an
/// ordered list of materials for multi-part meshes.
#[derive(Debug, Clone)]
pub struct GeometryPayload {
    pub mesh: Mesh,
    pub materials: SmallVec<[MaterialState; 1]>,
}

impl GeometryPayload {
    pub fn new(mesh: Mesh, material: MaterialState) -> Self {
        Self {
            mesh,
            materials: smallvec::smallvec![material],
        }
    }

    pub fn multi(mesh: Mesh, materials: impl IntoIterator<Item = MaterialState>) -> Result<Self> {
        let materials: SmallVec<[MaterialState; 1]> = materials.into_iter().collect();
        if materials.is_empty() {
            return Err(Error::MissingMaterial);
        }
        Ok(Self { mesh, materials })
    }
}

/// Data stored for a node.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub name: Option<String>,
    pub visible: bool,
    /// When set, a culling pass may hide the node if its cached bounds fall
    /// outside the view frustum.
    pub frustum_culled: bool,
    /// Local-to-parent transform
    pub transform: Transform,
    pub geometry: Option<GeometryPayload>,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl NodeData {
    /// Empty container node with identity transform
    pub fn group() -> Self {
        Self {
            name: None,
            visible: true,
            frustum_culled: true,
            transform: Transform::identity(),
            geometry: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node drawing `mesh` with a single material
    pub fn mesh(mesh: Mesh, material: MaterialState) -> Self {
        Self::group().with_geometry(GeometryPayload::new(mesh, material))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryPayload) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// True if the node carries a mesh payload
    pub fn is_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}

/// Owner of all scene nodes.
///
/// # Example
///
/// ```
/// use ifc_viewport_scene::{NodeData, SceneGraph};
///
/// let mut graph = SceneGraph::new();
/// let root = graph.add_node(NodeData::group().with_name("model"));
/// let child = graph.add_node(NodeData::group());
/// graph.append_child(root, child).unwrap();
///
/// assert_eq!(graph.children(root), &[child]);
/// ```
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, NodeData>,
}

impl SceneGraph {
    /// Creates a new, empty scene graph.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Inserts a detached node. Any parent/child links in `data` are cleared.
    pub fn add_node(&mut self, mut data: NodeData) -> NodeKey {
        data.parent = None;
        data.children.clear();
        self.nodes.insert(data)
    }

    /// Returns the node data for the given key, or `None` if not found.
    pub fn node(&self, key: NodeKey) -> Option<&NodeData> {
        self.nodes.get(key)
    }

    /// Mutable access to node fields. Links stay private to the graph.
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut NodeData> {
        self.nodes.get_mut(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Returns the number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `key` in draw order (empty if the key is stale)
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(key)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|n| n.parent)
    }

    /// Returns `true` if `ancestor` is `node` or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.contains(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        if !self.contains(child) {
            return Err(Error::NodeNotFound(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::Cycle { parent, child });
        }

        self.detach(child)?;

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Removes `child` from its parent's child list. No-op for root nodes.
    pub fn detach(&mut self, child: NodeKey) -> Result<()> {
        let parent = self
            .nodes
            .get_mut(child)
            .ok_or(Error::NodeNotFound(child))?
            .parent
            .take();

        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p)) {
            p.children.retain(|&k| k != child);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialKind;

    #[test]
    fn new_graph_is_empty() {
        let graph = SceneGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }

    #[test]
    fn add_node_is_detached() {
        let mut graph = SceneGraph::new();
        let key = graph.add_node(NodeData::group().with_name("site"));
        assert_eq!(graph.parent(key), None);
        assert!(graph.children(key).is_empty());
        assert_eq!(graph.node(key).unwrap().name.as_deref(), Some("site"));
    }

    #[test]
    fn append_child_keeps_order() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let a = graph.add_node(NodeData::group());
        let b = graph.add_node(NodeData::group());
        graph.append_child(root, a).unwrap();
        graph.append_child(root, b).unwrap();
        assert_eq!(graph.children(root), &[a, b]);
        assert_eq!(graph.parent(a), Some(root));
    }

    #[test]
    fn append_child_reparents() {
        let mut graph = SceneGraph::new();
        let old = graph.add_node(NodeData::group());
        let new = graph.add_node(NodeData::group());
        let child = graph.add_node(NodeData::group());
        graph.append_child(old, child).unwrap();
        graph.append_child(new, child).unwrap();
        assert!(graph.children(old).is_empty());
        assert_eq!(graph.children(new), &[child]);
        assert_eq!(graph.parent(child), Some(new));
    }

    #[test]
    fn append_child_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.add_node(NodeData::group());
        let b = graph.add_node(NodeData::group());
        graph.append_child(a, b).unwrap();
        assert!(matches!(graph.append_child(b, a), Err(Error::Cycle { .. })));
        assert!(matches!(graph.append_child(a, a), Err(Error::Cycle { .. })));
        // graph unchanged
        assert_eq!(graph.children(a), &[b]);
        assert_eq!(graph.parent(a), None);
    }

    #[test]
    fn multi_material_requires_at_least_one() {
        assert!(matches!(
            GeometryPayload::multi(Mesh::new(), Vec::new()),
            Err(Error::MissingMaterial)
        ));
        let payload = GeometryPayload::multi(
            Mesh::new(),
            [
                MaterialState::new(MaterialKind::Standard),
                MaterialState::new(MaterialKind::Line),
            ],
        )
        .unwrap();
        assert_eq!(payload.materials.len(), 2);
    }
}
