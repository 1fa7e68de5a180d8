// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Depth-first traversal over a subtree of the scene graph.

use ifc_viewport_geometry::{BoundingVolume, Transform};

use crate::graph::{NodeData, SceneGraph};
use crate::keys::NodeKey;

impl SceneGraph {
    /// All nodes of the subtree rooted at `root`, pre-order, root first.
    /// Returns an empty list for a stale key.
    pub fn descendants(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            out.push(key);
            // reversed so the first child is visited first
            stack.extend(self.children(key).iter().rev().copied());
        }
        out
    }

    /// Nodes of the subtree that carry a mesh payload, pre-order.
    pub fn geometry_nodes(&self, root: NodeKey) -> Vec<NodeKey> {
        self.descendants(root)
            .into_iter()
            .filter(|&k| self.node(k).is_some_and(NodeData::is_geometry))
            .collect()
    }

    /// Visits every node of the subtree with its accumulated world transform.
    ///
    /// World space is relative to the coordinate frame `root` lives in: the
    /// root's own transform is applied, its ancestors' are not.
    pub fn walk_world<F>(&self, root: NodeKey, mut visit: F)
    where
        F: FnMut(NodeKey, &NodeData, &Transform),
    {
        let Some(root_data) = self.node(root) else {
            return;
        };
        let mut stack: Vec<(NodeKey, Transform)> = vec![(root, root_data.transform)];
        while let Some((key, world)) = stack.pop() {
            let Some(data) = self.node(key) else {
                continue;
            };
            visit(key, data, &world);
            for &child in data.children().iter().rev() {
                if let Some(child_data) = self.node(child) {
                    stack.push((child, world * child_data.transform));
                }
            }
        }
    }

    /// World-space bounds of every mesh vertex in the subtree.
    ///
    /// Visibility flags are not consulted: hidden geometry still occupies
    /// space the camera has to frame once it is made visible again.
    pub fn world_bounds(&self, root: NodeKey) -> BoundingVolume {
        let mut volume = BoundingVolume::empty();
        self.walk_world(root, |_, data, world| {
            if let Some(geometry) = &data.geometry {
                volume = volume.union(&geometry.mesh.world_bounds(world));
            }
        });
        volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialState;
    use approx::assert_relative_eq;
    use ifc_viewport_geometry::transform::translation;
    use ifc_viewport_geometry::{Mesh, Point3, Vector3};

    fn unit_box() -> Mesh {
        Mesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn descendants_pre_order() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let a = graph.add_node(NodeData::group());
        let a1 = graph.add_node(NodeData::group());
        let b = graph.add_node(NodeData::group());
        graph.append_child(root, a).unwrap();
        graph.append_child(a, a1).unwrap();
        graph.append_child(root, b).unwrap();

        assert_eq!(graph.descendants(root), vec![root, a, a1, b]);
        assert_eq!(graph.descendants(a), vec![a, a1]);
    }

    #[test]
    fn detached_nodes_are_not_visited() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        graph.add_node(NodeData::mesh(unit_box(), MaterialState::default()));
        assert_eq!(graph.descendants(root), vec![root]);
        assert!(graph.geometry_nodes(root).is_empty());
        assert!(graph.world_bounds(root).is_empty());
    }

    #[test]
    fn world_bounds_compose_transforms() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group().with_transform(translation(10.0, 0.0, 0.0)));
        let storey = graph.add_node(NodeData::group().with_transform(translation(0.0, 3.0, 0.0)));
        let slab = graph.add_node(NodeData::mesh(unit_box(), MaterialState::default()));
        graph.append_child(root, storey).unwrap();
        graph.append_child(storey, slab).unwrap();

        let bounds = graph.world_bounds(root);
        assert_relative_eq!(bounds.min().unwrap(), Point3::new(10.0, 3.0, 0.0));
        assert_relative_eq!(bounds.size(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn world_bounds_include_hidden_geometry() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let hidden = graph.add_node(
            NodeData::mesh(unit_box(), MaterialState::default()).with_visible(false),
        );
        graph.append_child(root, hidden).unwrap();
        assert!(!graph.world_bounds(root).is_empty());
    }
}
