// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostic summary of a reconciled model.
//!
//! Purely observational: the summary goes to logs and to the UI layer, never
//! back into control flow.

use ifc_viewport_scene::{NodeKey, SceneGraph};
use serde::Serialize;

/// Counts and bounds of the geometry under a model root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticSummary {
    pub mesh_count: usize,
    pub vertex_count: usize,
    pub material_count: usize,
    pub bounding_center: [f64; 3],
    pub bounding_size: [f64; 3],
    /// Bounds have zero extent on every axis (also true with no geometry)
    pub is_zero_size: bool,
}

impl DiagnosticSummary {
    /// Short sentence for the user when the model will not show up, `None`
    /// when it looks fine.
    pub fn user_message(&self) -> Option<&'static str> {
        if self.mesh_count == 0 {
            Some("Model loaded, but no meshes are attached to it")
        } else if self.is_zero_size {
            Some("Model loaded, but nothing is visible: its geometry has zero size")
        } else {
            None
        }
    }

    /// Emits the summary as one structured log event.
    pub fn log(&self) {
        if self.user_message().is_some() {
            tracing::warn!(
                mesh_count = self.mesh_count,
                vertex_count = self.vertex_count,
                material_count = self.material_count,
                bounding_size = ?self.bounding_size,
                "Model has no visible geometry"
            );
        } else {
            tracing::info!(
                mesh_count = self.mesh_count,
                vertex_count = self.vertex_count,
                material_count = self.material_count,
                bounding_center = ?self.bounding_center,
                bounding_size = ?self.bounding_size,
                "Model diagnostics"
            );
        }
    }
}

/// Aggregates mesh, vertex and material counts and the world-space bounds of
/// `root`'s subtree. The bounds are recomputed here, not shared with the
/// camera fitter.
pub fn report(graph: &SceneGraph, root: NodeKey) -> DiagnosticSummary {
    let mut mesh_count = 0;
    let mut vertex_count = 0;
    let mut material_count = 0;

    for key in graph.geometry_nodes(root) {
        if let Some(geometry) = graph.node(key).and_then(|n| n.geometry.as_ref()) {
            mesh_count += 1;
            vertex_count += geometry.mesh.vertex_count();
            material_count += geometry.materials.len();
        }
    }

    let bounds = graph.world_bounds(root);
    let center = bounds.center();
    let size = bounds.size();

    DiagnosticSummary {
        mesh_count,
        vertex_count,
        material_count,
        bounding_center: [center.x, center.y, center.z],
        bounding_size: [size.x, size.y, size.z],
        is_zero_size: bounds.is_zero_size(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_viewport_geometry::{Mesh, Point3};
    use ifc_viewport_scene::{GeometryPayload, MaterialKind, MaterialState, NodeData};

    #[test]
    fn empty_root_reports_zero_size() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let summary = report(&graph, root);
        assert_eq!(summary.mesh_count, 0);
        assert_eq!(summary.vertex_count, 0);
        assert!(summary.is_zero_size);
        assert_eq!(summary.bounding_size, [0.0, 0.0, 0.0]);
        assert!(summary.user_message().unwrap().contains("no meshes"));
    }

    #[test]
    fn single_box_bounds_match_extents() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let wall = graph.add_node(NodeData::mesh(
            Mesh::cuboid(Point3::new(1.0, 2.0, 3.0), Point3::new(4.5, 2.25, 9.0)),
            MaterialState::default(),
        ));
        graph.append_child(root, wall).unwrap();

        let summary = report(&graph, root);
        assert_eq!(summary.mesh_count, 1);
        assert_eq!(summary.vertex_count, 8);
        assert_eq!(summary.material_count, 1);
        assert!(!summary.is_zero_size);
        assert_relative_eq!(summary.bounding_size[0], 3.5, epsilon = 1e-6);
        assert_relative_eq!(summary.bounding_size[1], 0.25, epsilon = 1e-6);
        assert_relative_eq!(summary.bounding_size[2], 6.0, epsilon = 1e-6);
        assert_relative_eq!(summary.bounding_center[0], 2.75, epsilon = 1e-6);
        assert!(summary.user_message().is_none());
    }

    #[test]
    fn collapsed_geometry_is_flagged() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let p = Point3::new(2.0, 2.0, 2.0);
        let dot = graph.add_node(NodeData::mesh(Mesh::cuboid(p, p), MaterialState::default()));
        graph.append_child(root, dot).unwrap();

        let summary = report(&graph, root);
        assert_eq!(summary.mesh_count, 1);
        assert!(summary.is_zero_size);
        assert!(summary.user_message().unwrap().contains("zero size"));
    }

    #[test]
    fn counts_every_material_of_multi_part_meshes() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let payload = GeometryPayload::multi(
            Mesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0)),
            [
                MaterialState::new(MaterialKind::Standard),
                MaterialState::new(MaterialKind::Basic),
                MaterialState::new(MaterialKind::Line),
            ],
        )
        .unwrap();
        let window = graph.add_node(NodeData::group().with_geometry(payload));
        graph.append_child(root, window).unwrap();

        assert_eq!(report(&graph, root).material_count, 3);
    }

    #[test]
    fn summary_serializes_as_plain_data() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(NodeData::group());
        let json = serde_json::to_value(report(&graph, root)).unwrap();
        assert_eq!(json["mesh_count"], 0);
        assert_eq!(json["is_zero_size"], true);
    }
}
