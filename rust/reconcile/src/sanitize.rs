// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material sanitizing.
//!
//! Parsed building models regularly carry material states that render
//! nothing: fully transparent surfaces, front-only faces on thin walls seen
//! from behind, pure black under ambient-only lighting. Each correction can
//! be switched off through [`SanitizePolicy`] for models where such values are
//! intentional.

use ifc_viewport_scene::{FaceSide, NodeKey, Rgb, SceneGraph};
use serde::{Deserialize, Serialize};

/// Which corrections the sanitizer applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizePolicy {
    /// Transparent materials with opacity 0 become opaque
    pub restore_opacity: bool,
    /// Front-only materials become double sided
    pub double_side: bool,
    /// Pure black colors become `replacement_color`
    pub replace_black: bool,
    /// Hidden nodes and materials are shown, frustum culling is disabled
    pub force_visible: bool,
    pub replacement_color: Rgb,
}

impl SanitizePolicy {
    /// Policy that leaves every material value as authored. Materials are
    /// still flagged for a render-state update.
    pub fn preserve() -> Self {
        Self {
            restore_opacity: false,
            double_side: false,
            replace_black: false,
            force_visible: false,
            replacement_color: Rgb::NEUTRAL_GRAY,
        }
    }
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self {
            restore_opacity: true,
            double_side: true,
            replace_black: true,
            force_visible: true,
            replacement_color: Rgb::NEUTRAL_GRAY,
        }
    }
}

/// Counts of applied corrections, per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeReport {
    pub opacity: usize,
    pub side: usize,
    pub color: usize,
    pub visibility: usize,
    /// Geometry nodes visited
    pub nodes: usize,
    /// Materials visited (and flagged for update)
    pub materials: usize,
}

impl SanitizeReport {
    /// Total number of individual corrections
    pub fn fixed_count(&self) -> usize {
        self.opacity + self.side + self.color + self.visibility
    }
}

/// Repairs invisible-making material states on every geometry node under
/// `root` (root included).
///
/// Visibility is counted as a correction only when a node or material was
/// actually hidden; disabling frustum culling is not counted. Every visited
/// material is flagged for a render-state update whatever the policy.
pub fn sanitize_materials(
    graph: &mut SceneGraph,
    root: NodeKey,
    policy: &SanitizePolicy,
) -> SanitizeReport {
    let mut report = SanitizeReport::default();

    for key in graph.geometry_nodes(root) {
        let Some(node) = graph.node_mut(key) else {
            continue;
        };
        let Some(geometry) = node.geometry.as_mut() else {
            continue;
        };
        report.nodes += 1;

        let mut node_was_hidden = false;
        if policy.force_visible {
            node_was_hidden = !node.visible;
            node.visible = true;
            node.frustum_culled = false;
        }

        for material in geometry.materials.iter_mut() {
            report.materials += 1;

            if policy.force_visible && (node_was_hidden || !material.visible) {
                material.visible = true;
                node_was_hidden = false;
                report.visibility += 1;
            }

            if policy.restore_opacity && material.transparent && material.opacity == 0.0 {
                material.opacity = 1.0;
                report.opacity += 1;
            }

            if policy.double_side && material.kind.has_faces() && material.side == FaceSide::Front
            {
                material.side = FaceSide::Double;
                report.side += 1;
            }

            if policy.replace_black {
                if let Some(color) = material.color.as_mut() {
                    if color.is_black() {
                        *color = policy.replacement_color;
                        report.color += 1;
                    }
                }
            }

            material.needs_update = true;
        }
    }

    tracing::debug!(
        nodes = report.nodes,
        materials = report.materials,
        opacity = report.opacity,
        side = report.side,
        color = report.color,
        visibility = report.visibility,
        "Sanitized materials"
    );
    report
}
