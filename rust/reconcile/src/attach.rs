// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh-attachment repair.
//!
//! Some loads finish with every mesh node parsed but none of them parented
//! under the model root, so nothing renders. When the root is empty and the
//! item table is not, the item meshes are appended to the root. The emptiness
//! check gates every mutation, so running the step twice never attaches twice.

use ifc_viewport_scene::{ItemTable, NodeKey, SceneGraph};
use serde::Serialize;

/// What the attachment step did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// Mesh nodes appended to the root
    pub attached: usize,
    /// Items without a mesh, with a stale mesh key, or repeating a mesh
    /// already attached by an earlier item
    pub skipped: usize,
    /// Root already had children, so nothing was touched
    pub already_populated: bool,
}

impl RepairReport {
    /// True if the scene graph was changed
    pub fn repaired(&self) -> bool {
        self.attached > 0
    }
}

/// Reparents item meshes onto `root` when `root` has no children.
///
/// Items are visited in the table's iteration order. Only parent/child links
/// change; items themselves are never modified.
pub fn reconcile_attachment(
    graph: &mut SceneGraph,
    root: NodeKey,
    items: &ItemTable,
) -> RepairReport {
    let mut report = RepairReport::default();

    if !graph.children(root).is_empty() {
        report.already_populated = true;
        tracing::debug!(
            children = graph.children(root).len(),
            items = items.len(),
            "Model root already populated, skipping attachment repair"
        );
        return report;
    }
    if items.is_empty() {
        return report;
    }

    for item in items.iter() {
        let Some(mesh) = item.mesh else {
            report.skipped += 1;
            continue;
        };
        if !graph.contains(mesh) {
            tracing::warn!(item = %item.id, "Item references a removed mesh node");
            report.skipped += 1;
            continue;
        }
        if graph.parent(mesh) == Some(root) {
            report.skipped += 1;
            continue;
        }
        match graph.append_child(root, mesh) {
            Ok(()) => report.attached += 1,
            Err(e) => {
                tracing::warn!(item = %item.id, error = %e, "Could not attach item mesh");
                report.skipped += 1;
            }
        }
    }

    if report.attached > 0 {
        tracing::info!(
            attached = report.attached,
            skipped = report.skipped,
            "Attached detached item meshes to model root"
        );
    }
    report
}
