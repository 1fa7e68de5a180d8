// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs the four reconciliation steps in order.

use ifc_viewport_scene::{CameraState, ItemTable, NodeKey, SceneGraph};

use crate::attach::{reconcile_attachment, RepairReport};
use crate::config::ReconcileConfig;
use crate::fit::{fit_camera, FitOutcome};
use crate::report::{report, DiagnosticSummary};
use crate::sanitize::{sanitize_materials, SanitizeReport};

/// Everything one reconciliation run found and did.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub repair: RepairReport,
    pub sanitize: SanitizeReport,
    pub fit: FitOutcome,
    pub summary: DiagnosticSummary,
}

impl ReconcileOutcome {
    /// The model loaded but the user will not see anything.
    pub fn is_degenerate(&self) -> bool {
        self.fit.is_fallback() || self.summary.is_zero_size
    }
}

/// Post-load reconciliation with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    /// Out-of-range settings in `config` are replaced by their defaults.
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Attachment → sanitizing → camera fit → diagnostics, using the
    /// camera's own field of view.
    pub fn run(
        &self,
        graph: &mut SceneGraph,
        root: NodeKey,
        items: &ItemTable,
        camera: &mut CameraState,
    ) -> ReconcileOutcome {
        let fov = camera.fov;
        self.run_with_fov(graph, root, items, camera, fov)
    }

    /// Same as [`run`](Self::run) with an explicit vertical field of view.
    pub fn run_with_fov(
        &self,
        graph: &mut SceneGraph,
        root: NodeKey,
        items: &ItemTable,
        camera: &mut CameraState,
        fov_degrees: f64,
    ) -> ReconcileOutcome {
        let span = tracing::info_span!("reconcile", items = items.len());
        let _enter = span.enter();

        let repair = reconcile_attachment(graph, root, items);
        let sanitize = sanitize_materials(graph, root, &self.config.sanitize);
        let fit = fit_camera(graph, root, fov_degrees, camera, &self.config);
        let summary = report(graph, root);
        summary.log();

        tracing::info!(
            attached = repair.attached,
            fixed = sanitize.fixed_count(),
            fallback = fit.is_fallback(),
            "Reconciliation complete"
        );

        ReconcileOutcome {
            repair,
            sanitize,
            fit,
            summary,
        }
    }
}
