// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Viewport Reconcile
//!
//! Runs once after a model finishes loading, before the first frame is drawn:
//!
//! 1. [`attach`]: reparents detached mesh nodes onto an empty model root
//! 2. [`sanitize`]: repairs material states that hide geometry
//! 3. [`fit`]: frames the model's bounding volume with the camera
//! 4. [`report`]: summarizes mesh, vertex and material counts for triage
//!
//! None of the steps fail. Degenerate models (nothing loaded, or geometry
//! collapsed to a point) produce a fallback camera frame and a diagnostic
//! instead of an error.
//!
//! ```
//! use ifc_viewport_reconcile::{ReconcileConfig, Reconciler};
//! use ifc_viewport_scene::{CameraState, ItemTable, NodeData, SceneGraph};
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.add_node(NodeData::group());
//! let mut camera = CameraState::default();
//!
//! let outcome = Reconciler::new(ReconcileConfig::default())
//!     .run(&mut graph, root, &ItemTable::new(), &mut camera);
//!
//! assert!(outcome.is_degenerate());
//! assert_eq!(camera.position, [10.0, 10.0, 10.0]);
//! ```

pub mod attach;
pub mod config;
pub mod fit;
pub mod pipeline;
pub mod report;
pub mod sanitize;

pub use attach::{reconcile_attachment, RepairReport};
pub use config::ReconcileConfig;
pub use fit::{fit_camera, frame_bounds, FallbackReason, FitOutcome};
pub use pipeline::{ReconcileOutcome, Reconciler};
pub use report::{report, DiagnosticSummary};
pub use sanitize::{sanitize_materials, SanitizePolicy, SanitizeReport};
