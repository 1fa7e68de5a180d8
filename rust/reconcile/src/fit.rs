// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding-volume camera fitting.
//!
//! The camera keeps the direction it was looking from and backs off until the
//! largest extent of the model fits the vertical field of view, with padding.
//! Clip planes are widened when the model is much larger or smaller than the
//! camera's configured range would allow.

use ifc_viewport_geometry::{BoundingVolume, Point3, Vector3};
use ifc_viewport_scene::camera::DEFAULT_FOV_DEGREES;
use ifc_viewport_scene::{CameraFrame, CameraState, NodeKey, SceneGraph};
use serde::Serialize;

use crate::config::ReconcileConfig;

/// Near plane is kept at or above this fraction of the viewing distance
const NEAR_DISTANCE_RATIO: f64 = 0.01;

/// Why no fitted frame could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No geometry in the subtree
    EmptyScene,
    /// Geometry present but collapsed to a single point
    ZeroDimensions,
}

impl FallbackReason {
    pub fn message(&self) -> &'static str {
        match self {
            FallbackReason::EmptyScene => "could not center model: no geometry",
            FallbackReason::ZeroDimensions => "could not center model: zero dimensions",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of fitting. Both variants carry the frame written to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    Fitted(CameraFrame),
    Fallback {
        frame: CameraFrame,
        reason: FallbackReason,
    },
}

impl FitOutcome {
    pub fn frame(&self) -> &CameraFrame {
        match self {
            FitOutcome::Fitted(frame) => frame,
            FitOutcome::Fallback { frame, .. } => frame,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FitOutcome::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            FitOutcome::Fitted(_) => None,
            FitOutcome::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// Frames the world-space bounds of `root`'s subtree and writes the result
/// into `camera`. The scene graph is only read.
pub fn fit_camera(
    graph: &SceneGraph,
    root: NodeKey,
    fov_degrees: f64,
    camera: &mut CameraState,
    config: &ReconcileConfig,
) -> FitOutcome {
    let bounds = graph.world_bounds(root);
    let outcome = frame_bounds(&bounds, fov_degrees, camera, config);
    camera.apply(outcome.frame());
    outcome
}

/// Computes the frame for `bounds` as seen from `camera`, without writing it.
pub fn frame_bounds(
    bounds: &BoundingVolume,
    fov_degrees: f64,
    camera: &CameraState,
    config: &ReconcileConfig,
) -> FitOutcome {
    if bounds.is_empty() {
        return fallback(FallbackReason::EmptyScene, config);
    }
    if bounds.is_zero_size() {
        return fallback(FallbackReason::ZeroDimensions, config);
    }

    let fov_degrees = if fov_degrees > 0.0 && fov_degrees < 180.0 {
        fov_degrees
    } else {
        tracing::warn!(fov_degrees, "Invalid field of view, using default");
        DEFAULT_FOV_DEGREES
    };

    let center = bounds.center();
    let max_dim = bounds.max_dimension();
    let half_fov = (fov_degrees / 2.0).to_radians();
    let distance = (max_dim / 2.0) / half_fov.tan() * config.padding_factor;

    let direction = view_direction(camera.position() - center);
    let position = center + direction * distance;

    let distance_to_center = (position - center).norm();
    let recommended_near = config.min_near.max(distance_to_center * NEAR_DISTANCE_RATIO);
    let recommended_far = config.min_far.max((distance_to_center + max_dim) * 2.0);

    let (near, far) = if camera.near > recommended_near || camera.far < recommended_far {
        tracing::debug!(
            old_near = camera.near,
            old_far = camera.far,
            near = recommended_near,
            far = recommended_far,
            "Adjusting clip planes to model size"
        );
        (recommended_near, recommended_far)
    } else {
        (camera.near, camera.far)
    };

    tracing::debug!(
        center = ?[center.x, center.y, center.z],
        max_dim,
        distance,
        "Fitted camera to model bounds"
    );

    FitOutcome::Fitted(CameraFrame {
        position,
        target: center,
        near,
        far,
    })
}

/// Unit vector along `offset`, or the (1, 1, 1) diagonal when `offset` is
/// zero or not finite. Scaled by its largest component first so that very
/// distant cameras do not overflow the norm.
fn view_direction(offset: Vector3<f64>) -> Vector3<f64> {
    let diagonal = Vector3::new(1.0, 1.0, 1.0).normalize();
    if !offset.iter().all(|c| c.is_finite()) {
        return diagonal;
    }
    let scale = offset.amax();
    if scale == 0.0 {
        return diagonal;
    }
    (offset / scale).try_normalize(0.0).unwrap_or(diagonal)
}

fn fallback(reason: FallbackReason, config: &ReconcileConfig) -> FitOutcome {
    tracing::warn!(reason = %reason, "Using fallback camera frame");
    FitOutcome::Fallback {
        frame: CameraFrame {
            position: Point3::from(config.fallback_position),
            target: Point3::from(config.fallback_target),
            near: config.default_near,
            far: config.default_far,
        },
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at(position: [f64; 3]) -> CameraState {
        CameraState {
            position,
            ..Default::default()
        }
    }

    #[test]
    fn empty_bounds_fall_back() {
        let outcome = frame_bounds(
            &BoundingVolume::empty(),
            60.0,
            &CameraState::default(),
            &ReconcileConfig::default(),
        );
        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::EmptyScene));
        let frame = outcome.frame();
        assert_eq!(frame.position, Point3::new(10.0, 10.0, 10.0));
        assert_eq!(frame.target, Point3::origin());
        assert_eq!(frame.near, 0.1);
        assert_eq!(frame.far, 1000.0);
    }

    #[test]
    fn point_bounds_fall_back_with_distinct_reason() {
        let p = Point3::new(4.0, 4.0, 4.0);
        let outcome = frame_bounds(
            &BoundingVolume::from_points([&p]),
            60.0,
            &CameraState::default(),
            &ReconcileConfig::default(),
        );
        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::ZeroDimensions));
        assert_eq!(outcome.frame().position, Point3::new(10.0, 10.0, 10.0));
        assert_ne!(
            FallbackReason::ZeroDimensions.message(),
            FallbackReason::EmptyScene.message()
        );
    }

    #[test]
    fn flat_bounds_are_still_framed() {
        // a slab with zero height is not zero-size
        let bounds = BoundingVolume::from_corners(Point3::origin(), Point3::new(4.0, 0.0, 4.0));
        let outcome = frame_bounds(&bounds, 60.0, &camera_at([0.0, 10.0, 0.0]), &ReconcileConfig::default());
        assert!(!outcome.is_fallback());
    }

    #[test]
    fn distance_follows_fov_and_padding() {
        let bounds = BoundingVolume::from_corners(
            Point3::new(-5.0, 0.0, -5.0),
            Point3::new(5.0, 5.0, 5.0),
        );
        let camera = camera_at([0.0, 2.5, 100.0]);
        let outcome = frame_bounds(&bounds, 60.0, &camera, &ReconcileConfig::default());
        let frame = outcome.frame();

        let expected = 5.0 / 30.0_f64.to_radians().tan() * 1.5;
        assert_relative_eq!(expected, 12.990381, epsilon = 1e-5);
        assert_relative_eq!(frame.target, Point3::new(0.0, 2.5, 0.0));
        assert_relative_eq!((frame.position - frame.target).norm(), expected, epsilon = 1e-9);
        // direction from center to the old camera position is preserved
        assert_relative_eq!(frame.position, Point3::new(0.0, 2.5, expected), epsilon = 1e-9);
    }

    #[test]
    fn camera_at_center_uses_diagonal() {
        let bounds = BoundingVolume::from_corners(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let outcome = frame_bounds(&bounds, 90.0, &camera_at([0.0, 0.0, 0.0]), &ReconcileConfig::default());
        let p = outcome.frame().position;
        assert!(p.x > 0.0);
        assert_relative_eq!(p.x, p.y, epsilon = 1e-12);
        assert_relative_eq!(p.y, p.z, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_camera_position_uses_diagonal() {
        let bounds = BoundingVolume::from_corners(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let camera = camera_at([f64::NAN, 3.0, 3.0]);
        let frame = *frame_bounds(&bounds, 60.0, &camera, &ReconcileConfig::default()).frame();

        assert!(frame.position.iter().all(|c| c.is_finite()));
        let offset = frame.position - frame.target;
        assert!(offset.x > 0.0);
        assert_relative_eq!(offset.x, offset.y, epsilon = 1e-12);
        assert_relative_eq!(offset.y, offset.z, epsilon = 1e-12);
    }

    #[test]
    fn very_distant_camera_keeps_its_direction() {
        let bounds = BoundingVolume::from_corners(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let camera = camera_at([1e200, 1.0, 1.0]);
        let frame = *frame_bounds(&bounds, 60.0, &camera, &ReconcileConfig::default()).frame();

        let expected = 1.0 / 30.0_f64.to_radians().tan() * 1.5;
        assert_relative_eq!(frame.position, Point3::new(1.0 + expected, 1.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn clip_planes_kept_when_they_already_cover_the_model() {
        let bounds = BoundingVolume::from_corners(Point3::origin(), Point3::new(10.0, 5.0, 10.0));
        let camera = CameraState {
            near: 0.05,
            far: 2000.0,
            ..Default::default()
        };
        let frame = *frame_bounds(&bounds, 60.0, &camera, &ReconcileConfig::default()).frame();
        assert_eq!(frame.near, 0.05);
        assert_eq!(frame.far, 2000.0);
    }

    #[test]
    fn clip_planes_widened_for_large_models() {
        // 5 km long site
        let bounds = BoundingVolume::from_corners(Point3::origin(), Point3::new(5000.0, 50.0, 800.0));
        let camera = CameraState::default();
        let frame = *frame_bounds(&bounds, 45.0, &camera, &ReconcileConfig::default()).frame();

        let d = (frame.position - frame.target).norm();
        assert_relative_eq!(frame.near, (d / 100.0).max(0.1), epsilon = 1e-9);
        assert_relative_eq!(frame.far, ((d + 5000.0) * 2.0).max(1000.0), epsilon = 1e-6);
        assert!(frame.far > 1000.0);
    }

    #[test]
    fn too_large_near_plane_is_replaced() {
        let bounds = BoundingVolume::from_corners(Point3::origin(), Point3::new(0.2, 0.2, 0.2));
        let camera = CameraState {
            near: 5.0,
            ..Default::default()
        };
        let frame = *frame_bounds(&bounds, 60.0, &camera, &ReconcileConfig::default()).frame();
        assert_eq!(frame.near, 0.1);
        assert_eq!(frame.far, 1000.0);
    }

    #[test]
    fn invalid_fov_uses_default() {
        let bounds = BoundingVolume::from_corners(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let camera = CameraState::default();
        let bad = frame_bounds(&bounds, 0.0, &camera, &ReconcileConfig::default());
        let good = frame_bounds(&bounds, DEFAULT_FOV_DEGREES, &camera, &ReconcileConfig::default());
        assert_eq!(bad, good);
    }
}
