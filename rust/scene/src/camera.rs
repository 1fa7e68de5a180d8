// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Perspective camera state as owned by the rendering framework.

use ifc_viewport_geometry::Point3;
use serde::{Deserialize, Serialize};

/// Default near clip distance
pub const DEFAULT_NEAR: f64 = 0.1;
/// Default far clip distance
pub const DEFAULT_FAR: f64 = 1000.0;
/// Default vertical field of view in degrees
pub const DEFAULT_FOV_DEGREES: f64 = 45.0;

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: [f64; 3],
    pub target: [f64; 3],
    /// Vertical field of view in degrees
    pub fov: f64,
    pub near: f64,
    pub far: f64,
}

impl CameraState {
    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.position)
    }

    pub fn target(&self) -> Point3<f64> {
        Point3::from(self.target)
    }

    /// Overwrites position, target and clip planes; fov is left alone.
    pub fn apply(&mut self, frame: &CameraFrame) {
        self.position = frame.position.into();
        self.target = frame.target.into();
        self.near = frame.near;
        self.far = frame.far;
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: [10.0, 10.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

/// Position, look-at target and clip distances: everything that decides what
/// the camera sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub near: f64,
    pub far: f64,
}
