// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Viewport Geometry
//!
//! Triangle mesh buffers as handed over by the model loader, world-space
//! axis-aligned bounding volumes, and affine node transforms built on nalgebra.

pub mod bounds;
pub mod error;
pub mod mesh;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use bounds::BoundingVolume;
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use transform::{transform_from_column_major, Transform};
