// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node transforms
//!
//! Scene nodes carry a 4x4 affine matrix mapping local coordinates to the
//! parent's coordinates. World space is reached by multiplying the chain of
//! parent transforms from the traversal root downward.

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Vector3};

/// Local-to-parent affine transform
pub type Transform = Matrix4<f64>;

/// Build a transform from 16 column-major values (the layout WebGL frameworks
/// and glTF use for `matrix` arrays).
///
/// The bottom row must be `[0, 0, 0, 1]`; projective matrices are rejected
/// because bounding volumes are only preserved under affine maps.
pub fn transform_from_column_major(values: &[f64]) -> Result<Transform> {
    if values.len() != 16 {
        return Err(Error::InvalidTransform(format!(
            "expected 16 values, got {}",
            values.len()
        )));
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(Error::InvalidTransform(format!("non-finite value at {}", i)));
    }

    let matrix = Matrix4::from_column_slice(values);

    let bottom = matrix.row(3);
    if bottom[0] != 0.0 || bottom[1] != 0.0 || bottom[2] != 0.0 || bottom[3] != 1.0 {
        return Err(Error::InvalidTransform(
            "bottom row must be [0, 0, 0, 1]".to_string(),
        ));
    }

    Ok(matrix)
}

/// Pure translation transform
#[inline]
pub fn translation(x: f64, y: f64, z: f64) -> Transform {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}
