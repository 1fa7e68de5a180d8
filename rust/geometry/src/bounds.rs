// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World-space axis-aligned bounding volumes
//!
//! A [`BoundingVolume`] is a plain value: it is built fresh from geometry,
//! combined by value and never updated behind the caller's back. The empty
//! volume is an explicit state, so callers never see the `f64::MAX` seeds
//! used while accumulating.

use nalgebra::{Point3, Vector3};

/// Axis-aligned min/max corner pair in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    min: Point3<f64>,
    max: Point3<f64>,
    /// Number of points folded in
    sample_count: usize,
}

impl BoundingVolume {
    /// Create an empty volume (contains nothing)
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
            sample_count: 0,
        }
    }

    /// Create a volume spanning two corners, in any order
    pub fn from_corners(a: Point3<f64>, b: Point3<f64>) -> Self {
        let mut volume = Self::empty();
        volume.expand(&a);
        volume.expand(&b);
        volume
    }

    /// Create the smallest volume enclosing all `points`
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut volume = Self::empty();
        for p in points {
            volume.expand(p);
        }
        volume
    }

    /// True if no point has been added
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Number of points folded into this volume
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Expand to include a point. Non-finite points are ignored.
    #[inline]
    pub fn expand(&mut self, p: &Point3<f64>) {
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return;
        }
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
        self.sample_count += 1;
    }

    /// Smallest volume enclosing both `self` and `other`
    pub fn union(&self, other: &BoundingVolume) -> BoundingVolume {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        BoundingVolume {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
            sample_count: self.sample_count + other.sample_count,
        }
    }

    /// Minimum corner, or `None` for an empty volume
    pub fn min(&self) -> Option<Point3<f64>> {
        (!self.is_empty()).then_some(self.min)
    }

    /// Maximum corner, or `None` for an empty volume
    pub fn max(&self) -> Option<Point3<f64>> {
        (!self.is_empty()).then_some(self.max)
    }

    /// Midpoint of the volume (origin when empty)
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        if self.is_empty() {
            return Point3::origin();
        }
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis (zero when empty)
    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    /// Largest of the three extents
    #[inline]
    pub fn max_dimension(&self) -> f64 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    /// True when the extent is zero along all three axes.
    ///
    /// Holds for the empty volume and for geometry collapsed to a single point.
    #[inline]
    pub fn is_zero_size(&self) -> bool {
        let size = self.size();
        size.x == 0.0 && size.y == 0.0 && size.z == 0.0
    }
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::empty()
    }
}
