// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::bounds::BoundingVolume;
use crate::error::{Error, Result};
use crate::transform::Transform;
use nalgebra::{Point3, Vector3};

/// Triangle mesh, in the flat buffer layout the loader hands over
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz), may be empty
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Build a mesh from raw buffers, validating layout once at ingestion.
    ///
    /// Normals are left empty; the reconciliation pipeline never reads them.
    pub fn from_buffers(positions: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::MisalignedPositions(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(Error::MisalignedIndices(indices.len()));
        }
        if let Some(i) = positions.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteCoordinate(i));
        }
        let vertex_count = positions.len() / 3;
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(Self {
            positions,
            normals: Vec::new(),
            indices,
        })
    }

    /// Axis-aligned box spanning `min`..`max`, 8 vertices and 12 triangles
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let mut mesh = Self::with_capacity(8, 36);
        for i in 0..8u32 {
            let x = if i & 1 == 0 { min.x } else { max.x };
            let y = if i & 2 == 0 { min.y } else { max.y };
            let z = if i & 4 == 0 { min.z } else { max.z };
            let p = Point3::new(x, y, z);
            let n = (p - nalgebra::center(&min, &max)).try_normalize(1e-12);
            mesh.add_vertex(p, n.unwrap_or_else(Vector3::z));
        }
        #[rustfmt::skip]
        const FACES: [[u32; 3]; 12] = [
            [0, 2, 1], [1, 2, 3], // -z
            [4, 5, 6], [5, 7, 6], // +z
            [0, 1, 4], [1, 5, 4], // -y
            [2, 6, 3], [3, 6, 7], // +y
            [0, 4, 2], [2, 4, 6], // -x
            [1, 3, 5], [3, 7, 5], // +x
        ];
        for [a, b, c] in FACES {
            mesh.add_triangle(a, b, c);
        }
        mesh
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over vertex positions in f64
    pub fn points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64))
    }

    /// Bounds of every vertex mapped through `world` (exact, not corner-based)
    pub fn world_bounds(&self, world: &Transform) -> BoundingVolume {
        let mut volume = BoundingVolume::empty();
        self.points()
            .for_each(|p| volume.expand(&world.transform_point(&p)));
        volume
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
