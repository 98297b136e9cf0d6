//! # Mesh Module
//!
//! Triangle buffers for road surfaces.
//!
//! ## Structure
//!
//! - `MeshBuffer` - Vertices, UVs and triangles of one span or cap
//! - `strip` - Road strips between boundary point pairs
//! - `fan` - Junction caps fanned from the node position
//!
//! Winding is counter-clockwise seen from the up axis, so face normals
//! point along +up.
//!
//! ## Example
//!
//! ```rust
//! use road_geometry::mesh::MeshBuffer;
//! use glam::{DVec2, DVec3};
//!
//! let mut mesh = MeshBuffer::new();
//! let a = mesh.add_vertex(DVec3::ZERO, DVec2::ZERO);
//! let b = mesh.add_vertex(DVec3::Z, DVec2::Y);
//! let c = mesh.add_vertex(DVec3::X, DVec2::X);
//! mesh.add_triangle(a, b, c);
//! assert_eq!(mesh.triangle_count(), 1);
//! ```

pub mod fan;
pub mod strip;

pub use fan::build_fan;
pub use strip::{build_strip, road_mesh_from_polyline};

use glam::{DVec2, DVec3};
use serde::Serialize;

// =============================================================================
// MESH BUFFER
// =============================================================================

/// Triangle mesh with per-vertex UVs.
///
/// This is the output format of the mesh builder. Positions stay in `f64`
/// until [`to_flat_buffers`](Self::to_flat_buffers) converts them for
/// upload.
///
/// ## Example
///
/// ```rust
/// use road_geometry::mesh::MeshBuffer;
///
/// let mesh = MeshBuffer::new();
/// assert_eq!(mesh.vertex_count(), 0);
/// assert_eq!(mesh.triangle_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshBuffer {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,

    /// One UV per vertex.
    pub uvs: Vec<DVec2>,

    /// Vertex index triples, counter-clockwise from +up.
    pub triangles: Vec<[u32; 3]>,
}

/// Flat `f32` arrays ready for a vertex buffer upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatBuffers {
    /// `[x0, y0, z0, x1, y1, z1, ...]`
    pub positions: Vec<f32>,
    /// `[nx0, ny0, nz0, ...]`
    pub normals: Vec<f32>,
    /// `[u0, v0, u1, v1, ...]`
    pub uvs: Vec<f32>,
    /// `[i0, i1, i2, ...]`
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Create a new empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mesh with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_capacity),
            uvs: Vec::with_capacity(vertex_capacity),
            triangles: Vec::with_capacity(triangle_capacity),
        }
    }

    // =========================================================================
    // BUILDING
    // =========================================================================

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, position: DVec3, uv: DVec2) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.uvs.push(uv);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    // =========================================================================
    // QUERY METHODS
    // =========================================================================

    /// Get the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flat index count, three per triangle.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Check if mesh is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use road_geometry::mesh::MeshBuffer;
    /// use glam::{DVec2, DVec3};
    ///
    /// let mut mesh = MeshBuffer::new();
    /// mesh.add_vertex(DVec3::new(-1.0, 0.0, 2.0), DVec2::ZERO);
    /// mesh.add_vertex(DVec3::new(3.0, 1.0, -4.0), DVec2::ZERO);
    /// let (min, max) = mesh.bounding_box().unwrap();
    /// assert_eq!(min, DVec3::new(-1.0, 0.0, -4.0));
    /// assert_eq!(max, DVec3::new(3.0, 1.0, 2.0));
    /// ```
    #[must_use]
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
        )
    }

    /// Whether every index points at an existing vertex.
    #[must_use]
    pub fn indices_in_range(&self) -> bool {
        let count = self.vertices.len();
        self.triangles.iter().flatten().all(|&i| (i as usize) < count)
    }

    // =========================================================================
    // NORMALS
    // =========================================================================

    /// Unnormalized face normal of triangle `index`.
    #[must_use]
    pub fn face_normal(&self, index: usize) -> DVec3 {
        let [a, b, c] = self.triangles[index].map(|i| self.vertices[i as usize]);
        (b - a).cross(c - a)
    }

    /// Area-weighted vertex normals.
    ///
    /// Vertices not referenced by any non-degenerate triangle get a zero
    /// normal.
    #[must_use]
    pub fn compute_normals(&self) -> Vec<DVec3> {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];
        for (index, triangle) in self.triangles.iter().enumerate() {
            let face = self.face_normal(index);
            for &v in triangle {
                normals[v as usize] += face;
            }
        }
        normals.into_iter().map(DVec3::normalize_or_zero).collect()
    }

    // =========================================================================
    // MERGE OPERATIONS
    // =========================================================================

    /// Merge another mesh into this one.
    ///
    /// Indices are adjusted to account for existing vertices.
    pub fn merge(&mut self, other: &MeshBuffer) {
        let vertex_offset = self.vertex_count() as u32;

        self.vertices.extend_from_slice(&other.vertices);
        self.uvs.extend_from_slice(&other.uvs);

        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| t.map(|idx| idx + vertex_offset)),
        );
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Converts to flat `f32` arrays with computed normals.
    #[must_use]
    pub fn to_flat_buffers(&self) -> FlatBuffers {
        let normals = self.compute_normals();
        FlatBuffers {
            positions: self
                .vertices
                .iter()
                .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .collect(),
            normals: normals
                .iter()
                .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
                .collect(),
            uvs: self.uvs.iter().flat_map(|uv| [uv.x as f32, uv.y as f32]).collect(),
            indices: self.triangles.iter().flatten().copied().collect(),
        }
    }
}
