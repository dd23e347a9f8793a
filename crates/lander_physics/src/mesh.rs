//! Static triangle mesh: the vertex source the terrain octree is built from.
//!
//! Model loading is someone else's job. A loader hands over vertex positions
//! and an optional triangle index buffer; this type only stores them and
//! answers bounds queries.

use glam::Vec3;

use crate::error::MeshError;
use crate::geometry::Aabb;

/// Vertex positions plus a triangle list (3 indices per triangle).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
  vertices: Vec<Vec3>,
  indices: Vec<u32>,
}

impl Mesh {
  /// Mesh made of loose points (no triangles).
  pub fn from_points(vertices: Vec<Vec3>) -> Self {
    Self {
      vertices,
      indices: Vec::new(),
    }
  }

  /// Mesh from a vertex buffer and a triangle index buffer.
  pub fn from_triangles(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
    if indices.len() % 3 != 0 {
      return Err(MeshError::IncompleteTriangle { len: indices.len() });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
      return Err(MeshError::IndexOutOfRange {
        index,
        vertex_count: vertices.len(),
      });
    }
    Ok(Self { vertices, indices })
  }

  /// Regular grid heightfield in the X-Z plane, centered on the origin.
  ///
  /// `cols` x `rows` vertices spaced `spacing` apart, with `height(x, z)`
  /// giving the Y coordinate. Each grid cell becomes two triangles.
  pub fn heightfield<F>(cols: usize, rows: usize, spacing: f32, height: F) -> Self
  where
    F: Fn(f32, f32) -> f32,
  {
    let half_w = (cols.saturating_sub(1)) as f32 * spacing * 0.5;
    let half_d = (rows.saturating_sub(1)) as f32 * spacing * 0.5;

    let mut vertices = Vec::with_capacity(cols * rows);
    for r in 0..rows {
      for c in 0..cols {
        let x = c as f32 * spacing - half_w;
        let z = r as f32 * spacing - half_d;
        vertices.push(Vec3::new(x, height(x, z), z));
      }
    }

    let mut indices = Vec::with_capacity(cols.saturating_sub(1) * rows.saturating_sub(1) * 6);
    for r in 1..rows {
      for c in 1..cols {
        let i00 = ((r - 1) * cols + (c - 1)) as u32;
        let i10 = ((r - 1) * cols + c) as u32;
        let i01 = (r * cols + (c - 1)) as u32;
        let i11 = (r * cols + c) as u32;
        indices.extend_from_slice(&[i00, i01, i10, i10, i01, i11]);
      }
    }

    Self { vertices, indices }
  }

  /// All vertex positions.
  #[inline]
  pub fn vertices(&self) -> &[Vec3] {
    &self.vertices
  }

  /// Triangle index buffer.
  #[inline]
  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  /// Position of vertex `index`.
  ///
  /// # Panics
  /// Panics if `index` is out of range.
  #[inline]
  pub fn vertex(&self, index: u32) -> Vec3 {
    self.vertices[index as usize]
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Iterate triangles as corner positions.
  pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
    self
      .indices
      .chunks_exact(3)
      .map(|t| [self.vertex(t[0]), self.vertex(t[1]), self.vertex(t[2])])
  }

  /// Aggregate bounding box, `None` for a mesh without vertices.
  pub fn bounds(&self) -> Option<Aabb> {
    Aabb::from_points(self.vertices.iter().copied())
  }

  /// Scale every vertex component-wise about the origin.
  pub fn scale(&mut self, factor: Vec3) {
    for v in &mut self.vertices {
      *v *= factor;
    }
  }

  /// Move every vertex by `offset`.
  pub fn translate(&mut self, offset: Vec3) {
    for v in &mut self.vertices {
      *v += offset;
    }
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
