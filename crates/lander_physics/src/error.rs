//! Error types for fallible construction paths.
//!
//! Geometry and octree queries are infallible; only assembling a mesh from
//! externally supplied index data can fail.

use thiserror::Error;

/// Errors from building a [`Mesh`](crate::mesh::Mesh) out of raw buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
  /// The index buffer does not describe whole triangles.
  #[error("index buffer has {len} entries, expected a multiple of 3")]
  IncompleteTriangle {
    /// Length of the rejected index buffer.
    len: usize,
  },
  /// A triangle references a vertex that does not exist.
  #[error("vertex index {index} out of range ({vertex_count} vertices)")]
  IndexOutOfRange {
    /// Offending index.
    index: u32,
    /// Number of vertices in the mesh.
    vertex_count: usize,
  },
}
