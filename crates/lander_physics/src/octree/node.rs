//! Arena node types.

use smallvec::SmallVec;

use crate::geometry::Aabb;

/// Index of a node in the octree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  /// The root is always the first node in the arena.
  pub const ROOT: NodeId = NodeId(0);

  /// Position in the arena.
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// One node of the terrain octree.
///
/// Holds the indices of every mesh vertex inside its box. Children are only
/// created for octants that received at least one vertex, so a node without
/// children is a leaf.
#[derive(Clone, Debug)]
pub struct TreeNode {
  pub(crate) bounds: Aabb,
  pub(crate) points: Vec<u32>,
  pub(crate) children: SmallVec<[NodeId; 8]>,
  pub(crate) depth: u32,
  /// Octant of this node inside its parent (0 for the root).
  pub(crate) octant: u8,
}

impl TreeNode {
  pub(crate) fn new(bounds: Aabb, points: Vec<u32>, depth: u32, octant: u8) -> Self {
    Self {
      bounds,
      points,
      children: SmallVec::new(),
      depth,
      octant,
    }
  }

  /// Bounding box of this node.
  #[inline]
  pub fn bounds(&self) -> &Aabb {
    &self.bounds
  }

  /// Mesh vertex indices referenced by this node.
  #[inline]
  pub fn points(&self) -> &[u32] {
    &self.points
  }

  /// Child node ids (at most 8).
  #[inline]
  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  /// Distance from the root (root = 0).
  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Octant index inside the parent box (bit 0 = +X, bit 1 = +Y, bit 2 = +Z).
  #[inline]
  pub fn octant(&self) -> u8 {
    self.octant
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }
}
