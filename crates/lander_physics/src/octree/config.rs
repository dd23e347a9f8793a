//! OctreeConfig - subdivision limits for terrain octree construction.

/// Limits that decide when a node stops subdividing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctreeConfig {
  /// Maximum number of subdivision levels below the root.
  pub max_depth: u32,

  /// A node referencing this many vertices or fewer becomes a leaf.
  pub leaf_size: usize,
}

impl OctreeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, depth: u32) -> Self {
    self.max_depth = depth;
    self
  }

  pub fn with_leaf_size(mut self, size: usize) -> Self {
    self.leaf_size = size;
    self
  }

  /// Whether a node at `depth` holding `points` vertices must stay a leaf.
  #[inline]
  pub fn is_leaf(&self, depth: u32, points: usize) -> bool {
    depth >= self.max_depth || points <= self.leaf_size
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      max_depth: 7,
      leaf_size: 1,
    }
  }
}
