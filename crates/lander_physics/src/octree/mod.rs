//! Terrain octree for collision and picking queries.
//!
//! The tree is built once from a static [`Mesh`] and is read-only afterwards.
//! Nodes live in a flat arena and refer to their children by [`NodeId`], so
//! dropping the tree is a single deallocation rather than a recursive walk.
//!
//! # Octant Convention
//!
//! ```text
//! octant = (x >= cx) | (y >= cy) << 1 | (z >= cz) << 2
//! ```
//!
//! A vertex lying exactly on a splitting plane goes to the positive side, so
//! every vertex of a node ends up in exactly one child.
//!
//! # Module Structure
//!
//! - [`config`]: `OctreeConfig` - depth and leaf-size limits
//! - [`node`]: `TreeNode`, `NodeId` - arena entries
//! - [`query`]: point, ray and box queries

pub mod config;
pub mod node;
pub mod query;

use crate::geometry::Aabb;
use crate::mesh::Mesh;

pub use config::OctreeConfig;
pub use node::{NodeId, TreeNode};
pub use query::RayHit;

/// Summary of a built tree, logged after construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
  /// Total nodes in the arena.
  pub nodes: usize,
  /// Nodes without children.
  pub leaves: usize,
  /// Deepest level that was actually created.
  pub depth: u32,
  /// Vertices referenced by the root.
  pub vertices: usize,
}

/// Octree over the vertices of a borrowed mesh.
///
/// The tree borrows its mesh, so it can never outlive the vertex data its
/// indices point into.
#[derive(Clone, Debug)]
pub struct Octree<'m> {
  mesh: &'m Mesh,
  config: OctreeConfig,
  nodes: Vec<TreeNode>,
}

impl<'m> Octree<'m> {
  /// Build the tree for `mesh`.
  ///
  /// The root box is the mesh bounds. An empty mesh yields a single empty
  /// leaf that never reports a hit.
  #[tracing::instrument(skip_all, name = "octree::build", fields(vertices = mesh.vertex_count()))]
  pub fn build(mesh: &'m Mesh, config: OctreeConfig) -> Self {
    let bounds = mesh.bounds().unwrap_or_default();
    let points: Vec<u32> = (0..mesh.vertex_count() as u32).collect();

    let mut tree = Self {
      mesh,
      config,
      nodes: vec![TreeNode::new(bounds, points, 0, 0)],
    };
    tree.subdivide(NodeId::ROOT);

    let stats = tree.stats();
    tracing::debug!(
      nodes = stats.nodes,
      leaves = stats.leaves,
      depth = stats.depth,
      "octree built"
    );
    tree
  }

  /// Partition a node's vertices into child octants and recurse.
  fn subdivide(&mut self, id: NodeId) {
    let mesh = self.mesh;
    let (bounds, depth, buckets) = {
      let node = &self.nodes[id.index()];
      if self.config.is_leaf(node.depth, node.points.len()) {
        return;
      }

      let mut buckets: [Vec<u32>; 8] = Default::default();
      for &index in &node.points {
        let octant = node.bounds.octant_of(mesh.vertex(index));
        buckets[octant as usize].push(index);
      }
      (node.bounds, node.depth, buckets)
    };

    for (octant, points) in buckets.into_iter().enumerate() {
      if points.is_empty() {
        continue;
      }
      let octant = octant as u8;
      let child = NodeId(self.nodes.len() as u32);
      self
        .nodes
        .push(TreeNode::new(bounds.octant(octant), points, depth + 1, octant));
      self.nodes[id.index()].children.push(child);
      self.subdivide(child);
    }
  }

  /// Source mesh the vertex indices refer to.
  #[inline]
  pub fn mesh(&self) -> &'m Mesh {
    self.mesh
  }

  #[inline]
  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  /// Root node id.
  #[inline]
  pub fn root(&self) -> NodeId {
    NodeId::ROOT
  }

  /// Bounding box of the whole tree.
  #[inline]
  pub fn bounds(&self) -> &Aabb {
    &self.nodes[NodeId::ROOT.index()].bounds
  }

  /// Look up a node.
  ///
  /// # Panics
  /// Panics if `id` did not come from this tree.
  #[inline]
  pub fn node(&self, id: NodeId) -> &TreeNode {
    &self.nodes[id.index()]
  }

  /// True when the tree references no vertices at all.
  pub fn is_empty(&self) -> bool {
    self.nodes[NodeId::ROOT.index()].points.is_empty()
  }

  /// Number of nodes in the arena.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// All nodes with their ids, in creation (depth-first) order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .map(|(i, node)| (NodeId(i as u32), node))
  }

  /// Ids of all leaf nodes.
  pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.iter().filter(|(_, n)| n.is_leaf()).map(|(id, _)| id)
  }

  /// Ids of all nodes at exactly `depth` (root = 0).
  pub fn nodes_at_depth(&self, depth: u32) -> impl Iterator<Item = NodeId> + '_ {
    self
      .iter()
      .filter(move |(_, n)| n.depth == depth)
      .map(|(id, _)| id)
  }

  /// Node/leaf counts and reached depth.
  pub fn stats(&self) -> OctreeStats {
    OctreeStats {
      nodes: self.nodes.len(),
      leaves: self.nodes.iter().filter(|n| n.is_leaf()).count(),
      depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
      vertices: self.nodes[NodeId::ROOT.index()].points.len(),
    }
  }
}
