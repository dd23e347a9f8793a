//! Point, ray and box queries against a built [`Octree`].
//!
//! All queries treat an empty tree as "no hit" and never panic.

use glam::Vec3;

use super::{NodeId, Octree};
use crate::geometry::{Aabb, Ray};

/// Closest vertex found by a ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
  /// Leaf containing the vertex.
  pub node: NodeId,
  /// Index of the vertex in the source mesh.
  pub vertex: u32,
  /// Vertex position.
  pub position: Vec3,
  /// Ray parameter of the vertex projected onto the ray.
  pub t: f32,
}

impl RayHit {
  /// Prefer the smaller ray parameter, then the smaller vertex index.
  fn is_closer_than(&self, other: &RayHit) -> bool {
    self.t < other.t || (self.t == other.t && self.vertex < other.vertex)
  }
}

impl<'m> Octree<'m> {
  /// Leaf whose box contains `point`, following the octant tie rule.
  ///
  /// Returns `None` when the point is outside the tree, falls into an octant
  /// without vertices, or the reached leaf is empty.
  pub fn locate_point(&self, point: Vec3) -> Option<NodeId> {
    let mut id = self.root();
    if !self.node(id).bounds.contains_point(point) {
      return None;
    }

    loop {
      let node = self.node(id);
      if node.is_leaf() {
        let hit = !node.points.is_empty() && node.bounds.contains_point(point);
        return hit.then_some(id);
      }
      let octant = node.bounds.octant_of(point);
      id = node
        .children
        .iter()
        .copied()
        .find(|&child| self.node(child).octant == octant)?;
    }
  }

  /// Point collision test: true when `point` is inside a non-empty leaf.
  pub fn intersect_point(&self, point: Vec3) -> bool {
    self.locate_point(point).is_some()
  }

  /// Closest-vertex ray query.
  ///
  /// Visits every node whose box the ray enters (`t >= 0`) and, among the
  /// vertices of the leaves reached, returns the one with the smallest
  /// non-negative ray parameter.
  pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
    if self.is_empty() || !self.bounds().intersect(ray, 0.0, f32::INFINITY) {
      return None;
    }

    let mut best = None;
    self.descend_ray(self.root(), ray, &mut best);
    if let Some(hit) = &best {
      tracing::trace!(vertex = hit.vertex, t = hit.t, "ray hit");
    }
    best
  }

  fn descend_ray(&self, id: NodeId, ray: &Ray, best: &mut Option<RayHit>) {
    let node = self.node(id);
    if node.is_leaf() {
      for &vertex in &node.points {
        let position = self.mesh.vertex(vertex);
        let t = ray.project(position);
        if t < 0.0 {
          continue;
        }
        let candidate = RayHit {
          node: id,
          vertex,
          position,
          t,
        };
        if best.as_ref().map_or(true, |b| candidate.is_closer_than(b)) {
          *best = Some(candidate);
        }
      }
      return;
    }

    for &child in &node.children {
      if self.node(child).bounds.intersect(ray, 0.0, f32::INFINITY) {
        self.descend_ray(child, ray, best);
      }
    }
  }

  /// Append every leaf whose box overlaps `query` to `out`.
  ///
  /// Used to collect candidate terrain boxes around a moving bounded object.
  pub fn intersect_box(&self, query: &Aabb, out: &mut Vec<NodeId>) {
    if self.is_empty() {
      return;
    }
    self.descend_box(self.root(), query, out);
  }

  /// Convenience wrapper around [`Octree::intersect_box`].
  pub fn overlapping_leaves(&self, query: &Aabb) -> Vec<NodeId> {
    let mut out = Vec::new();
    self.intersect_box(query, &mut out);
    out
  }

  fn descend_box(&self, id: NodeId, query: &Aabb, out: &mut Vec<NodeId>) {
    let node = self.node(id);
    if !node.bounds.overlaps(query) {
      return;
    }
    if node.is_leaf() {
      out.push(id);
      return;
    }
    for &child in &node.children {
      self.descend_box(child, query, out);
    }
  }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
