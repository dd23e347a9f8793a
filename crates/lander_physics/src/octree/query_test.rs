use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::mesh::Mesh;
use crate::octree::OctreeConfig;

fn grid_mesh(n: usize) -> Mesh {
  let mut points = Vec::with_capacity(n * n * n);
  for x in 0..n {
    for y in 0..n {
      for z in 0..n {
        points.push(Vec3::new(x as f32, y as f32, z as f32));
      }
    }
  }
  Mesh::from_points(points)
}

/// Reference ray query: scan every leaf the ray enters, keep the vertex with
/// the smallest non-negative projection (ties to the lower index).
fn brute_force_ray(tree: &Octree, ray: &Ray) -> Option<(u32, f32)> {
  let mut best: Option<(u32, f32)> = None;
  for id in tree.leaves() {
    let leaf = tree.node(id);
    if !leaf.bounds().intersect(ray, 0.0, f32::INFINITY) {
      continue;
    }
    for &v in leaf.points() {
      let t = (tree.mesh().vertex(v) - ray.origin()).dot(ray.direction());
      if t < 0.0 {
        continue;
      }
      let better = match best {
        None => true,
        Some((bv, bt)) => t < bt || (t == bt && v < bv),
      };
      if better {
        best = Some((v, t));
      }
    }
  }
  best
}

// =========================================================================
// Point queries
// =========================================================================

/// Every source vertex is contained by some leaf.
#[test]
fn test_every_vertex_is_found() {
  let mesh = grid_mesh(4);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  for (i, &v) in mesh.vertices().iter().enumerate() {
    let leaf = tree.locate_point(v).unwrap_or_else(|| panic!("vertex {} not found", i));
    assert!(tree.node(leaf).points().contains(&(i as u32)));
  }
}

#[test]
fn test_every_terrain_vertex_is_found() {
  let mesh = Mesh::heightfield(17, 13, 0.75, |x, z| (x * 0.4).sin() * 2.0 + (z * 0.3).cos());
  let tree = Octree::build(&mesh, OctreeConfig::default());
  for &v in mesh.vertices() {
    assert!(tree.intersect_point(v), "terrain vertex {:?} missed", v);
  }
}

#[test]
fn test_point_outside_tree() {
  let mesh = grid_mesh(3);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  assert!(!tree.intersect_point(Vec3::new(5.0, 1.0, 1.0)));
  assert!(!tree.intersect_point(Vec3::new(1.0, -0.001, 1.0)));
}

/// Inside the root box but in an octant with no vertices.
#[test]
fn test_point_in_empty_octant() {
  let mesh = Mesh::from_points(vec![Vec3::ZERO, Vec3::splat(4.0)]);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  assert!(!tree.intersect_point(Vec3::new(3.0, 1.0, 1.0)));
  assert!(tree.intersect_point(Vec3::splat(0.5)), "same leaf box as the origin vertex");
}

// =========================================================================
// Ray queries
// =========================================================================

#[test]
fn test_ray_straight_down_hits_top_vertex() {
  let mesh = grid_mesh(3);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);

  let hit = tree.intersect_ray(&ray).expect("ray crosses the grid");
  assert_eq!(hit.position, Vec3::new(0.0, 2.0, 0.0));
  assert!((hit.t - 8.0).abs() < 1e-5);
  assert!(tree.node(hit.node).is_leaf());
  assert!(tree.node(hit.node).points().contains(&hit.vertex));
}

#[test]
fn test_ray_miss() {
  let mesh = grid_mesh(3);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  let away = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
  let beside = Ray::new(Vec3::new(10.0, 10.0, 10.0), Vec3::X);
  assert!(tree.intersect_ray(&away).is_none());
  assert!(tree.intersect_ray(&beside).is_none());
}

#[test]
fn test_ray_matches_brute_force_on_grid() {
  let mesh = grid_mesh(3);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  let mut rng = StdRng::seed_from_u64(0x0C7_4EE);
  let mut hits = 0;

  for _ in 0..500 {
    let origin = Vec3::new(
      rng.random_range(-6.0..8.0),
      rng.random_range(-6.0..8.0),
      rng.random_range(-6.0..8.0),
    );
    let target = Vec3::new(
      rng.random_range(-0.5..2.5),
      rng.random_range(-0.5..2.5),
      rng.random_range(-0.5..2.5),
    );
    let ray = Ray::through(origin, target);

    let expected = brute_force_ray(&tree, &ray);
    let actual = tree.intersect_ray(&ray).map(|h| (h.vertex, h.t));
    assert_eq!(actual, expected, "ray {:?}", ray);
    hits += expected.is_some() as usize;
  }
  assert!(hits > 100, "too few rays hit the grid ({})", hits);
}

// =========================================================================
// Box queries
// =========================================================================

#[test]
fn test_box_query_matches_brute_force() {
  let mesh = grid_mesh(4);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  let query = Aabb::new(Vec3::new(0.8, 0.8, 0.8), Vec3::new(2.2, 1.2, 1.6));

  let mut found = tree.overlapping_leaves(&query);
  let mut expected: Vec<NodeId> = tree
    .leaves()
    .filter(|&id| tree.node(id).bounds().overlaps(&query))
    .collect();
  found.sort();
  expected.sort();
  assert!(!found.is_empty());
  assert_eq!(found, expected);
}

#[test]
fn test_box_query_appends() {
  let mesh = grid_mesh(3);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  let mut out = vec![NodeId::ROOT];
  tree.intersect_box(&Aabb::new(Vec3::splat(-0.1), Vec3::splat(0.1)), &mut out);
  assert_eq!(out[0], NodeId::ROOT, "existing entries are kept");
  assert_eq!(out.len(), 2, "only the origin leaf overlaps");
  assert_eq!(tree.node(out[1]).points(), &[0]);
}

#[test]
fn test_box_query_disjoint() {
  let mesh = grid_mesh(3);
  let tree = Octree::build(&mesh, OctreeConfig::default());
  let far = Aabb::new(Vec3::splat(10.0), Vec3::splat(11.0));
  assert!(tree.overlapping_leaves(&far).is_empty());
}
