use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;

fn unit_box() -> Aabb {
  Aabb::new(Vec3::ZERO, Vec3::ONE)
}

/// Independent reference: per-axis division, explicit min/max ordering.
///
/// Returns the clipped parameter interval, or `None` when a parallel axis
/// already rules the ray out.
fn brute_force_interval(aabb: &Aabb, origin: Vec3, dir: Vec3, t0: f32, t1: f32) -> Option<(f32, f32)> {
  let mut lo = t0;
  let mut hi = t1;
  for axis in 0..3 {
    if dir[axis] == 0.0 {
      if origin[axis] < aabb.min[axis] || origin[axis] > aabb.max[axis] {
        return None;
      }
      continue;
    }
    let a = (aabb.min[axis] - origin[axis]) / dir[axis];
    let b = (aabb.max[axis] - origin[axis]) / dir[axis];
    lo = lo.max(a.min(b));
    hi = hi.min(a.max(b));
  }
  Some((lo, hi))
}

fn random_box(rng: &mut StdRng) -> Aabb {
  let a = Vec3::new(
    rng.random_range(-10.0..10.0),
    rng.random_range(-10.0..10.0),
    rng.random_range(-10.0..10.0),
  );
  let b = Vec3::new(
    rng.random_range(-10.0..10.0),
    rng.random_range(-10.0..10.0),
    rng.random_range(-10.0..10.0),
  );
  Aabb::new(a.min(b), a.max(b))
}

fn random_direction(rng: &mut StdRng) -> Vec3 {
  let mut dir = Vec3::ZERO;
  for axis in 0..3 {
    // Roughly a third of the components are exactly zero (axis-aligned rays).
    if !rng.random_bool(0.35) {
      dir[axis] = rng.random_range(-1.0..1.0);
    }
  }
  if dir.length_squared() < 1e-6 {
    dir = Vec3::Y;
  }
  dir
}

// =========================================================================
// Ray intersection
// =========================================================================

#[test]
fn test_intersect_straight_through() {
  let ray = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z);
  assert!(unit_box().intersect(&ray, 0.0, 100.0));
}

#[test]
fn test_intersect_miss_beside() {
  let ray = Ray::new(Vec3::new(2.0, 0.5, -5.0), Vec3::Z);
  assert!(!unit_box().intersect(&ray, 0.0, 100.0));
}

#[test]
fn test_intersect_box_behind_origin() {
  let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::Z);
  assert!(!unit_box().intersect(&ray, 0.0, 100.0));
}

#[test]
fn test_intersect_respects_interval() {
  let ray = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z);
  // Box spans t in [5, 6].
  assert!(!unit_box().intersect(&ray, 0.0, 4.0));
  assert!(!unit_box().intersect(&ray, 7.0, 100.0));
  assert!(unit_box().intersect(&ray, 5.5, 5.6));
}

#[test]
fn test_intersect_origin_inside() {
  let ray = Ray::new(Vec3::splat(0.5), Vec3::new(1.0, -2.0, 0.3));
  assert!(unit_box().intersect(&ray, 0.0, 100.0));
}

/// Parallel to two slabs with the origin inside them: must hit, not NaN-miss.
#[test]
fn test_intersect_axis_aligned_inside_slab() {
  let ray = Ray::new(Vec3::new(0.0, 0.5, -3.0), Vec3::Z);
  assert!(unit_box().intersect(&ray, 0.0, 100.0), "origin on x = min face");
}

#[test]
fn test_intersect_axis_aligned_outside_slab() {
  let ray = Ray::new(Vec3::new(0.5, 1.5, -3.0), Vec3::Z);
  assert!(!unit_box().intersect(&ray, 0.0, 100.0));
}

#[test]
fn test_intersect_negative_zero_direction() {
  let ray = Ray::new(Vec3::new(0.5, 0.5, 3.0), Vec3::new(-0.0, 0.0, -1.0));
  assert!(unit_box().intersect(&ray, 0.0, 100.0));
}

/// Slab test agrees with an independent computation on random boxes/rays.
#[test]
fn test_intersect_matches_brute_force() {
  let mut rng = StdRng::seed_from_u64(0x5EED_0001);
  let mut checked = 0;

  for _ in 0..2000 {
    let aabb = random_box(&mut rng);
    let origin = Vec3::new(
      rng.random_range(-15.0..15.0),
      rng.random_range(-15.0..15.0),
      rng.random_range(-15.0..15.0),
    );
    let ray = Ray::new(origin, random_direction(&mut rng));
    let (t0, t1) = (0.0, rng.random_range(1.0..60.0));

    let expected = match brute_force_interval(&aabb, ray.origin(), ray.direction(), t0, t1) {
      None => false,
      Some((lo, hi)) => {
        // Skip grazing cases where rounding decides the answer.
        if (hi - lo).abs() < 1e-3 {
          continue;
        }
        lo <= hi
      }
    };

    assert_eq!(
      aabb.intersect(&ray, t0, t1),
      expected,
      "box {:?} ray {:?} interval [{}, {}]",
      aabb,
      ray,
      t0,
      t1
    );
    checked += 1;
  }

  assert!(checked >= 1000, "only {} non-degenerate cases checked", checked);
}

// =========================================================================
// Containment and overlap
// =========================================================================

#[test]
fn test_contains_point_inclusive() {
  let aabb = unit_box();
  assert!(aabb.contains_point(Vec3::splat(0.5)));
  assert!(aabb.contains_point(Vec3::ZERO));
  assert!(aabb.contains_point(Vec3::ONE));
  assert!(!aabb.contains_point(Vec3::new(1.01, 0.5, 0.5)));
  assert!(!aabb.contains_point(Vec3::new(0.5, -0.01, 0.5)));
}

/// Every point is tested, not just the first.
#[test]
fn test_contains_points_checks_all() {
  let aabb = unit_box();
  assert!(aabb.contains_points(&[Vec3::splat(0.1), Vec3::splat(0.9)]));
  assert!(!aabb.contains_points(&[Vec3::splat(0.1), Vec3::splat(2.0)]));
  assert!(aabb.contains_points(&[]));
}

#[test]
fn test_overlaps_touching_and_disjoint() {
  let a = unit_box();
  let touching = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
  let disjoint = Aabb::new(Vec3::splat(1.5), Vec3::splat(2.0));
  assert!(a.overlaps(&touching));
  assert!(!a.overlaps(&disjoint));
}

#[test]
fn test_overlaps_symmetric_and_reflexive() {
  let mut rng = StdRng::seed_from_u64(0x5EED_0002);
  for _ in 0..500 {
    let a = random_box(&mut rng);
    let b = random_box(&mut rng);
    assert_eq!(a.overlaps(&b), b.overlaps(&a), "{:?} vs {:?}", a, b);
    assert!(a.overlaps(&a));
  }
}

#[test]
fn test_center_and_size() {
  let aabb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(3.0, 2.0, 1.0));
  assert_eq!(aabb.center(), Vec3::new(1.0, 0.0, -1.0));
  assert_eq!(aabb.size(), Vec3::new(4.0, 4.0, 4.0));
}

#[test]
fn test_from_points() {
  let aabb = Aabb::from_points([
    Vec3::new(1.0, 5.0, -2.0),
    Vec3::new(-3.0, 0.0, 4.0),
    Vec3::new(0.0, 2.0, 0.0),
  ])
  .expect("non-empty input");
  assert_eq!(aabb.min, Vec3::new(-3.0, 0.0, -2.0));
  assert_eq!(aabb.max, Vec3::new(1.0, 5.0, 4.0));
  assert!(Aabb::from_points(std::iter::empty()).is_none());
}

// =========================================================================
// Octants
// =========================================================================

#[test]
fn test_octant_of_ties_go_positive() {
  let aabb = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
  assert_eq!(aabb.octant_of(Vec3::splat(0.5)), 0);
  assert_eq!(aabb.octant_of(Vec3::splat(1.0)), 7, "center maps to +X+Y+Z");
  assert_eq!(aabb.octant_of(Vec3::new(1.0, 0.0, 0.0)), 1);
  assert_eq!(aabb.octant_of(Vec3::new(0.0, 1.5, 0.0)), 2);
  assert_eq!(aabb.octant_of(Vec3::new(0.0, 0.0, 2.0)), 4);
}

#[test]
fn test_octants_tile_parent() {
  let parent = Aabb::new(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 8.0, 6.0));
  let total: f32 = (0..8u8)
    .map(|o| {
      let s = parent.octant(o).size();
      s.x * s.y * s.z
    })
    .sum();
  let s = parent.size();
  assert!((total - s.x * s.y * s.z).abs() < 1e-4);

  for o in 0..8u8 {
    let child = parent.octant(o);
    assert!(parent.contains_points(&[child.min, child.max]), "octant {}", o);
    assert_eq!(parent.octant_of(child.center()), o, "octant {} center", o);
  }
}
