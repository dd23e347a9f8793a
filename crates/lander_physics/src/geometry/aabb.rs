//! Axis-aligned bounding box with the slab ray test from Williams et al.,
//! "An Efficient and Robust Ray-Box Intersection Algorithm" (JGT 2005).

use glam::Vec3;

use super::Ray;

/// Axis-aligned bounding box.
///
/// Callers must supply ordered corners (`min <= max` on every axis). This is
/// not checked: an inverted box simply never contains or overlaps anything.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Aabb {
  /// Minimum corner (inclusive).
  pub min: Vec3,
  /// Maximum corner (inclusive).
  pub max: Vec3,
}

impl Aabb {
  /// Create a box from its min and max corners.
  pub const fn new(min: Vec3, max: Vec3) -> Self {
    Self { min, max }
  }

  /// Tightest box around `points`, or `None` for an empty iterator.
  pub fn from_points<I>(points: I) -> Option<Self>
  where
    I: IntoIterator<Item = Vec3>,
  {
    let mut points = points.into_iter();
    let first = points.next()?;
    Some(points.fold(Self::new(first, first), |mut aabb, p| {
      aabb.min = aabb.min.min(p);
      aabb.max = aabb.max.max(p);
      aabb
    }))
  }

  /// Corner by index: 0 = min, 1 = max.
  #[inline]
  pub fn corner(&self, index: usize) -> Vec3 {
    if index == 0 {
      self.min
    } else {
      self.max
    }
  }

  /// Size of the box (max - min).
  #[inline]
  pub fn size(&self) -> Vec3 {
    self.max - self.min
  }

  /// Center of the box.
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.max - self.min) / 2.0 + self.min
  }

  /// Same box shifted by `offset`.
  #[inline]
  pub fn translated(&self, offset: Vec3) -> Self {
    Self::new(self.min + offset, self.max + offset)
  }

  /// Slab test against `ray`, restricted to parameters in `[t0, t1]`.
  ///
  /// A zero direction component means the ray runs parallel to that slab: it
  /// misses if its origin is outside the slab, otherwise the axis does not
  /// narrow the interval. This keeps `0 * inf` NaNs out of the comparison.
  pub fn intersect(&self, ray: &Ray, t0: f32, t1: f32) -> bool {
    let origin = ray.origin();
    let direction = ray.direction();
    let inv = ray.inv_direction();

    let mut tmin = t0;
    let mut tmax = t1;
    for axis in 0..3 {
      if direction[axis] == 0.0 {
        if origin[axis] < self.min[axis] || origin[axis] > self.max[axis] {
          return false;
        }
        continue;
      }

      let sign = ray.sign(axis);
      let near = (self.corner(sign)[axis] - origin[axis]) * inv[axis];
      let far = (self.corner(1 - sign)[axis] - origin[axis]) * inv[axis];

      if near > tmin {
        tmin = near;
      }
      if far < tmax {
        tmax = far;
      }
      if tmin > tmax {
        return false;
      }
    }
    true
  }

  /// Check if `point` lies inside the box (boundary included).
  #[inline]
  pub fn contains_point(&self, point: Vec3) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }

  /// Check that every point of `points` lies inside the box.
  ///
  /// An empty slice is trivially inside.
  pub fn contains_points(&self, points: &[Vec3]) -> bool {
    points.iter().all(|p| self.contains_point(*p))
  }

  /// Closed-interval overlap test; boxes touching at a face overlap.
  #[inline]
  pub fn overlaps(&self, other: &Aabb) -> bool {
    self.min.x <= other.max.x
      && self.max.x >= other.min.x
      && self.min.y <= other.max.y
      && self.max.y >= other.min.y
      && self.min.z <= other.max.z
      && self.max.z >= other.min.z
  }

  /// Octant of `point` relative to the box center.
  ///
  /// Bit 0 = +X, bit 1 = +Y, bit 2 = +Z. A coordinate equal to the center
  /// belongs to the positive side, so every point maps to exactly one octant.
  #[inline]
  pub fn octant_of(&self, point: Vec3) -> u8 {
    let c = self.center();
    (point.x >= c.x) as u8 | ((point.y >= c.y) as u8) << 1 | ((point.z >= c.z) as u8) << 2
  }

  /// The 1/8 sub-volume for `octant` (same bit layout as [`Aabb::octant_of`]).
  pub fn octant(&self, octant: u8) -> Aabb {
    let c = self.center();
    let pick = |bit: u8, lo: f32, mid: f32, hi: f32| {
      if octant & bit != 0 {
        (mid, hi)
      } else {
        (lo, mid)
      }
    };
    let (min_x, max_x) = pick(1, self.min.x, c.x, self.max.x);
    let (min_y, max_y) = pick(2, self.min.y, c.y, self.max.y);
    let (min_z, max_z) = pick(4, self.min.z, c.z, self.max.z);
    Aabb::new(
      Vec3::new(min_x, min_y, min_z),
      Vec3::new(max_x, max_y, max_z),
    )
  }
}

#[cfg(test)]
#[path = "aabb_test.rs"]
mod aabb_test;
