//! Ray with cached reciprocal direction for the slab test.

use glam::Vec3;

/// Ray with an origin and a normalized direction.
///
/// Immutable once constructed. The reciprocal direction and per-axis sign are
/// cached so repeated box tests (one per visited octree node) avoid divisions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
  origin: Vec3,
  direction: Vec3,
  inv_direction: Vec3,
  /// 1 when the direction component is negative, 0 otherwise.
  sign: [usize; 3],
}

impl Ray {
  /// Create a ray. `direction` is normalized here; a zero vector stays zero
  /// and produces a ray that only "hits" boxes containing its origin.
  pub fn new(origin: Vec3, direction: Vec3) -> Self {
    let direction = direction.normalize_or_zero();
    let inv_direction = direction.recip();
    Self {
      origin,
      direction,
      inv_direction,
      sign: [
        (direction.x < 0.0) as usize,
        (direction.y < 0.0) as usize,
        (direction.z < 0.0) as usize,
      ],
    }
  }

  /// Ray from `origin` through `target`.
  pub fn through(origin: Vec3, target: Vec3) -> Self {
    Self::new(origin, target - origin)
  }

  #[inline]
  pub fn origin(&self) -> Vec3 {
    self.origin
  }

  #[inline]
  pub fn direction(&self) -> Vec3 {
    self.direction
  }

  /// Reciprocal of the direction. Components are infinite where the
  /// direction is zero; callers must check the direction before using them.
  #[inline]
  pub fn inv_direction(&self) -> Vec3 {
    self.inv_direction
  }

  /// Corner index (0 = min, 1 = max) that is entered first on `axis`.
  #[inline]
  pub fn sign(&self, axis: usize) -> usize {
    self.sign[axis]
  }

  /// Point at parameter `t` along the ray.
  #[inline]
  pub fn at(&self, t: f32) -> Vec3 {
    self.origin + self.direction * t
  }

  /// Ray parameter of the orthogonal projection of `point` onto the ray.
  #[inline]
  pub fn project(&self, point: Vec3) -> f32 {
    (point - self.origin).dot(self.direction)
  }

  /// Intersect with the plane through `point` with normal `normal`.
  ///
  /// Returns the ray parameter of the hit, or `None` when the ray is parallel
  /// to the plane or the plane lies behind the origin.
  pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = self.direction.dot(normal);
    if denom.abs() <= f32::EPSILON {
      return None;
    }
    let t = (point - self.origin).dot(normal) / denom;
    (t >= 0.0).then_some(t)
  }
}
