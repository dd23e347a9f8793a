//! Geometry kernel: rays and axis-aligned boxes over `glam::Vec3`.
//!
//! Everything here is a pure value type. Queries never fail; absence of an
//! intersection is reported as `false` or `None`.

pub mod aabb;
pub mod ray;

pub use aabb::Aabb;
pub use ray::Ray;

/// Vector type used for positions, directions and velocities.
pub use glam::Vec3;
