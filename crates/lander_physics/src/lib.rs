//! lander_physics - terrain collision and particle simulation for a
//! lunar-lander style game
//!
//! This crate is engine independent: it takes meshes, rays and millisecond
//! timestamps in, and hands particle state and query results back out. No
//! windowing, rendering or input handling lives here.
//!
//! # Features
//!
//! - **Geometry kernel**: `Ray` with cached reciprocal direction and the
//!   slab-method `Aabb` intersection test
//! - **Terrain octree**: arena-backed octree over mesh vertices with point,
//!   closest-vertex ray and box-overlap queries
//! - **Particles**: semi-implicit Euler integration, shared force generators
//!   (gravity, impulse, radial impulse, turbulence, cyclic, thruster)
//! - **Emitters**: continuous or one-shot spawning with directional, radial
//!   and disc spawn policies
//! - **Lander**: the collision/impulse feedback loop with thruster, exhaust and
//!   fuel budget
//!
//! # Example
//!
//! ```
//! use lander_physics::{Lander, LanderConfig, Mesh, Octree, OctreeConfig, Vec3};
//!
//! let terrain = Mesh::heightfield(32, 32, 1.0, |x, z| (x * 0.2).sin() + (z * 0.3).cos());
//! let tree = Octree::build(&terrain, OctreeConfig::default());
//!
//! let mut lander = Lander::with_seed(LanderConfig::default(), 7);
//! lander.thrust(Vec3::Y, 0.0);
//! let status = lander.update(16.0, &tree);
//! assert!(!status.contact);
//! ```

pub mod clock;
pub mod error;
pub mod geometry;
pub mod lander;
pub mod mesh;
pub mod octree;
pub mod particles;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, WallClock};
pub use error::MeshError;
pub use geometry::{Aabb, Ray, Vec3};
pub use lander::{Lander, LanderConfig, LanderStatus};
pub use mesh::Mesh;
pub use octree::{NodeId, Octree, OctreeConfig, OctreeStats, RayHit, TreeNode};
pub use particles::{
  Color, CyclicForce, EmitterConfig, EmitterKind, EmitterMarker, Force, GravityForce,
  ImpulseForce, Lifespan, Particle, ParticleEmitter, ParticleSystem, RadialImpulseForce, Step,
  ThrusterForce, TurbulenceForce,
};
