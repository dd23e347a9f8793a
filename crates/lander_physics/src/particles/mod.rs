//! Particle simulation: particles, shared force generators, particle systems
//! and emitters.
//!
//! ```text
//! ParticleEmitter ──spawns──▶ ParticleSystem ◀──registered── Rc<dyn Force>
//!                                  │
//!                                  └── Vec<Particle>  (index 0 = primary)
//! ```

pub mod emitter;
pub mod force;
pub mod particle;
pub mod system;

pub use emitter::{
  EmitterConfig, EmitterKind, EmitterMarker, EmitterState, EmitterSystem, Lifespan,
  ParticleEmitter,
};
pub use force::{
  CyclicForce, Force, GravityForce, ImpulseForce, RadialImpulseForce, Step, ThrusterForce,
  TurbulenceForce,
};
pub use particle::{Color, Particle};
pub use system::{ParticleSystem, SystemStats};
