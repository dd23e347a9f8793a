//! Force generators.
//!
//! A force is shared by reference (`Rc<dyn Force>`) and may be registered on
//! several particle systems at once. Forces carrying runtime state (pending
//! impulse, thruster level, RNG) keep it in `Cell`/`RefCell`, which is enough
//! for the single-threaded frame loop.

use std::cell::{Cell, RefCell};
use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Particle;

/// Timing of the current integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
  /// Step length in seconds.
  pub dt: f32,
  /// Simulation time at the start of the step, in milliseconds.
  pub now_ms: f64,
}

impl Step {
  /// Current time in seconds.
  #[inline]
  pub fn seconds(&self) -> f32 {
    (self.now_ms / 1000.0) as f32
  }
}

/// Contributor to particle motion, invoked once per particle per step.
pub trait Force {
  fn apply(&self, particle: &mut Particle, step: &Step);
}

// =============================================================================
// Gravity
// =============================================================================

/// Constant acceleration, independent of particle state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityForce {
  pub acceleration: Vec3,
}

impl GravityForce {
  pub fn new(acceleration: Vec3) -> Self {
    Self { acceleration }
  }
}

impl Force for GravityForce {
  fn apply(&self, particle: &mut Particle, _step: &Step) {
    particle.add_acceleration(self.acceleration);
  }
}

// =============================================================================
// Impulse
// =============================================================================

/// One-shot velocity change.
///
/// [`ImpulseForce::trigger`] arms it; the next particle it is applied to
/// receives the whole delta and the impulse disarms itself. Triggering again
/// before it fires adds to the pending delta.
#[derive(Debug, Default)]
pub struct ImpulseForce {
  pending: Cell<Option<Vec3>>,
}

impl ImpulseForce {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn trigger(&self, delta_v: Vec3) {
    let total = self.pending.get().unwrap_or(Vec3::ZERO) + delta_v;
    self.pending.set(Some(total));
  }

  /// Delta waiting to be applied, if armed.
  pub fn pending(&self) -> Option<Vec3> {
    self.pending.get()
  }

  /// Disarm without applying.
  pub fn cancel(&self) {
    self.pending.set(None);
  }
}

impl Force for ImpulseForce {
  fn apply(&self, particle: &mut Particle, _step: &Step) {
    if let Some(delta_v) = self.pending.take() {
      particle.add_velocity(delta_v);
    }
  }
}

// =============================================================================
// Radial impulse
// =============================================================================

/// Speed boost along the particle's radial direction from `origin`.
///
/// Applied once per particle, on its first integration step. A particle
/// sitting exactly on the origin is pushed along its current velocity; a
/// particle at rest on the origin has no radial direction and is left alone.
#[derive(Debug)]
pub struct RadialImpulseForce {
  magnitude: f32,
  origin: Cell<Vec3>,
}

impl RadialImpulseForce {
  pub fn new(magnitude: f32) -> Self {
    Self {
      magnitude,
      origin: Cell::new(Vec3::ZERO),
    }
  }

  pub fn magnitude(&self) -> f32 {
    self.magnitude
  }

  /// Move the center the radial direction is measured from (the emitter).
  pub fn set_origin(&self, origin: Vec3) {
    self.origin.set(origin);
  }

  pub fn origin(&self) -> Vec3 {
    self.origin.get()
  }
}

impl Force for RadialImpulseForce {
  fn apply(&self, particle: &mut Particle, _step: &Step) {
    if particle.steps() > 0 {
      return;
    }
    let direction = (particle.position - self.origin.get())
      .try_normalize()
      .or_else(|| particle.velocity.try_normalize());
    if let Some(direction) = direction {
      particle.add_velocity(direction * self.magnitude);
    }
  }
}

// =============================================================================
// Turbulence
// =============================================================================

/// Random acceleration drawn per axis from `[min, max]` on every application.
#[derive(Debug)]
pub struct TurbulenceForce {
  min: Vec3,
  max: Vec3,
  rng: RefCell<StdRng>,
}

impl TurbulenceForce {
  pub fn new(min: Vec3, max: Vec3) -> Self {
    Self::from_rng(min, max, StdRng::from_os_rng())
  }

  /// Deterministic turbulence for reproducible runs.
  pub fn with_seed(min: Vec3, max: Vec3, seed: u64) -> Self {
    Self::from_rng(min, max, StdRng::seed_from_u64(seed))
  }

  fn from_rng(min: Vec3, max: Vec3, rng: StdRng) -> Self {
    Self {
      min,
      max,
      rng: RefCell::new(rng),
    }
  }

  pub fn range(&self) -> (Vec3, Vec3) {
    (self.min, self.max)
  }
}

impl Force for TurbulenceForce {
  fn apply(&self, particle: &mut Particle, _step: &Step) {
    let mut rng = self.rng.borrow_mut();
    let t = Vec3::new(rng.random(), rng.random(), rng.random());
    particle.add_acceleration(self.min + (self.max - self.min) * t);
  }
}

// =============================================================================
// Cyclic
// =============================================================================

/// Sinusoidal swirl in the X-Z plane: `magnitude * (sin wt, 0, cos wt)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CyclicForce {
  pub magnitude: f32,
  /// Cycles per second.
  pub frequency: f32,
}

impl CyclicForce {
  pub fn new(magnitude: f32) -> Self {
    Self {
      magnitude,
      frequency: 1.0,
    }
  }

  pub fn with_frequency(mut self, hz: f32) -> Self {
    self.frequency = hz;
    self
  }

  /// Acceleration at time `seconds`.
  pub fn acceleration_at(&self, seconds: f32) -> Vec3 {
    let phase = TAU * self.frequency * seconds;
    Vec3::new(phase.sin(), 0.0, phase.cos()) * self.magnitude
  }
}

impl Force for CyclicForce {
  fn apply(&self, particle: &mut Particle, step: &Step) {
    particle.add_acceleration(self.acceleration_at(step.seconds()));
  }
}

// =============================================================================
// Thruster
// =============================================================================

/// Externally controlled engine force, scaled by particle mass.
#[derive(Debug, Default)]
pub struct ThrusterForce {
  thrust: Cell<Vec3>,
}

impl ThrusterForce {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add to the current thrust.
  pub fn add(&self, thrust: Vec3) {
    self.thrust.set(self.thrust.get() + thrust);
  }

  /// Replace the current thrust.
  pub fn set(&self, thrust: Vec3) {
    self.thrust.set(thrust);
  }

  pub fn get(&self) -> Vec3 {
    self.thrust.get()
  }
}

impl Force for ThrusterForce {
  fn apply(&self, particle: &mut Particle, _step: &Step) {
    particle.add_force(self.thrust.get());
  }
}

#[cfg(test)]
#[path = "force_test.rs"]
mod force_test;
