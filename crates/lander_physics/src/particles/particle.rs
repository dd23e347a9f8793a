//! Single simulated point mass.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGBA color used by the renderer for particles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
  pub r: f32,
  pub g: f32,
  pub b: f32,
  #[serde(default = "default_alpha")]
  pub a: f32,
}

fn default_alpha() -> f32 {
  1.0
}

impl Color {
  pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
  pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
  pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
  pub const ORANGE: Color = Color::rgb(1.0, 0.65, 0.0);

  pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
    Self { r, g, b, a: 1.0 }
  }
}

impl Default for Color {
  fn default() -> Self {
    Color::WHITE
  }
}

/// Point mass with kinematic and rendering attributes.
///
/// Forces do not touch position or velocity directly (except impulses); they
/// accumulate into per-step buffers that [`Particle::integrate`] consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
  pub position: Vec3,
  pub velocity: Vec3,
  /// Mass used to turn accumulated forces into acceleration. Must be > 0.
  pub mass: f32,
  /// Fraction of velocity kept after one second (1.0 = undamped).
  pub damping: f32,
  /// Render radius.
  pub radius: f32,
  pub color: Color,
  /// Simulation time of birth in milliseconds.
  pub birth_time: f64,
  /// Lifetime in seconds. `f32::INFINITY` never expires.
  pub lifespan: f32,
  force: Vec3,
  acceleration: Vec3,
  steps: u32,
}

impl Default for Particle {
  fn default() -> Self {
    Self {
      position: Vec3::ZERO,
      velocity: Vec3::ZERO,
      mass: 1.0,
      damping: 0.99,
      radius: 0.1,
      color: Color::WHITE,
      birth_time: 0.0,
      lifespan: 5.0,
      force: Vec3::ZERO,
      acceleration: Vec3::ZERO,
      steps: 0,
    }
  }
}

impl Particle {
  /// Particle at rest at `position` with default attributes.
  pub fn new(position: Vec3) -> Self {
    Self {
      position,
      ..Self::default()
    }
  }

  pub fn with_velocity(mut self, velocity: Vec3) -> Self {
    self.velocity = velocity;
    self
  }

  pub fn with_lifespan(mut self, seconds: f32) -> Self {
    self.lifespan = seconds;
    self
  }

  pub fn with_damping(mut self, damping: f32) -> Self {
    self.damping = damping;
    self
  }

  pub fn with_mass(mut self, mass: f32) -> Self {
    self.mass = mass;
    self
  }

  pub fn with_birth_time(mut self, now_ms: f64) -> Self {
    self.birth_time = now_ms;
    self
  }

  /// Age in seconds at simulation time `now_ms`.
  #[inline]
  pub fn age(&self, now_ms: f64) -> f32 {
    ((now_ms - self.birth_time) / 1000.0) as f32
  }

  /// True once the age exceeds the lifespan.
  #[inline]
  pub fn is_expired(&self, now_ms: f64) -> bool {
    self.age(now_ms) > self.lifespan
  }

  /// Number of integration steps taken so far.
  #[inline]
  pub fn steps(&self) -> u32 {
    self.steps
  }

  /// Accumulate a force (scaled by 1/mass at integration).
  #[inline]
  pub fn add_force(&mut self, force: Vec3) {
    self.force += force;
  }

  /// Accumulate a mass-independent acceleration.
  #[inline]
  pub fn add_acceleration(&mut self, acceleration: Vec3) {
    self.acceleration += acceleration;
  }

  /// Instantaneous velocity change.
  #[inline]
  pub fn add_velocity(&mut self, delta: Vec3) {
    self.velocity += delta;
  }

  /// Semi-implicit Euler step: velocity first, then position with the new
  /// velocity. Clears the accumulators.
  pub fn integrate(&mut self, dt: f32) {
    let acceleration = self.acceleration + self.force / self.mass;
    self.velocity += acceleration * dt;
    self.velocity *= self.damping.powf(dt);
    self.position += self.velocity * dt;

    self.force = Vec3::ZERO;
    self.acceleration = Vec3::ZERO;
    self.steps += 1;
  }
}
