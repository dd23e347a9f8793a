//! ParticleEmitter - timed or one-shot particle spawner.
//!
//! # State Machine
//!
//! ```text
//!            start(now)                 update(now), one-shot
//! Stopped ─────────────▶ Started ───────────────────────────▶ Stopped
//!    ▲                      │      (spawns group_size once)
//!    └──────── stop() ──────┘
//! ```
//!
//! In continuous mode a started emitter spawns `group_size` particles
//! whenever at least `1000 / rate` ms have passed since the last burst. Missed
//! periods are not back-filled: one burst per `update` at most.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Color, Particle, ParticleSystem};

/// How initial position and velocity are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterKind {
  /// Configured velocity, emitter position.
  #[default]
  Directional,
  /// Uniformly random direction with the configured speed, emitter position.
  Radial,
  /// Uniform position on a disc of `radius` in the local X-Z plane,
  /// configured velocity.
  Disc,
  /// Spawns like `Directional`; only the placeholder marker differs.
  Sphere,
}

/// Lifetime assigned to spawned particles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifespan {
  /// Every particle lives this many seconds.
  Fixed(f32),
  /// Drawn uniformly from `[min, max]` seconds per particle.
  Random { min: f32, max: f32 },
}

impl Default for Lifespan {
  fn default() -> Self {
    Lifespan::Fixed(3.0)
  }
}

/// Emitter configuration.
///
/// Values are not validated: a zero `rate` never spawns in continuous mode,
/// a non-positive `mass` produces non-finite accelerations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
  pub kind: EmitterKind,
  /// Emitter position in world space.
  pub position: Vec3,
  /// Initial particle velocity (direction and speed, speed only for radial).
  pub velocity: Vec3,
  /// Bursts per second in continuous mode.
  pub rate: f32,
  pub lifespan: Lifespan,
  /// Particles per burst.
  pub group_size: usize,
  /// Fire one burst per start/stop cycle instead of continuously.
  pub one_shot: bool,
  pub mass: f32,
  pub damping: f32,
  pub particle_radius: f32,
  pub particle_color: Color,
  /// Emitter radius (disc size, marker size).
  pub radius: f32,
  /// Whether the renderer should draw the emitter marker.
  pub visible: bool,
}

impl Default for EmitterConfig {
  fn default() -> Self {
    Self {
      kind: EmitterKind::Directional,
      position: Vec3::ZERO,
      velocity: Vec3::new(0.0, 20.0, 0.0),
      rate: 1.0,
      lifespan: Lifespan::default(),
      group_size: 1,
      one_shot: false,
      mass: 1.0,
      damping: 0.99,
      particle_radius: 0.1,
      particle_color: Color::BLUE,
      radius: 1.0,
      visible: true,
    }
  }
}

impl EmitterConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_kind(mut self, kind: EmitterKind) -> Self {
    self.kind = kind;
    self
  }

  pub fn with_position(mut self, position: Vec3) -> Self {
    self.position = position;
    self
  }

  pub fn with_velocity(mut self, velocity: Vec3) -> Self {
    self.velocity = velocity;
    self
  }

  pub fn with_rate(mut self, rate: f32) -> Self {
    self.rate = rate;
    self
  }

  pub fn with_lifespan(mut self, lifespan: Lifespan) -> Self {
    self.lifespan = lifespan;
    self
  }

  pub fn with_group_size(mut self, size: usize) -> Self {
    self.group_size = size;
    self
  }

  pub fn with_one_shot(mut self, one_shot: bool) -> Self {
    self.one_shot = one_shot;
    self
  }

  pub fn with_particle_radius(mut self, radius: f32) -> Self {
    self.particle_radius = radius;
    self
  }

  pub fn with_particle_color(mut self, color: Color) -> Self {
    self.particle_color = color;
    self
  }

  pub fn with_radius(mut self, radius: f32) -> Self {
    self.radius = radius;
    self
  }

  pub fn with_damping(mut self, damping: f32) -> Self {
    self.damping = damping;
    self
  }

  pub fn with_visible(mut self, visible: bool) -> Self {
    self.visible = visible;
    self
  }

  /// Milliseconds between bursts in continuous mode.
  #[inline]
  pub fn spawn_period_ms(&self) -> f64 {
    1000.0 / self.rate as f64
  }
}

/// Run state of an emitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitterState {
  Stopped,
  Started,
}

/// The particle system an emitter feeds.
///
/// Chosen at construction and never changed. An owned system is dropped with
/// the emitter; a shared one lives as long as its other holders.
pub enum EmitterSystem {
  Owned(ParticleSystem),
  Shared(Rc<RefCell<ParticleSystem>>),
}

/// Placeholder the renderer draws at the emitter position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterMarker {
  pub position: Vec3,
  pub kind: EmitterKind,
  pub size: f32,
}

/// Spawns particles into exactly one particle system.
pub struct ParticleEmitter {
  system: EmitterSystem,
  config: EmitterConfig,
  state: EmitterState,
  fired: bool,
  last_spawned_ms: f64,
  rng: StdRng,
}

impl ParticleEmitter {
  /// Emitter with its own particle system.
  pub fn new(config: EmitterConfig) -> Self {
    Self::with_system(config, EmitterSystem::Owned(ParticleSystem::new()))
  }

  /// Emitter feeding a system owned elsewhere.
  pub fn shared(config: EmitterConfig, system: Rc<RefCell<ParticleSystem>>) -> Self {
    Self::with_system(config, EmitterSystem::Shared(system))
  }

  fn with_system(config: EmitterConfig, system: EmitterSystem) -> Self {
    Self {
      system,
      config,
      state: EmitterState::Stopped,
      fired: false,
      last_spawned_ms: 0.0,
      rng: StdRng::from_os_rng(),
    }
  }

  /// Reseed the spawn RNG for reproducible runs.
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.rng = StdRng::seed_from_u64(seed);
    self
  }

  pub fn config(&self) -> &EmitterConfig {
    &self.config
  }

  pub fn config_mut(&mut self) -> &mut EmitterConfig {
    &mut self.config
  }

  pub fn set_position(&mut self, position: Vec3) {
    self.config.position = position;
  }

  pub fn set_velocity(&mut self, velocity: Vec3) {
    self.config.velocity = velocity;
  }

  pub fn state(&self) -> EmitterState {
    self.state
  }

  pub fn is_started(&self) -> bool {
    self.state == EmitterState::Started
  }

  /// Whether this emitter owns its particle system.
  pub fn owns_system(&self) -> bool {
    matches!(self.system, EmitterSystem::Owned(_))
  }

  /// Run `f` with read access to the particle system.
  pub fn with_particles<R>(&self, f: impl FnOnce(&ParticleSystem) -> R) -> R {
    match &self.system {
      EmitterSystem::Owned(system) => f(system),
      EmitterSystem::Shared(system) => f(&system.borrow()),
    }
  }

  /// Run `f` with write access to the particle system (e.g. to add forces).
  pub fn with_particles_mut<R>(&mut self, f: impl FnOnce(&mut ParticleSystem) -> R) -> R {
    match &mut self.system {
      EmitterSystem::Owned(system) => f(system),
      EmitterSystem::Shared(system) => f(&mut system.borrow_mut()),
    }
  }

  /// Start emitting. Does nothing if already started.
  pub fn start(&mut self, now_ms: f64) {
    if self.is_started() {
      return;
    }
    self.state = EmitterState::Started;
    self.last_spawned_ms = now_ms;
    tracing::debug!(kind = ?self.config.kind, one_shot = self.config.one_shot, "emitter started");
  }

  /// Stop emitting and re-arm one-shot mode.
  pub fn stop(&mut self) {
    if self.is_started() {
      tracing::debug!(kind = ?self.config.kind, "emitter stopped");
    }
    self.state = EmitterState::Stopped;
    self.fired = false;
  }

  /// Run spawn logic for time `now_ms`, then update the particle system.
  pub fn update(&mut self, now_ms: f64) {
    if self.is_started() {
      if self.config.one_shot {
        if !self.fired {
          self.spawn_group(now_ms);
          self.fired = true;
        }
        self.stop();
      } else if now_ms - self.last_spawned_ms >= self.config.spawn_period_ms() {
        self.spawn_group(now_ms);
      }
    }

    self.with_particles_mut(|system| system.update(now_ms));
  }

  /// Spawn one burst of `group_size` particles born at `now_ms`.
  pub fn spawn_group(&mut self, now_ms: f64) {
    let particles: Vec<Particle> = (0..self.config.group_size)
      .map(|_| self.spawn_particle(now_ms))
      .collect();
    tracing::trace!(count = particles.len(), "emitter burst");

    self.with_particles_mut(|system| {
      for particle in particles {
        system.add(particle);
      }
    });
    self.last_spawned_ms = now_ms;
  }

  /// Build one particle with this emitter's initial-condition policy.
  fn spawn_particle(&mut self, now_ms: f64) -> Particle {
    let config = &self.config;
    let (position, velocity) = match config.kind {
      EmitterKind::Directional | EmitterKind::Sphere => (config.position, config.velocity),
      EmitterKind::Radial => {
        let direction = random_unit_vector(&mut self.rng);
        (config.position, direction * config.velocity.length())
      }
      EmitterKind::Disc => {
        let offset = random_disc_point(&mut self.rng, config.radius);
        (config.position + offset, config.velocity)
      }
    };

    let lifespan = match config.lifespan {
      Lifespan::Fixed(seconds) => seconds,
      Lifespan::Random { min, max } => min + (max - min) * self.rng.random::<f32>(),
    };

    let mut particle = Particle::new(position)
      .with_velocity(velocity)
      .with_mass(config.mass)
      .with_damping(config.damping)
      .with_lifespan(lifespan)
      .with_birth_time(now_ms);
    particle.radius = config.particle_radius;
    particle.color = config.particle_color;
    particle
  }

  /// Marker for the renderer, or `None` when the emitter is hidden.
  pub fn marker(&self) -> Option<EmitterMarker> {
    self.config.visible.then(|| EmitterMarker {
      position: self.config.position,
      kind: self.config.kind,
      size: self.config.radius / 10.0,
    })
  }
}

/// Uniform direction on the unit sphere (Archimedes: uniform height, uniform
/// azimuth).
fn random_unit_vector(rng: &mut StdRng) -> Vec3 {
  let y: f32 = rng.random_range(-1.0..=1.0);
  let theta: f32 = rng.random_range(0.0..TAU);
  let r = (1.0 - y * y).max(0.0).sqrt();
  Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Uniform point on a disc of `radius` in the X-Z plane.
fn random_disc_point(rng: &mut StdRng, radius: f32) -> Vec3 {
  let r = radius * rng.random::<f32>().sqrt();
  let theta: f32 = rng.random_range(0.0..TAU);
  Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod emitter_test;
