//! Lander controller: the frame loop that ties particles, forces, the engine
//! emitter and the terrain octree together.
//!
//! # Frame Order
//!
//! ```text
//! update(now, terrain)
//!   ├─ fuel check (cut the engine when the budget runs out)
//!   ├─ lander system update   (gravity + thruster + pending impulse)
//!   ├─ engine follows the lander, engine update
//!   └─ contact test -> impulse trigger (applied next frame)
//! ```

use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Ray;
use crate::octree::Octree;
use crate::particles::{
  Color, CyclicForce, EmitterConfig, EmitterKind, GravityForce, ImpulseForce, Lifespan, Particle,
  ParticleEmitter, ParticleSystem, RadialImpulseForce, ThrusterForce, TurbulenceForce,
};

/// Lander tuning. Defaults give a slow, floaty descent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
  pub start_position: Vec3,
  pub start_velocity: Vec3,
  pub gravity: Vec3,
  pub damping: f32,
  /// Thruster force added per `thrust` call, per unit direction.
  pub thrust_step: f32,
  /// Exhaust speed of the engine particles.
  pub exhaust_speed: f32,
  /// Offset from the lander position to the point tested against terrain.
  pub contact_offset: Vec3,
  /// Contact impulse is `-velocity * bounce`.
  pub bounce: f32,
  /// Downward speed above which a contact counts as a hard landing.
  pub hard_landing_speed: f32,
  /// Extra impulse on a hard landing, `-velocity * hard_landing_bounce`.
  pub hard_landing_bounce: f32,
  /// Total burn time available, in milliseconds.
  pub fuel_ms: f64,
  pub engine: EmitterConfig,
  pub turbulence_min: Vec3,
  pub turbulence_max: Vec3,
  pub radial_impulse: f32,
  pub cyclic: f32,
}

impl Default for LanderConfig {
  fn default() -> Self {
    Self {
      start_position: Vec3::new(0.0, 10.0, 0.0),
      start_velocity: Vec3::ZERO,
      gravity: Vec3::new(0.0, -0.01, 0.0),
      damping: 0.99,
      thrust_step: 0.5,
      exhaust_speed: 5.0,
      contact_offset: Vec3::ZERO,
      bounce: 3.0,
      hard_landing_speed: 7.0,
      hard_landing_bounce: 200.0,
      fuel_ms: 120_000.0,
      engine: EmitterConfig::new()
        .with_kind(EmitterKind::Disc)
        .with_rate(600.0)
        .with_particle_radius(0.01)
        .with_particle_color(Color::ORANGE)
        .with_lifespan(Lifespan::Fixed(0.5))
        .with_group_size(10)
        .with_velocity(Vec3::new(0.0, -5.0, 0.0))
        .with_visible(false),
      turbulence_min: Vec3::new(-2.0, -1.0, -3.0),
      turbulence_max: Vec3::new(1.0, 2.0, 5.0),
      radial_impulse: 10.0,
      cyclic: 20.0,
    }
  }
}

/// Snapshot returned by [`Lander::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LanderStatus {
  pub position: Vec3,
  pub velocity: Vec3,
  /// Contact point is inside a terrain leaf this frame.
  pub contact: bool,
  /// Contact while falling faster than the hard-landing speed.
  pub hard_landing: bool,
  /// Distance from the contact point down to the terrain, if any terrain
  /// lies below.
  pub altitude: Option<f32>,
  pub fuel_ms: f64,
  pub out_of_fuel: bool,
  /// Live exhaust particles.
  pub exhaust: usize,
}

/// Player-controlled lander particle with thruster, engine exhaust and fuel.
pub struct Lander {
  config: LanderConfig,
  system: ParticleSystem,
  thruster: Rc<ThrusterForce>,
  impulse: Rc<ImpulseForce>,
  radial: Rc<RadialImpulseForce>,
  engine: ParticleEmitter,
  fuel_ms: f64,
  burn_started_ms: Option<f64>,
  contacts: u32,
  hard_landings: u32,
}

impl Lander {
  pub fn new(config: LanderConfig) -> Self {
    Self::build(config, None)
  }

  /// Lander whose exhaust (emitter and turbulence) is reproducible.
  pub fn with_seed(config: LanderConfig, seed: u64) -> Self {
    Self::build(config, Some(seed))
  }

  fn build(config: LanderConfig, seed: Option<u64>) -> Self {
    let thruster = Rc::new(ThrusterForce::new());
    let impulse = Rc::new(ImpulseForce::new());
    let radial = Rc::new(RadialImpulseForce::new(config.radial_impulse));

    let mut system = ParticleSystem::new();
    system.add_force(Rc::new(GravityForce::new(config.gravity)));
    system.add_force(thruster.clone());
    system.add_force(impulse.clone());

    let turbulence = match seed {
      Some(seed) => TurbulenceForce::with_seed(config.turbulence_min, config.turbulence_max, seed),
      None => TurbulenceForce::new(config.turbulence_min, config.turbulence_max),
    };
    let mut engine = ParticleEmitter::new(config.engine.clone());
    if let Some(seed) = seed {
      engine = engine.with_seed(seed.wrapping_add(1));
    }
    engine.with_particles_mut(|exhaust| {
      exhaust.add_force(Rc::new(turbulence));
      exhaust.add_force(radial.clone());
      exhaust.add_force(Rc::new(CyclicForce::new(config.cyclic)));
    });

    let mut lander = Self {
      fuel_ms: config.fuel_ms,
      config,
      system,
      thruster,
      impulse,
      radial,
      engine,
      burn_started_ms: None,
      contacts: 0,
      hard_landings: 0,
    };
    lander.spawn_body();
    lander
  }

  fn spawn_body(&mut self) {
    let body = Particle::new(self.config.start_position)
      .with_velocity(self.config.start_velocity)
      .with_damping(self.config.damping)
      .with_lifespan(f32::INFINITY);
    self.system.clear();
    self.system.add(body);
    self.engine.set_position(self.config.start_position);
  }

  /// Put the lander back at its start with a full tank.
  pub fn reset(&mut self) {
    self.engine.stop();
    self.engine.with_particles_mut(|exhaust| exhaust.clear());
    self.thruster.set(Vec3::ZERO);
    self.impulse.cancel();
    self.burn_started_ms = None;
    self.fuel_ms = self.config.fuel_ms;
    self.contacts = 0;
    self.hard_landings = 0;
    self.spawn_body();
    tracing::debug!("lander reset");
  }

  pub fn config(&self) -> &LanderConfig {
    &self.config
  }

  /// Lander body (primary particle).
  pub fn body(&self) -> Option<&Particle> {
    self.system.primary()
  }

  pub fn position(&self) -> Vec3 {
    self.body().map_or(self.config.start_position, |p| p.position)
  }

  pub fn velocity(&self) -> Vec3 {
    self.body().map_or(Vec3::ZERO, |p| p.velocity)
  }

  pub fn system(&self) -> &ParticleSystem {
    &self.system
  }

  pub fn engine(&self) -> &ParticleEmitter {
    &self.engine
  }

  /// Current thruster force.
  pub fn thrust_force(&self) -> Vec3 {
    self.thruster.get()
  }

  /// Impulse waiting to be applied on the next update.
  pub fn pending_impulse(&self) -> Option<Vec3> {
    self.impulse.pending()
  }

  /// Fuel left, not counting an ongoing burn.
  pub fn fuel_ms(&self) -> f64 {
    self.fuel_ms
  }

  /// Fuel left at `now_ms`, counting an ongoing burn.
  pub fn fuel_remaining(&self, now_ms: f64) -> f64 {
    let burning = self.burn_started_ms.map_or(0.0, |start| now_ms - start);
    (self.fuel_ms - burning).max(0.0)
  }

  pub fn is_out_of_fuel(&self) -> bool {
    self.fuel_ms <= 0.0
  }

  pub fn is_burning(&self) -> bool {
    self.burn_started_ms.is_some()
  }

  pub fn contacts(&self) -> u32 {
    self.contacts
  }

  pub fn hard_landings(&self) -> u32 {
    self.hard_landings
  }

  /// Fire the thruster along `direction`.
  ///
  /// Adds `direction * thrust_step` to the thruster and points the exhaust
  /// down and away from the horizontal thrust component. Returns `false`
  /// without doing anything when the tank is empty.
  pub fn thrust(&mut self, direction: Vec3, now_ms: f64) -> bool {
    if self.is_out_of_fuel() {
      return false;
    }

    self.thruster.add(direction * self.config.thrust_step);
    let d = direction.normalize_or_zero();
    let exhaust = Vec3::new(-d.x, -1.0, -d.z) * self.config.exhaust_speed;
    self.engine.set_velocity(exhaust);

    if self.burn_started_ms.is_none() {
      self.burn_started_ms = Some(now_ms);
    }
    self.engine.start(now_ms);
    true
  }

  /// Cut the thruster and charge the burn to the fuel budget.
  pub fn release(&mut self, now_ms: f64) {
    if let Some(start) = self.burn_started_ms.take() {
      self.fuel_ms = (self.fuel_ms - (now_ms - start)).max(0.0);
      tracing::debug!(burn_ms = now_ms - start, fuel_ms = self.fuel_ms, "thrust released");
    }
    self.thruster.set(Vec3::ZERO);
    self.engine.stop();
  }

  /// Advance one frame and test for terrain contact.
  pub fn update(&mut self, now_ms: f64, terrain: &Octree<'_>) -> LanderStatus {
    if self.is_burning() && self.fuel_remaining(now_ms) <= 0.0 {
      self.release(now_ms);
      self.fuel_ms = 0.0;
      tracing::info!(now_ms, "out of fuel");
    }

    self.system.update(now_ms);

    let position = self.position();
    let velocity = self.velocity();
    self.engine.set_position(position);
    self.radial.set_origin(position);
    self.engine.update(now_ms);

    let touch = position + self.config.contact_offset;
    let contact = terrain.intersect_point(touch);
    let mut hard_landing = false;
    if contact {
      self.contacts += 1;
      self.impulse.trigger(-velocity * self.config.bounce);
      if velocity.y < -self.config.hard_landing_speed {
        hard_landing = true;
        self.hard_landings += 1;
        self.impulse.trigger(-velocity * self.config.hard_landing_bounce);
        tracing::warn!(speed = -velocity.y, "hard landing");
      } else {
        tracing::debug!(?touch, "terrain contact");
      }
    }

    let altitude = terrain
      .intersect_ray(&Ray::new(touch, Vec3::NEG_Y))
      .map(|hit| hit.t);

    LanderStatus {
      position,
      velocity,
      contact,
      hard_landing,
      altitude,
      fuel_ms: self.fuel_remaining(now_ms),
      out_of_fuel: self.is_out_of_fuel(),
      exhaust: self.engine.with_particles(|exhaust| exhaust.len()),
    }
  }
}

#[cfg(test)]
#[path = "lander_test.rs"]
mod lander_test;
