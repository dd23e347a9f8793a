//! ParticleSystem - live particles plus the forces acting on them.

use std::rc::Rc;

use super::{Force, Particle, Step};

/// Running totals since the system was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemStats {
  /// Particles ever added.
  pub spawned: u64,
  /// Particles removed because their lifespan ran out.
  pub expired: u64,
}

/// Ordered collection of particles and the shared forces applied to them.
///
/// Index 0 is the primary particle (the lander body, the tracked object).
/// Expired particles are removed in place with order preserved, so the
/// primary keeps index 0 as long as it does not expire itself.
#[derive(Default)]
pub struct ParticleSystem {
  particles: Vec<Particle>,
  forces: Vec<Rc<dyn Force>>,
  last_update_ms: Option<f64>,
  stats: SystemStats,
}

impl ParticleSystem {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a particle. The first one added becomes the primary particle.
  pub fn add(&mut self, particle: Particle) {
    self.particles.push(particle);
    self.stats.spawned += 1;
  }

  /// Register a shared force. The system never owns the force exclusively.
  pub fn add_force(&mut self, force: Rc<dyn Force>) {
    self.forces.push(force);
  }

  /// Unregister a force by identity. Returns true if it was registered.
  pub fn remove_force<F: Force + ?Sized>(&mut self, force: &Rc<F>) -> bool {
    let target = Rc::as_ptr(force).cast::<()>();
    let before = self.forces.len();
    self.forces.retain(|f| Rc::as_ptr(f).cast::<()>() != target);
    self.forces.len() != before
  }

  pub fn force_count(&self) -> usize {
    self.forces.len()
  }

  pub fn particles(&self) -> &[Particle] {
    &self.particles
  }

  pub fn particles_mut(&mut self) -> &mut [Particle] {
    &mut self.particles
  }

  /// The particle at index 0.
  pub fn primary(&self) -> Option<&Particle> {
    self.particles.first()
  }

  pub fn primary_mut(&mut self) -> Option<&mut Particle> {
    self.particles.first_mut()
  }

  pub fn len(&self) -> usize {
    self.particles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.particles.is_empty()
  }

  /// Remove every particle; forces stay registered.
  pub fn clear(&mut self) {
    self.particles.clear();
  }

  pub fn stats(&self) -> SystemStats {
    self.stats
  }

  /// Advance to simulation time `now_ms`.
  ///
  /// The step length is the time since the previous call. The first call only
  /// establishes the time base (zero-length step).
  pub fn update(&mut self, now_ms: f64) {
    let dt = match self.last_update_ms {
      Some(last) => ((now_ms - last).max(0.0) / 1000.0) as f32,
      None => 0.0,
    };
    self.last_update_ms = Some(now_ms);
    self.step(dt, now_ms);
  }

  /// Fixed-length step of `dt` seconds at simulation time `now_ms`.
  ///
  /// Drops expired particles, then lets every force act on every remaining
  /// particle in order before integrating it.
  pub fn step(&mut self, dt: f32, now_ms: f64) {
    let before = self.particles.len();
    self.particles.retain(|p| !p.is_expired(now_ms));
    let expired = before - self.particles.len();
    if expired > 0 {
      self.stats.expired += expired as u64;
      tracing::trace!(expired, live = self.particles.len(), "particles expired");
    }

    let step = Step { dt, now_ms };
    for particle in &mut self.particles {
      for force in &self.forces {
        force.apply(particle, &step);
      }
      particle.integrate(dt);
    }
  }
}

#[cfg(test)]
#[path = "system_test.rs"]
mod system_test;
