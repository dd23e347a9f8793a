//! Simulation time sources.
//!
//! Everything downstream takes `now_ms: f64`; a [`Clock`] is just where the
//! frame loop gets that number from.

use std::cell::Cell;

use web_time::Instant;

/// Monotonic millisecond time source.
pub trait Clock {
  /// Milliseconds since the clock's epoch.
  fn elapsed_ms(&self) -> f64;
}

/// Real time since construction or the last [`WallClock::reset`].
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
  start: Instant,
}

impl WallClock {
  pub fn new() -> Self {
    Self {
      start: Instant::now(),
    }
  }

  pub fn reset(&mut self) {
    self.start = Instant::now();
  }
}

impl Default for WallClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for WallClock {
  fn elapsed_ms(&self) -> f64 {
    self.start.elapsed().as_secs_f64() * 1000.0
  }
}

/// Deterministic clock advanced by hand, for tests and headless runs.
#[derive(Debug, Default)]
pub struct ManualClock {
  now_ms: Cell<f64>,
}

impl ManualClock {
  pub fn new() -> Self {
    Self::default()
  }

  /// Move time forward by `dt_ms`.
  pub fn advance(&self, dt_ms: f64) {
    self.now_ms.set(self.now_ms.get() + dt_ms);
  }

  pub fn set(&self, now_ms: f64) {
    self.now_ms.set(now_ms);
  }
}

impl Clock for ManualClock {
  fn elapsed_ms(&self) -> f64 {
    self.now_ms.get()
  }
}
