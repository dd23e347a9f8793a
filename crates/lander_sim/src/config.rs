//! Configuration parsing for scripted descents.

use anyhow::{Context, Result};
use glam::Vec3;
use lander_physics::{LanderConfig, Mesh, OctreeConfig};
use serde::Deserialize;
use std::path::Path;

/// Root configuration for a simulation run.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
  pub run: RunConfig,
  pub terrain: TerrainConfig,
  pub octree: OctreeSettings,
  pub lander: LanderConfig,
  /// Thrust schedule; overlapping windows add up.
  pub thrust: Vec<ThrustWindow>,
}

/// Frame loop settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
  /// Number of frames to simulate.
  pub frames: u32,
  /// Frame length in milliseconds.
  pub dt_ms: f64,
  /// Seed for the exhaust RNG (random when absent).
  pub seed: Option<u64>,
  /// End the run at the first terrain contact.
  pub stop_on_contact: bool,
  /// Log a status line every this many frames.
  pub report_every: u32,
}

impl Default for RunConfig {
  fn default() -> Self {
    Self {
      frames: 1000,
      dt_ms: 16.0,
      seed: None,
      stop_on_contact: true,
      report_every: 60,
    }
  }
}

/// Procedural heightfield: `amplitude * sin(x f) * cos(z f)`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
  pub cols: usize,
  pub rows: usize,
  pub spacing: f32,
  pub amplitude: f32,
  pub frequency: f32,
}

impl Default for TerrainConfig {
  fn default() -> Self {
    Self {
      cols: 33,
      rows: 33,
      spacing: 1.0,
      amplitude: 1.0,
      frequency: 0.4,
    }
  }
}

impl TerrainConfig {
  /// Generate the terrain mesh.
  pub fn build(&self) -> Mesh {
    let (amplitude, frequency) = (self.amplitude, self.frequency);
    Mesh::heightfield(self.cols, self.rows, self.spacing, move |x, z| {
      amplitude * (x * frequency).sin() * (z * frequency).cos()
    })
  }
}

/// Octree subdivision limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OctreeSettings {
  pub max_depth: u32,
  pub leaf_size: usize,
}

impl Default for OctreeSettings {
  fn default() -> Self {
    Self {
      max_depth: 4,
      leaf_size: 8,
    }
  }
}

impl OctreeSettings {
  pub fn to_config(&self) -> OctreeConfig {
    OctreeConfig::new()
      .with_max_depth(self.max_depth)
      .with_leaf_size(self.leaf_size)
  }
}

/// Hold `direction` on the thruster during `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ThrustWindow {
  pub start_ms: f64,
  pub end_ms: f64,
  pub direction: Vec3,
}

impl ThrustWindow {
  #[inline]
  pub fn is_active(&self, now_ms: f64) -> bool {
    now_ms >= self.start_ms && now_ms < self.end_ms
  }
}

impl SimConfig {
  /// Load configuration from a TOML file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    Self::parse(&content)
  }

  /// Parse and validate TOML text.
  pub fn parse(content: &str) -> Result<Self> {
    let config: SimConfig =
      toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.terrain.cols < 2 || self.terrain.rows < 2 {
      anyhow::bail!(
        "terrain needs at least 2x2 vertices, got {}x{}",
        self.terrain.cols,
        self.terrain.rows
      );
    }
    if self.terrain.spacing <= 0.0 {
      anyhow::bail!("terrain spacing must be positive, got {}", self.terrain.spacing);
    }
    if self.run.dt_ms <= 0.0 {
      anyhow::bail!("dt_ms must be positive, got {}", self.run.dt_ms);
    }
    for (i, window) in self.thrust.iter().enumerate() {
      if window.end_ms <= window.start_ms {
        anyhow::bail!(
          "thrust window {} ends before it starts ({} >= {})",
          i,
          window.start_ms,
          window.end_ms
        );
      }
    }
    Ok(())
  }
}
