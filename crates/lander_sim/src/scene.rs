//! Scripted descent: terrain, octree and lander driven by a thrust schedule.

use glam::Vec3;
use lander_physics::{Clock, Lander, LanderStatus, Octree};

use crate::config::SimConfig;

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
  pub frames: u32,
  pub elapsed_ms: f64,
  pub terrain_vertices: usize,
  pub octree_nodes: usize,
  pub first_contact_ms: Option<f64>,
  /// Speed at the first contact.
  pub touchdown_speed: Option<f32>,
  pub contacts: u32,
  pub hard_landings: u32,
  pub min_altitude: Option<f32>,
  pub peak_exhaust: usize,
  pub final_position: Vec3,
  pub fuel_ms: f64,
  pub out_of_fuel: bool,
}

/// Run the configured descent, taking frame times from `clock`.
///
/// `advance` is called after every frame and is expected to move `clock`
/// forward by one frame length.
pub fn run<C: Clock>(config: &SimConfig, clock: &C, mut advance: impl FnMut(&C)) -> Summary {
  let mesh = config.terrain.build();
  let tree = Octree::build(&mesh, config.octree.to_config());
  let stats = tree.stats();
  tracing::info!(
    vertices = mesh.vertex_count(),
    nodes = stats.nodes,
    leaves = stats.leaves,
    depth = stats.depth,
    "terrain ready"
  );

  let mut lander = match config.run.seed {
    Some(seed) => Lander::with_seed(config.lander.clone(), seed),
    None => Lander::new(config.lander.clone()),
  };

  let mut summary = Summary {
    frames: 0,
    elapsed_ms: 0.0,
    terrain_vertices: mesh.vertex_count(),
    octree_nodes: stats.nodes,
    first_contact_ms: None,
    touchdown_speed: None,
    contacts: 0,
    hard_landings: 0,
    min_altitude: None,
    peak_exhaust: 0,
    final_position: lander.position(),
    fuel_ms: lander.fuel_ms(),
    out_of_fuel: false,
  };

  let start_ms = clock.elapsed_ms();
  let mut active: Vec<usize> = Vec::new();

  for frame in 0..config.run.frames {
    let now = clock.elapsed_ms() - start_ms;

    let schedule: Vec<usize> = config
      .thrust
      .iter()
      .enumerate()
      .filter(|(_, window)| window.is_active(now))
      .map(|(i, _)| i)
      .collect();
    if schedule != active {
      if !active.is_empty() {
        lander.release(now);
      }
      for &i in &schedule {
        if !lander.thrust(config.thrust[i].direction, now) {
          tracing::debug!(window = i, "thrust refused, tank empty");
        }
      }
      active = schedule;
    }

    let status = lander.update(now, &tree);
    record(&mut summary, &status, now);
    summary.frames = frame + 1;
    summary.elapsed_ms = now;

    if config.run.report_every > 0 && frame % config.run.report_every == 0 {
      report(frame, now, &status);
    }
    if status.contact && config.run.stop_on_contact {
      tracing::info!(frame, now_ms = now, "touchdown, stopping");
      break;
    }

    advance(clock);
  }

  lander.release(summary.elapsed_ms);
  summary.contacts = lander.contacts();
  summary.hard_landings = lander.hard_landings();
  summary.final_position = lander.position();
  summary.fuel_ms = lander.fuel_ms();
  summary.out_of_fuel = lander.is_out_of_fuel();
  summary
}

fn record(summary: &mut Summary, status: &LanderStatus, now: f64) {
  if status.contact && summary.first_contact_ms.is_none() {
    summary.first_contact_ms = Some(now);
    summary.touchdown_speed = Some(status.velocity.length());
  }
  if let Some(altitude) = status.altitude {
    summary.min_altitude = Some(summary.min_altitude.map_or(altitude, |m| m.min(altitude)));
  }
  summary.peak_exhaust = summary.peak_exhaust.max(status.exhaust);
}

fn report(frame: u32, now: f64, status: &LanderStatus) {
  tracing::debug!(
    frame,
    now_ms = now,
    x = status.position.x,
    y = status.position.y,
    z = status.position.z,
    vy = status.velocity.y,
    altitude = status.altitude,
    fuel_ms = status.fuel_ms,
    exhaust = status.exhaust,
    "status"
  );
}
