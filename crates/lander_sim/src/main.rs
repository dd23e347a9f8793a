//! Headless lunar-lander simulation.
//!
//! Builds procedural terrain, wraps it in an octree and flies the lander
//! through a scripted thrust schedule, logging status as it goes and printing
//! a touchdown summary at the end.

mod config;
mod scene;

use anyhow::Result;
use clap::Parser;
use lander_physics::{ManualClock, WallClock};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use config::SimConfig;
use scene::Summary;

/// Scripted lander descent over procedural terrain.
#[derive(Parser, Debug)]
#[command(name = "lander_sim")]
#[command(about = "Runs a scripted lunar-lander descent and reports the touchdown")]
struct Args {
  /// Path to configuration TOML file (defaults when omitted).
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Override the RNG seed.
  #[arg(long)]
  seed: Option<u64>,

  /// Override the number of frames.
  #[arg(long)]
  frames: Option<u32>,

  /// Override the frame length in milliseconds.
  #[arg(long)]
  dt_ms: Option<f64>,

  /// Pace frames against the wall clock instead of stepping instantly.
  #[arg(long)]
  realtime: bool,

  /// Verbosity level (can be repeated for more detail)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long)]
  quiet: bool,
}

fn main() -> Result<()> {
  let args = Args::parse();
  init_logging(args.verbose, args.quiet);

  let mut config = match &args.config {
    Some(path) => {
      tracing::info!(path = %path.display(), "loading config");
      SimConfig::load(path)?
    }
    None => SimConfig::default(),
  };
  if let Some(seed) = args.seed {
    config.run.seed = Some(seed);
  }
  if let Some(frames) = args.frames {
    config.run.frames = frames;
  }
  if let Some(dt_ms) = args.dt_ms {
    anyhow::ensure!(dt_ms > 0.0, "--dt-ms must be positive, got {}", dt_ms);
    config.run.dt_ms = dt_ms;
  }

  let dt_ms = config.run.dt_ms;
  let summary = if args.realtime {
    let clock = WallClock::new();
    let frame = Duration::from_secs_f64(dt_ms / 1000.0);
    scene::run(&config, &clock, |_| std::thread::sleep(frame))
  } else {
    let clock = ManualClock::new();
    scene::run(&config, &clock, |c| c.advance(dt_ms))
  };

  print_summary(&summary);
  Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
  let level = if quiet {
    "error"
  } else {
    match verbose {
      0 => "info",
      1 => "debug",
      _ => "trace",
    }
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .init();
}

fn print_summary(summary: &Summary) {
  println!(
    "Terrain: {} vertices, {} octree nodes",
    summary.terrain_vertices, summary.octree_nodes
  );
  println!(
    "Simulated {} frames ({:.0} ms)",
    summary.frames, summary.elapsed_ms
  );

  match (summary.first_contact_ms, summary.touchdown_speed) {
    (Some(at), Some(speed)) => {
      println!("Touchdown at {:.0} ms, speed {:.2}", at, speed);
    }
    _ => println!("No touchdown"),
  }
  if summary.hard_landings > 0 {
    println!("Hard landings: {}", summary.hard_landings);
  }
  if let Some(altitude) = summary.min_altitude {
    println!("Lowest altitude: {:.2}", altitude);
  }

  let p = summary.final_position;
  println!("Final position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
  println!("Peak exhaust particles: {}", summary.peak_exhaust);
  if summary.out_of_fuel {
    println!("Fuel: empty");
  } else {
    println!("Fuel: {:.0} ms remaining", summary.fuel_ms);
  }
}
