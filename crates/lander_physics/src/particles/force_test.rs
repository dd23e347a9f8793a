use super::*;

const STEP: Step = Step {
  dt: 0.1,
  now_ms: 0.0,
};

fn undamped() -> Particle {
  Particle::new(Vec3::ZERO).with_damping(1.0)
}

#[test]
fn test_gravity_is_constant() {
  let gravity = GravityForce::new(Vec3::new(0.0, -9.8, 0.0));
  let mut p = undamped();
  for _ in 0..10 {
    gravity.apply(&mut p, &STEP);
    p.integrate(STEP.dt);
  }
  assert!((p.velocity.y + 9.8).abs() < 1e-4);
}

/// Fires once, then stays quiet until triggered again.
#[test]
fn test_impulse_applies_once() {
  let impulse = ImpulseForce::new();
  let mut p = undamped();

  impulse.apply(&mut p, &STEP);
  assert_eq!(p.velocity, Vec3::ZERO, "not armed");

  impulse.trigger(Vec3::new(0.0, 3.0, 0.0));
  assert!(impulse.pending().is_some());
  impulse.apply(&mut p, &STEP);
  assert_eq!(p.velocity, Vec3::new(0.0, 3.0, 0.0));
  assert!(impulse.pending().is_none());

  impulse.apply(&mut p, &STEP);
  assert_eq!(p.velocity, Vec3::new(0.0, 3.0, 0.0));
}

#[test]
fn test_impulse_triggers_accumulate() {
  let impulse = ImpulseForce::new();
  impulse.trigger(Vec3::X);
  impulse.trigger(Vec3::Y);
  assert_eq!(impulse.pending(), Some(Vec3::new(1.0, 1.0, 0.0)));
}

#[test]
fn test_impulse_cancel() {
  let impulse = ImpulseForce::new();
  impulse.trigger(Vec3::Y);
  impulse.cancel();

  let mut p = undamped();
  impulse.apply(&mut p, &STEP);
  assert_eq!(p.velocity, Vec3::ZERO);
}

#[test]
fn test_radial_impulse_pushes_outward_on_first_step() {
  let radial = RadialImpulseForce::new(10.0);
  radial.set_origin(Vec3::new(1.0, 0.0, 0.0));

  let mut p = Particle::new(Vec3::new(1.0, 0.0, 2.0)).with_damping(1.0);
  radial.apply(&mut p, &STEP);
  assert_eq!(p.velocity, Vec3::new(0.0, 0.0, 10.0));

  p.integrate(STEP.dt);
  radial.apply(&mut p, &STEP);
  assert_eq!(p.velocity, Vec3::new(0.0, 0.0, 10.0), "only on the first step");
}

#[test]
fn test_radial_impulse_at_origin_follows_velocity() {
  let radial = RadialImpulseForce::new(2.0);
  let mut moving = undamped().with_velocity(Vec3::new(0.0, -4.0, 0.0));
  radial.apply(&mut moving, &STEP);
  assert_eq!(moving.velocity, Vec3::new(0.0, -6.0, 0.0));

  let mut resting = undamped();
  radial.apply(&mut resting, &STEP);
  assert_eq!(resting.velocity, Vec3::ZERO);
}

#[test]
fn test_turbulence_stays_in_range() {
  let min = Vec3::new(-2.0, -1.0, -3.0);
  let max = Vec3::new(1.0, 2.0, 5.0);
  let turbulence = TurbulenceForce::with_seed(min, max, 7);

  let mut distinct = std::collections::HashSet::new();
  for _ in 0..200 {
    let mut p = undamped();
    turbulence.apply(&mut p, &STEP);
    p.integrate(1.0);
    let a = p.velocity;
    assert!(a.cmpge(min).all() && a.cmple(max).all(), "{:?} out of range", a);
    distinct.insert(a.x.to_bits());
  }
  assert!(distinct.len() > 100, "turbulence is resampled each call");
}

#[test]
fn test_turbulence_seed_is_reproducible() {
  let a = TurbulenceForce::with_seed(Vec3::splat(-1.0), Vec3::splat(1.0), 42);
  let b = TurbulenceForce::with_seed(Vec3::splat(-1.0), Vec3::splat(1.0), 42);
  let (mut pa, mut pb) = (undamped(), undamped());
  a.apply(&mut pa, &STEP);
  b.apply(&mut pb, &STEP);
  pa.integrate(1.0);
  pb.integrate(1.0);
  assert_eq!(pa.velocity, pb.velocity);
}

#[test]
fn test_cyclic_is_periodic() {
  let cyclic = CyclicForce::new(20.0).with_frequency(2.0);
  let start = cyclic.acceleration_at(0.0);
  assert!((start - Vec3::new(0.0, 0.0, 20.0)).length() < 1e-4);

  let quarter = cyclic.acceleration_at(0.125);
  assert!((quarter - Vec3::new(20.0, 0.0, 0.0)).length() < 1e-3);

  let period = cyclic.acceleration_at(0.5);
  assert!((period - start).length() < 1e-3);
}

#[test]
fn test_thruster_add_and_set() {
  let thruster = ThrusterForce::new();
  thruster.add(Vec3::new(0.0, 0.5, 0.0));
  thruster.add(Vec3::new(0.5, 0.0, 0.0));
  assert_eq!(thruster.get(), Vec3::new(0.5, 0.5, 0.0));

  let mut heavy = undamped().with_mass(2.0);
  thruster.apply(&mut heavy, &STEP);
  heavy.integrate(1.0);
  assert_eq!(heavy.velocity, Vec3::new(0.25, 0.25, 0.0));

  thruster.set(Vec3::ZERO);
  assert_eq!(thruster.get(), Vec3::ZERO);
}
