use std::hint::black_box;
use std::time::Instant;

use glam::DVec3;
use physstep_behaviors::{ConstantAcceleration, LinearDrag};
use physstep_common::BodyState;
use physstep_integrators::IntegratorRegistry;
use physstep_kernel::{Particle, World, WorldOptions};

fn make_world(integrator: &str, body_count: usize) -> World {
    let factory = IntegratorRegistry::with_builtins().into_factory();
    let options = WorldOptions::new().integrator(integrator);
    World::with_setup(options, factory, |world| {
        for i in 0..body_count {
            let position = DVec3::new(i as f64, 100.0, 0.0);
            world.add_body(Particle::new(BodyState::new(position, DVec3::X * 0.01)));
        }
        world
            .add_behavior(ConstantAcceleration::new(DVec3::new(0.0, -0.0004, 0.0)))
            .add_behavior(LinearDrag::new(0.0001));
    })
    .expect("builtin integrator")
}

/// Steady frames: one substep per call.
fn bench_steady(integrator: &str, body_count: usize, frames: usize) {
    let mut world = make_world(integrator, body_count);
    let dt = world.fixed_timestep();
    let mut now = 0.0;
    world.step(now).expect("anchor");

    let start = Instant::now();
    for _ in 0..frames {
        now += dt;
        black_box(world.step(black_box(now)).expect("step"));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  steady {integrator} ({body_count} bodies, {frames} frames): {per_frame:?}/frame, total {elapsed:?}"
    );
}

/// Every frame stalls past the catch-up window, so each call runs the
/// maximum number of substeps.
fn bench_stalled(integrator: &str, body_count: usize, frames: usize) {
    let mut world = make_world(integrator, body_count);
    let stall = world.max_catch_up() * 3.0;
    let mut now = 0.0;
    world.step(now).expect("anchor");

    let start = Instant::now();
    for _ in 0..frames {
        now += stall;
        black_box(world.step(black_box(now)).expect("step"));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  stalled {integrator} ({body_count} bodies, {frames} frames): {per_frame:?}/frame, total {elapsed:?}, dropped {:.0}ms",
        world.diagnostics().dropped_time
    );
}

fn main() {
    println!("=== physstep world step benchmarks ===\n");

    for integrator in IntegratorRegistry::with_builtins().names() {
        println!("--- {integrator} ---");
        for &count in &[100, 1_000, 10_000] {
            bench_steady(integrator, count, 600);
            bench_stalled(integrator, count, 100);
        }
        println!();
    }

    println!("Done.");
}
