use rigid2d::*;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod scenes;
mod visual;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    // Check if first arg is "visual"
    if args.len() > 1 && args[1] == "visual" {
        let scene = args.get(2).map(String::as_str).unwrap_or("ball_pit");
        info!(scene, "running visual example");

        if let Err(e) = visual::run_visual(scene) {
            eprintln!("Error running visual example: {}", e);
        }
        return;
    }

    let scene = args.get(1).map(String::as_str).unwrap_or("ball_pit");
    let Some(mut world) = scenes::build(scene) else {
        warn!(scene, "unknown scene, available: {}", scenes::NAMES.join(", "));
        return;
    };
    run_headless(scene, &mut world);
}

fn run_headless(scene: &str, world: &mut PhysicsWorld) {
    info!(scene, bodies = world.body_count(), "simulating");

    let dt = 1.0 / 60.0;
    for frame in 0..300 {
        world.step(dt);
        if frame % 30 == 0 {
            let colliding = world
                .bodies()
                .filter(|body| world.is_body_in_collision(body.id))
                .count();
            info!(
                frame,
                contacts = world.contacts().len(),
                colliding,
                tree_height = world.tree().height(),
                "frame"
            );
        }
    }
    info!(scene, "simulation finished");
}
