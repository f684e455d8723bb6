use rigid2d::*;

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;
pub const NAMES: [&str; 3] = ["ball_pit", "obstacles", "layers"];

pub fn build(name: &str) -> Option<PhysicsWorld> {
    let world = match name {
        "ball_pit" => ball_pit(),
        "obstacles" => obstacles(),
        "layers" => layers(),
        _ => return None,
    };
    Some(world)
}

pub fn bounds() -> Rectangle {
    Rectangle::new(0.0, 0.0, WIDTH, HEIGHT)
}

/// Drops a bouncy body at `position`, alternating circles and boxes.
pub fn spawn(world: &mut PhysicsWorld, position: Vec2, seed: usize) -> BodyHandle {
    let shape = if seed % 3 == 0 {
        Shape::rect(10.0 + (seed % 2) as f64 * 5.0, 10.0)
    } else {
        Shape::circle(8.0 + (seed % 4) as f64 * 3.0)
    };
    let velocity = Vec2::new(((seed * 53) % 160) as f64 - 80.0, 0.0);
    world.create_body_with(
        shape,
        Transform::from_position(position),
        Kinematics::new(velocity, 1.0, 0.7),
        BodyFlags::default(),
    )
}

fn ball_pit() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(bounds());
    for i in 0..60 {
        let x = 40.0 + (i % 20) as f64 * 36.0;
        let y = 40.0 + (i / 20) as f64 * 45.0;
        spawn(&mut world, Vec2::new(x, y), i);
    }
    world
}

fn obstacles() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(bounds());

    // Staggered shelves
    for (i, &(x, y)) in [(200.0, 250.0), (560.0, 330.0), (300.0, 450.0)].iter().enumerate() {
        world.create_body_with(
            Shape::rect(140.0 - i as f64 * 20.0, 8.0),
            Transform::at(x, y),
            Kinematics::new(Vec2::ZERO, 0.0, 0.9),
            BodyFlags::ACTIVE | BodyFlags::STATIC,
        );
    }
    for i in 0..30 {
        let x = 80.0 + (i % 15) as f64 * 45.0;
        let y = 30.0 + (i / 15) as f64 * 40.0;
        spawn(&mut world, Vec2::new(x, y), i);
    }
    world
}

/// Two groups that only collide within themselves.
fn layers() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(bounds());
    for i in 0..40 {
        let x = 60.0 + (i % 20) as f64 * 34.0;
        let y = 60.0 + (i / 20) as f64 * 60.0;
        let handle = spawn(&mut world, Vec2::new(x, y), i);
        if i % 2 == 0 {
            handle.set_collision(&mut world, LAYER_1, MASK_1);
        } else {
            handle.set_collision(&mut world, LAYER_2, MASK_2);
        }
    }
    world
}
