use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rigid2d::{
    AabbTree, BodyFlags, Kinematics, PhysicsWorld, Rectangle, Shape, Transform, Vec2, AABB,
};

const BOUNDS: Rectangle = Rectangle::new(0.0, 0.0, 1600.0, 900.0);

// --- Helper for filling a world with a grid of mixed bodies ---
fn build_ball_pit(num_bodies: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(BOUNDS);
    let columns = 40;

    for i in 0..num_bodies {
        let x = 20.0 + (i % columns) as f64 * 38.0;
        let y = 20.0 + (i / columns) as f64 * 30.0;
        let shape = if i % 3 == 0 {
            Shape::rect(8.0, 8.0)
        } else {
            Shape::circle(8.0 + (i % 4) as f64)
        };
        let velocity = Vec2::new(((i * 37) % 200) as f64 - 100.0, 0.0);
        world.create_body_with(
            shape,
            Transform::at(x, y),
            Kinematics::new(velocity, 1.0, 0.6),
            BodyFlags::default(),
        );
    }

    // A few static obstacles in the lower half
    for i in 0..4 {
        world.create_body_with(
            Shape::rect(120.0, 10.0),
            Transform::at(200.0 + i as f64 * 400.0, 700.0),
            Kinematics::immovable(),
            BodyFlags::ACTIVE | BodyFlags::STATIC,
        );
    }
    world
}

// Steps a prebuilt world; setup stays outside the measurement
fn bench_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for num_bodies in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_bodies), num_bodies, |b, &n| {
            let mut world = build_ball_pit(n);
            let dt = 1.0 / 60.0;
            b.iter(|| {
                world.step(black_box(dt));
            });
        });
    }
    group.finish();
}

// Broadphase query throughput against a static tree
fn bench_tree_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_query");

    for num_leaves in [100, 1000, 5000].iter() {
        let mut tree = AabbTree::new();
        for i in 0..*num_leaves {
            let x = (i % 100) as f64 * 20.0;
            let y = (i / 100) as f64 * 20.0;
            tree.insert(
                i as u32,
                AABB::new(Vec2::new(x, y), Vec2::new(x + 12.0, y + 12.0)).fattened(2.0),
            );
        }
        let probe = AABB::new(Vec2::new(500.0, 200.0), Vec2::new(540.0, 240.0));

        group.bench_with_input(BenchmarkId::from_parameter(num_leaves), &tree, |b, tree| {
            let mut out = Vec::with_capacity(64);
            b.iter(|| {
                out.clear();
                tree.query(black_box(&probe), &mut out);
                black_box(out.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_world_step, bench_tree_query);
criterion_main!(benches);
