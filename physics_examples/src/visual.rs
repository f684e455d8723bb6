use ggez::event::{self, EventHandler, MouseButton};
use ggez::glam::Vec2 as GVec2;
use ggez::graphics::{self, Color, DrawMode, DrawParam, Mesh, Rect};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::{Context, GameResult};
use rigid2d::*;
use tracing::{debug, info};

use crate::scenes;

const TREE_LEAF: Color = Color::new(0.2, 0.9, 0.3, 0.6);
const TREE_BRANCH: Color = Color::new(0.9, 0.6, 0.1, 0.35);
const LAYER_2_COLOR: Color = Color::new(0.4, 0.6, 1.0, 1.0);

struct MainState {
    world: PhysicsWorld,
    scene: String,
    show_tree: bool,
    spawned: usize,
}

impl MainState {
    fn new(scene: &str) -> MainState {
        let world = scenes::build(scene).unwrap_or_else(|| PhysicsWorld::new(scenes::bounds()));
        MainState {
            world,
            scene: scene.to_string(),
            show_tree: true,
            spawned: 0,
        }
    }

    fn body_color(&self, body: &Body) -> Color {
        if body.is_static() {
            Color::new(0.6, 0.6, 0.6, 1.0)
        } else if self.world.is_body_in_collision(body.id) {
            Color::RED
        } else if body.filter.layer() & LAYER_2 != 0 {
            LAYER_2_COLOR
        } else {
            Color::WHITE
        }
    }
}

impl EventHandler for MainState {
    fn update(&mut self, _ctx: &mut Context) -> GameResult {
        // Fixed step, pacing is left to ggez
        self.world.step(1.0 / 60.0);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, Color::BLACK);

        for body in self.world.bodies() {
            let color = self.body_color(body);
            let p = body.position();
            match &body.shape {
                Shape::Circle(circle) => {
                    let mesh = Mesh::new_circle(
                        ctx,
                        DrawMode::fill(),
                        GVec2::new(0.0, 0.0),
                        circle.radius as f32,
                        0.1,
                        color,
                    )?;
                    canvas.draw(&mesh, DrawParam::new().dest(GVec2::new(p.x as f32, p.y as f32)));
                }
                Shape::Box(bx) => {
                    let h = bx.half_extents;
                    let rect = Rect::new(
                        (p.x - h.x) as f32,
                        (p.y - h.y) as f32,
                        (2.0 * h.x) as f32,
                        (2.0 * h.y) as f32,
                    );
                    let mesh = Mesh::new_rectangle(ctx, DrawMode::fill(), rect, color)?;
                    canvas.draw(&mesh, DrawParam::new());
                }
            }
        }

        if self.show_tree {
            let mut boxes = Vec::new();
            self.world.draw_debug(|aabb, leaf| boxes.push((*aabb, leaf)));
            for (aabb, leaf) in boxes {
                let rect = Rect::new(
                    aabb.min.x as f32,
                    aabb.min.y as f32,
                    (aabb.max.x - aabb.min.x) as f32,
                    (aabb.max.y - aabb.min.y) as f32,
                );
                let color = if leaf { TREE_LEAF } else { TREE_BRANCH };
                let mesh = Mesh::new_rectangle(ctx, DrawMode::stroke(1.0), rect, color)?;
                canvas.draw(&mesh, DrawParam::new());
            }
        }

        canvas.finish(ctx)
    }

    fn mouse_button_down_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> GameResult {
        if button == MouseButton::Left {
            let handle = scenes::spawn(&mut self.world, Vec2::new(x as f64, y as f64), self.spawned);
            self.spawned += 1;
            debug!(id = %handle.id(), "spawned body");
        } else if button == MouseButton::Right {
            // Remove whatever sits under the cursor
            let cursor = AABB::from_center_half_extents(Vec2::new(x as f64, y as f64), Vec2::splat(1.0));
            let hit = self
                .world
                .bodies()
                .find(|body| !body.is_static() && body.tight_aabb().overlaps(&cursor))
                .map(|body| body.id);
            if let Some(id) = hit {
                self.world.remove_body(id);
            }
        }
        Ok(())
    }

    fn key_down_event(&mut self, _ctx: &mut Context, input: KeyInput, _repeated: bool) -> GameResult {
        match input.keycode {
            Some(KeyCode::D) => self.show_tree = !self.show_tree,
            Some(KeyCode::R) => {
                let scene = self.scene.clone();
                info!(%scene, "resetting scene");
                *self = MainState::new(&scene);
            }
            Some(KeyCode::C) => self.world.clear(),
            _ => {}
        }
        Ok(())
    }
}

pub fn run_visual(scene: &str) -> GameResult {
    let cb = ggez::ContextBuilder::new("physics_examples", "rigid2d")
        .window_setup(ggez::conf::WindowSetup::default().title("rigid2d examples"))
        .window_mode(
            ggez::conf::WindowMode::default().dimensions(scenes::WIDTH as f32, scenes::HEIGHT as f32),
        );

    let (ctx, event_loop) = cb.build()?;
    let state = MainState::new(scene);
    event::run(ctx, event_loop, state)
}
