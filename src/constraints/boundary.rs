//! World boundary constraints.
//!
//! Each of the four walls is independent: a body past a wall is clamped back
//! onto it, the velocity component into the wall is reflected and scaled by
//! the body's restitution, the tangential component is damped by friction,
//! and small leftovers are zeroed so resting bodies do not jitter.

use crate::common::PhysicsSettings;
use crate::math::Rectangle;
use crate::objects::body::Body;

/// Applies floor, ceiling, right wall and left wall, in that order.
pub fn resolve_boundaries(body: &mut Body, bounds: &Rectangle, settings: &PhysicsSettings) {
    let extent = body.shape.half_extents();

    resolve_floor(body, bounds.bottom() - extent.y, settings);
    resolve_ceiling(body, bounds.top() + extent.y, settings);
    resolve_right_wall(body, bounds.right() - extent.x, settings);
    resolve_left_wall(body, bounds.left() + extent.x, settings);
}

fn damp_horizontal_on_ground(body: &mut Body, settings: &PhysicsSettings) {
    let v = &mut body.kinematics.velocity;
    if v.x.abs() > 0.0 {
        v.x *= settings.ground_friction;
        if v.x.abs() < settings.floor_stop_velocity {
            v.x = 0.0;
        }
    }
    if v.y.abs() < settings.rest_velocity {
        v.y = 0.0;
    }
}

fn damp_vertical_on_wall(body: &mut Body, settings: &PhysicsSettings) {
    let v = &mut body.kinematics.velocity;
    if v.y.abs() > settings.rest_velocity {
        v.y *= settings.wall_friction;
    }
    if v.x.abs() < settings.rest_velocity {
        v.x = 0.0;
    }
}

fn resolve_floor(body: &mut Body, limit: f64, settings: &PhysicsSettings) {
    if body.transform.position.y < limit {
        return;
    }
    body.transform.position.y = limit;
    let k = &mut body.kinematics;
    if k.velocity.y > 0.0 {
        k.velocity.y *= -k.restitution;
    }
    damp_horizontal_on_ground(body, settings);
}

fn resolve_ceiling(body: &mut Body, limit: f64, settings: &PhysicsSettings) {
    if body.transform.position.y > limit {
        return;
    }
    body.transform.position.y = limit;
    let k = &mut body.kinematics;
    if k.velocity.y < 0.0 {
        k.velocity.y *= -k.restitution;
    }
    damp_horizontal_on_ground(body, settings);
}

fn resolve_right_wall(body: &mut Body, limit: f64, settings: &PhysicsSettings) {
    if body.transform.position.x < limit {
        return;
    }
    body.transform.position.x = limit;
    let k = &mut body.kinematics;
    if k.velocity.x > 0.0 {
        k.velocity.x *= -k.restitution;
    }
    damp_vertical_on_wall(body, settings);
}

fn resolve_left_wall(body: &mut Body, limit: f64, settings: &PhysicsSettings) {
    if body.transform.position.x > limit {
        return;
    }
    body.transform.position.x = limit;
    let k = &mut body.kinematics;
    if k.velocity.x < 0.0 {
        k.velocity.x *= -k.restitution;
    }
    damp_vertical_on_wall(body, settings);
}
