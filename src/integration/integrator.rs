use crate::common::PhysicsSettings;
use crate::math::vec2::Vec2;
use crate::objects::body::Body;

/// Accumulates this step's acceleration: drag opposing velocity on both axes
/// (scaled by inverse mass) plus constant gravity on Y.
pub fn apply_forces(body: &mut Body, settings: &PhysicsSettings) {
    let k = &mut body.kinematics;
    let drag = k.velocity * (settings.drag_coeff * k.inverse_mass);
    k.acceleration += Vec2::new(0.0, settings.gravity) - drag;
}

/// Semi-Implicit Euler: velocity first, then position from the new velocity.
pub fn integrate(body: &mut Body, dt: f64) {
    let k = &mut body.kinematics;
    k.velocity += k.acceleration * dt;
    body.transform.position += k.velocity * dt;
}

/// Clears the acceleration accumulator for the next step.
pub fn reset(body: &mut Body) {
    body.kinematics.acceleration = Vec2::ZERO;
}
