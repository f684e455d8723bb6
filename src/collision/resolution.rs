use crate::math::vec2::Vec2;
use crate::objects::body::Body;

/// Separates two overlapping bodies and applies a normal impulse if they are
/// still approaching. `normal` points from `b` towards `a`.
///
/// Each body is moved by `overlap / total_inverse_mass / 2` scaled by its own
/// inverse mass, so immovable bodies stay put. The impulse uses the smaller of
/// the two restitution coefficients.
///
/// Returns `false` without touching either body when both are immovable.
pub fn resolve_contact(a: &mut Body, b: &mut Body, normal: Vec2, overlap: f64) -> bool {
    let inv_a = a.kinematics.inverse_mass;
    let inv_b = b.kinematics.inverse_mass;
    let total_inverse_mass = inv_a + inv_b;
    if total_inverse_mass <= 0.0 {
        return false;
    }

    let correction = normal * (overlap / total_inverse_mass * 0.5);
    a.transform.position += correction * inv_a;
    b.transform.position -= correction * inv_b;

    let relative_velocity = a.kinematics.velocity - b.kinematics.velocity;
    let approach = relative_velocity.dot(normal);
    if approach < 0.0 {
        let e = a.kinematics.restitution.min(b.kinematics.restitution);
        let j = -(1.0 + e) * approach / total_inverse_mass;
        let impulse = normal * j;
        a.kinematics.velocity += impulse * inv_a;
        b.kinematics.velocity -= impulse * inv_b;
    }
    true
}
