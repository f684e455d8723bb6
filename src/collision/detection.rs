//! Exact shape-pair tests.
//!
//! Every test reports `(normal, overlap)` with the normal pointing from the
//! second shape towards the first, so the resolver can push the first body
//! along `normal` and the second against it.

use crate::math::vec2::Vec2;
use crate::objects::body::Body;
use crate::shapes::{BoxShape, Circle, Shape};

/// Penetration normal (from B to A) and overlap depth.
pub type Penetration = (Vec2, f64);

/// Tests two bodies by their shapes. Box vs circle reuses the circle vs box
/// test with the arguments swapped.
pub fn collide(a: &Body, b: &Body) -> Option<Penetration> {
    let (pa, pb) = (a.position(), b.position());
    match (&a.shape, &b.shape) {
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_circle(pa, ca, pb, cb),
        (Shape::Box(ba), Shape::Box(bb)) => box_box(pa, ba, pb, bb),
        (Shape::Circle(c), Shape::Box(bx)) => circle_box(pa, c, pb, bx),
        (Shape::Box(bx), Shape::Circle(c)) => {
            circle_box(pb, c, pa, bx).map(|(normal, overlap)| (-normal, overlap))
        }
    }
}

pub fn circle_circle(pa: Vec2, a: &Circle, pb: Vec2, b: &Circle) -> Option<Penetration> {
    let delta = pa - pb;
    let radii = a.radius + b.radius;
    let dist_sq = delta.magnitude_squared();
    // Touching circles still report a zero-depth contact
    if dist_sq > radii * radii {
        return None;
    }
    let distance = dist_sq.sqrt();
    // Coincident centers separate along +y
    Some((delta.normalize_or(Vec2::UNIT_Y), radii - distance))
}

/// Axis-aligned boxes only. Separates along the axis of least penetration.
pub fn box_box(pa: Vec2, a: &BoxShape, pb: Vec2, b: &BoxShape) -> Option<Penetration> {
    least_penetration(pa - pb, a.half_extents + b.half_extents)
}

pub fn circle_box(pc: Vec2, circle: &Circle, pbox: Vec2, bx: &BoxShape) -> Option<Penetration> {
    let delta = pc - pbox;
    let closest = pbox + delta.clamp_symmetric(bx.half_extents);
    let offset = pc - closest;
    let dist_sq = offset.magnitude_squared();

    if dist_sq < 1e-12 {
        // Center inside the box: push out through the nearest face
        return least_penetration(delta, bx.half_extents + Vec2::splat(circle.radius));
    }
    if dist_sq > circle.radius * circle.radius {
        return None;
    }
    let distance = dist_sq.sqrt();
    Some((offset.normalize_or(Vec2::UNIT_Y), circle.radius - distance))
}

fn least_penetration(delta: Vec2, extent: Vec2) -> Option<Penetration> {
    let px = extent.x - delta.x.abs();
    let py = extent.y - delta.y.abs();
    if px <= 0.0 || py <= 0.0 {
        return None;
    }
    let sign = |v: f64| if v < 0.0 { -1.0 } else { 1.0 };
    if px < py {
        Some((Vec2::new(sign(delta.x), 0.0), px))
    } else {
        Some((Vec2::new(0.0, sign(delta.y)), py))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_vec_eq(v: Vec2, x: f64, y: f64) {
        assert!((v.x - x).abs() < EPSILON && (v.y - y).abs() < EPSILON, "got {:?}", v);
    }

    #[test]
    fn test_circle_circle_overlap() {
        let (n, d) = circle_circle(
            Vec2::new(400.0, 400.0),
            &Circle::new(10.0),
            Vec2::new(410.0, 400.0),
            &Circle::new(10.0),
        )
        .unwrap();
        // From B (right) to A (left)
        assert_vec_eq(n, -1.0, 0.0);
        assert!((d - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_circle_circle_separated_and_touching() {
        let c = Circle::new(10.0);
        assert!(circle_circle(Vec2::ZERO, &c, Vec2::new(50.0, 0.0), &c).is_none());

        let (n, d) = circle_circle(Vec2::ZERO, &c, Vec2::new(20.0, 0.0), &c).unwrap();
        assert_vec_eq(n, -1.0, 0.0);
        assert!(d.abs() < EPSILON);
    }

    #[test]
    fn test_circle_box_touching_face() {
        let (n, d) = circle_box(
            Vec2::new(15.0, 0.0),
            &Circle::new(5.0),
            Vec2::ZERO,
            &BoxShape::new(10.0, 10.0),
        )
        .unwrap();
        assert_vec_eq(n, 1.0, 0.0);
        assert!(d.abs() < EPSILON);
    }

    #[test]
    fn test_circle_circle_coincident_falls_back() {
        let c = Circle::new(3.0);
        let (n, d) = circle_circle(Vec2::new(5.0, 5.0), &c, Vec2::new(5.0, 5.0), &c).unwrap();
        assert_vec_eq(n, 0.0, 1.0);
        assert!((d - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_box_box_least_axis() {
        let b = BoxShape::new(10.0, 10.0);
        // Overlap 2 on x, 15 on y
        let (n, d) = box_box(Vec2::new(18.0, 5.0), &b, Vec2::ZERO, &b).unwrap();
        assert_vec_eq(n, 1.0, 0.0);
        assert!((d - 2.0).abs() < EPSILON);

        let (n, d) = box_box(Vec2::new(0.0, -17.0), &b, Vec2::ZERO, &b).unwrap();
        assert_vec_eq(n, 0.0, -1.0);
        assert!((d - 3.0).abs() < EPSILON);

        assert!(box_box(Vec2::new(20.0, 0.0), &b, Vec2::ZERO, &b).is_none());
    }

    #[test]
    fn test_circle_box_outside() {
        let (n, d) = circle_box(
            Vec2::new(0.0, -14.0),
            &Circle::new(5.0),
            Vec2::ZERO,
            &BoxShape::new(10.0, 10.0),
        )
        .unwrap();
        assert_vec_eq(n, 0.0, -1.0);
        assert!((d - 1.0).abs() < EPSILON);

        // Near the corner but out of reach
        assert!(circle_box(
            Vec2::new(14.0, 14.0),
            &Circle::new(5.0),
            Vec2::ZERO,
            &BoxShape::new(10.0, 10.0)
        )
        .is_none());
    }

    #[test]
    fn test_circle_box_center_inside() {
        let (n, d) = circle_box(
            Vec2::new(8.0, 0.0),
            &Circle::new(5.0),
            Vec2::ZERO,
            &BoxShape::new(10.0, 10.0),
        )
        .unwrap();
        assert_vec_eq(n, 1.0, 0.0);
        assert!((d - 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_box_circle_is_mirrored() {
        use crate::math::Transform;
        use crate::objects::body::{BodyFlags, Kinematics};
        use crate::objects::registry::BodyRegistry;

        let mut registry = BodyRegistry::new();
        let bx = registry.create(
            Shape::rect(10.0, 10.0),
            Transform::at(0.0, 0.0),
            Kinematics::default(),
            BodyFlags::default(),
        );
        let c = registry.create(
            Shape::circle(5.0),
            Transform::at(0.0, 14.0),
            Kinematics::default(),
            BodyFlags::default(),
        );
        let bx = registry.get(bx).unwrap();
        let c = registry.get(c).unwrap();

        let (n_cb, d_cb) = collide(c, bx).unwrap();
        let (n_bc, d_bc) = collide(bx, c).unwrap();
        assert_vec_eq(n_cb, 0.0, 1.0);
        assert_vec_eq(n_bc, 0.0, -1.0);
        assert!((d_cb - d_bc).abs() < EPSILON);
    }
}
