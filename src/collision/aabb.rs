// Axis-aligned bounding box and the pure helpers the broadphase is built on.

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
///
/// Zero-area boxes are legal; `min <= max` holds on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, reordering the corners if needed.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        AABB {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Closed-interval overlap test: boxes that only touch still overlap.
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Smallest box containing both inputs.
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn area(&self) -> f64 {
        (self.max.x - self.min.x) * (self.max.y - self.min.y)
    }

    /// True when `other` lies entirely inside (or on the edge of) `self`.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// Copy of the box grown by `margin` on every side.
    pub fn fattened(&self, margin: f64) -> AABB {
        let m = Vec2::splat(margin);
        AABB {
            min: self.min - m,
            max: self.max + m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> AABB {
        AABB::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    #[test]
    fn test_new_orders_corners() {
        let b = aabb(5.0, 5.0, 1.0, 2.0);
        assert_eq!(b.min, Vec2::new(1.0, 2.0));
        assert_eq!(b.max, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_overlap_is_closed() {
        let a = aabb(0.0, 0.0, 1.0, 1.0);
        let touching = aabb(1.0, 0.0, 2.0, 1.0);
        let apart = aabb(1.01, 0.0, 2.0, 1.0);
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_union_area_not_smaller_than_inputs() {
        let a = aabb(0.0, 0.0, 2.0, 1.0);
        let b = aabb(5.0, 3.0, 6.0, 7.0);
        let u = a.union(&b);
        assert_eq!(u, aabb(0.0, 0.0, 6.0, 7.0));
        assert!(u.area() >= a.area());
        assert!(u.area() >= b.area());
    }

    #[test]
    fn test_degenerate_box_has_zero_area() {
        let point = aabb(3.0, 3.0, 3.0, 3.0);
        assert_eq!(point.area(), 0.0);
        assert!(point.overlaps(&aabb(0.0, 0.0, 3.0, 3.0)));
    }

    #[test]
    fn test_contains_and_fattened() {
        let tight = AABB::from_center_half_extents(Vec2::new(10.0, 10.0), Vec2::splat(1.0));
        let fat = tight.fattened(2.0);
        assert_eq!(fat, aabb(7.0, 7.0, 13.0, 13.0));
        assert!(fat.contains(&tight));
        assert!(!tight.contains(&fat));
    }
}
