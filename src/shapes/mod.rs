pub mod box_shape;
pub mod circle;

pub use box_shape::BoxShape;
pub use circle::Circle;

use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// Geometric shape of a body. The set is closed: narrowphase dispatch is an
/// exhaustive match over shape pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Box(BoxShape),
}

/// Discriminant of [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Box,
}

impl Shape {
    pub fn circle(radius: f64) -> Self {
        Shape::Circle(Circle::new(radius))
    }

    /// Box with the given half extents.
    pub fn rect(half_width: f64, half_height: f64) -> Self {
        Shape::Box(BoxShape::new(half_width, half_height))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Box(_) => ShapeKind::Box,
        }
    }

    /// Distance from the center to the edge of the shape's bounding box on
    /// each axis. Drives both AABB computation and boundary clamping.
    pub fn half_extents(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => Vec2::splat(c.radius),
            Shape::Box(b) => b.half_extents,
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match self {
            Shape::Circle(c) => Some(c.radius),
            Shape::Box(_) => None,
        }
    }
}
