use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Placement of a body in the world.
///
/// Only `position` is read by the solver. `rotation` and `scale` are carried
/// for the host (rendering, gameplay) and are never modified by a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f64, // radians
    pub scale: Vec2,
}

impl Transform {
    pub fn new(position: Vec2, rotation: f64, scale: Vec2) -> Self {
        Self { position, rotation, scale }
    }

    /// Unrotated, unit-scale transform at `position`.
    pub fn from_position(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }

    /// Shorthand for `from_position(Vec2::new(x, y))`.
    pub fn at(x: f64, y: f64) -> Self {
        Self::from_position(Vec2::new(x, y))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.scale, Vec2::ONE);
    }

    #[test]
    fn test_transform_at() {
        let t = Transform::at(3.0, -4.0);
        assert_eq!(t.position, Vec2::new(3.0, -4.0));
        assert_eq!(t.scale, Vec2::ONE);
    }
}
