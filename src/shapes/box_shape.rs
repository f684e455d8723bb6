use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// Axis-aligned box described by its half extents. Rotation is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub half_extents: Vec2,
}

impl BoxShape {
    pub fn new(half_width: f64, half_height: f64) -> Self {
        assert!(
            half_width >= 0.0 && half_height >= 0.0,
            "Box half extents cannot be negative"
        );
        Self { half_extents: Vec2::new(half_width, half_height) }
    }

    /// Box of the given full width and height.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(width * 0.5, height * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_from_size_halves_dimensions() {
        let b = BoxShape::from_size(20.0, 10.0);
        assert_eq!(b.half_extents, Vec2::new(10.0, 5.0));
    }

    #[test]
    #[should_panic]
    fn test_box_negative_extent() {
        BoxShape::new(-1.0, 2.0);
    }
}
