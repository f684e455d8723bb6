use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and size.
///
/// Used as the world boundary. The world is y-down: `y` is the ceiling and
/// `y + height` is the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_edges() {
        let r = Rectangle::new(10.0, 20.0, 800.0, 450.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 810.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 470.0);
    }
}
