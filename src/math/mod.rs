pub mod rectangle;
pub mod transform;
pub mod vec2;

pub use rectangle::Rectangle;
pub use transform::Transform;
pub use vec2::Vec2;
