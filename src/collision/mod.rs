pub mod aabb;
pub mod detection;
pub mod filter;
pub mod manifold;
pub mod resolution;
pub mod tree;

pub use aabb::AABB;
pub use detection::collide;
pub use filter::CollisionFilter;
pub use manifold::{CollisionInfo, Contact};
pub use resolution::resolve_contact;
pub use tree::AabbTree;
