//! A 2D rigid-body physics engine for interactive simulation.
//!
//! Bodies live in a sparse-set registry addressed by generational ids. Each
//! [`PhysicsWorld::step`] integrates forces, enforces the world boundary,
//! refits a dynamic AABB tree and resolves circle and box contacts with
//! impulses plus positional correction.

pub mod collision;
pub mod common;
pub mod constraints;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::filter::{
    CollisionFilter, LAYER_1, LAYER_2, LAYER_ALL, LAYER_NONE, MASK_1, MASK_2, MASK_ALL, MASK_NONE,
};
pub use collision::{AabbTree, CollisionInfo, Contact, AABB};
pub use common::PhysicsSettings;
pub use error::{PhysicsError, Result};
pub use math::{Rectangle, Transform, Vec2};
pub use objects::{Body, BodyFlags, BodyId, Kinematics};
pub use shapes::{BoxShape, Circle, Shape, ShapeKind};
pub use world::{BodyHandle, PhysicsWorld};
