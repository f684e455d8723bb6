use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::registry::BodyId;
use crate::collision::aabb::AABB;
use crate::collision::filter::CollisionFilter;
use crate::math::{Transform, Vec2};
use crate::shapes::Shape;

bitflags! {
    /// Orthogonal capabilities of a body. Setting or clearing a flag that is
    /// already in the requested state is a no-op.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BodyFlags: u32 {
        /// Takes part in the per-step pipeline.
        const ACTIVE            = 1 << 0;
        /// Immovable obstacle: never integrated, always zero velocity.
        const STATIC            = 1 << 1;
        /// Integrated under forces.
        const RIGID_BODY        = 1 << 2;
        /// Has a leaf in the broadphase tree. Managed by the world.
        const IN_COLLISION_POOL = 1 << 3;
    }
}

impl Default for BodyFlags {
    fn default() -> Self {
        Self::ACTIVE | Self::RIGID_BODY
    }
}

/// Linear motion state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub velocity: Vec2,
    /// Accumulated for one step, reset to zero once the step integrates it.
    pub acceleration: Vec2,
    /// 0.0 marks an immovable body.
    pub inverse_mass: f64,
    /// 0 = fully inelastic, 1 = fully elastic, above 1 gains energy.
    pub restitution: f64,
}

impl Kinematics {
    pub fn new(velocity: Vec2, inverse_mass: f64, restitution: f64) -> Self {
        Self {
            velocity,
            acceleration: Vec2::ZERO,
            inverse_mass,
            restitution,
        }
    }

    /// Immovable kinematics: zero velocity and zero inverse mass.
    pub fn immovable() -> Self {
        Self::new(Vec2::ZERO, 0.0, 0.0)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

impl Default for Kinematics {
    /// Unit mass, at rest, half-elastic.
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0, 0.5)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub transform: Transform,
    pub kinematics: Kinematics,
    pub shape: Shape,
    pub id: BodyId,
    pub flags: BodyFlags,
    pub filter: CollisionFilter,
}

impl Body {
    /// Exact current bounds.
    pub fn tight_aabb(&self) -> AABB {
        AABB::from_center_half_extents(self.transform.position, self.shape.half_extents())
    }

    /// Current bounds padded by `margin` on every side.
    pub fn fat_aabb(&self, margin: f64) -> AABB {
        self.tight_aabb().fattened(margin)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.kinematics.velocity
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(BodyFlags::ACTIVE)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(BodyFlags::STATIC)
    }

    pub fn in_collision_pool(&self) -> bool {
        self.flags.contains(BodyFlags::IN_COLLISION_POOL)
    }

    /// Whether the integrator moves this body.
    pub fn is_dynamic(&self) -> bool {
        self.flags.contains(BodyFlags::RIGID_BODY)
            && !self.is_static()
            && self.kinematics.inverse_mass > 0.0
    }

    /// Eligible for the collision pool on creation or activation.
    pub fn is_collidable(&self) -> bool {
        self.is_active() && self.flags.intersects(BodyFlags::RIGID_BODY | BodyFlags::STATIC)
    }
}
