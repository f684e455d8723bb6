use tracing::{debug, trace, warn};

use crate::collision::{
    collide, resolve_contact, AabbTree, CollisionFilter, CollisionInfo, Contact, AABB,
};
use crate::common::PhysicsSettings;
use crate::constraints::resolve_boundaries;
use crate::error::{PhysicsError, Result};
use crate::integration::integrator;
use crate::math::{Rectangle, Transform, Vec2};
use crate::objects::{Body, BodyFlags, BodyId, BodyRegistry, Kinematics};
use crate::shapes::Shape;

/// Owns every body, the broadphase tree and the contacts of the last step.
///
/// Operations on ids that no longer exist are silent no-ops; the checked
/// accessors [`PhysicsWorld::try_body`] and [`PhysicsWorld::try_body_mut`]
/// report them as [`PhysicsError::UnknownBody`] instead.
#[derive(Debug)]
pub struct PhysicsWorld {
    settings: PhysicsSettings,
    boundary: Rectangle,
    registry: BodyRegistry,
    tree: AabbTree,
    contacts: Vec<Contact>,
    /// Indexed by raw id, rebuilt from `contacts` at the end of every step.
    colliding: Vec<bool>,
    candidates: Vec<u32>,
}

impl PhysicsWorld {
    /// Creates an empty world with default settings.
    pub fn new(boundary: Rectangle) -> Self {
        Self {
            settings: PhysicsSettings::default(),
            boundary,
            registry: BodyRegistry::new(),
            tree: AabbTree::new(),
            contacts: Vec::new(),
            colliding: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Creates an empty world after checking the boundary and the settings.
    pub fn with_settings(boundary: Rectangle, settings: PhysicsSettings) -> Result<Self> {
        let (width, height) = (boundary.width, boundary.height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PhysicsError::InvalidBoundary { width, height });
        }
        settings.validate()?;

        let mut world = Self::new(boundary);
        world.settings = settings;
        Ok(world)
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    pub fn boundary(&self) -> Rectangle {
        self.boundary
    }

    pub fn tree(&self) -> &AabbTree {
        &self.tree
    }

    /// Contacts resolved during the last step.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn body_count(&self) -> usize {
        self.registry.len()
    }

    /// Raw ids of the bodies the step visits.
    pub fn active_ids(&self) -> &[u32] {
        self.registry.active_ids()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.registry.iter()
    }

    // ---- lifecycle ----

    /// Creates an active rigid body with default kinematics.
    pub fn create_body(&mut self, shape: Shape, transform: Transform) -> BodyHandle {
        self.create_body_with(shape, transform, Kinematics::default(), BodyFlags::default())
    }

    /// Creates a body. Active bodies that are rigid or static join the
    /// collision pool with the default layer and mask.
    pub fn create_body_with(
        &mut self,
        shape: Shape,
        transform: Transform,
        mut kinematics: Kinematics,
        flags: BodyFlags,
    ) -> BodyHandle {
        if flags.contains(BodyFlags::STATIC) {
            kinematics.velocity = Vec2::ZERO;
            kinematics.inverse_mass = 0.0;
        }
        let id = self.registry.create(shape, transform, kinematics, flags);
        if let Some(raw) = self.colliding.get_mut(id.index() as usize) {
            *raw = false;
        }

        let collidable = self.registry.get(id).is_some_and(Body::is_collidable);
        if collidable {
            self.add_to_collision_pool(id);
        }
        debug!(%id, kind = ?shape.kind(), ?flags, "created body");
        BodyHandle(id)
    }

    /// Removes a body and its tree leaf. Unknown ids are ignored.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(body) = self.registry.remove(id) else {
            return false;
        };
        self.tree.remove(id.index());
        if let Some(flag) = self.colliding.get_mut(id.index() as usize) {
            *flag = false;
        }
        debug!(%id, pooled = body.in_collision_pool(), "removed body");
        true
    }

    /// Removes whichever body currently owns `raw`.
    pub fn remove_body_raw(&mut self, raw: u32) -> bool {
        match self.registry.id_of_raw(raw) {
            Some(id) => self.remove_body(id),
            None => false,
        }
    }

    pub fn body_exists(&self, id: BodyId) -> bool {
        self.registry.contains(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.registry.get(id)
    }

    /// Direct access. Moving a body here is picked up by the tree on the next
    /// step.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.registry.get_mut(id)
    }

    pub fn try_body(&self, id: BodyId) -> Result<&Body> {
        self.registry.get(id).ok_or(PhysicsError::UnknownBody(id))
    }

    pub fn try_body_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        self.registry.get_mut(id).ok_or(PhysicsError::UnknownBody(id))
    }

    /// Drops every body, the tree and the id counter.
    pub fn clear(&mut self) {
        debug!(bodies = self.registry.len(), "clearing world");
        self.tree.clear();
        self.registry.clear();
        self.contacts.clear();
        self.colliding.clear();
        self.candidates.clear();
    }

    // ---- collision pool and flags ----

    /// Gives the body a tree leaf. A body with an empty filter gets the
    /// default layer and mask. Idempotent.
    pub fn add_to_collision_pool(&mut self, id: BodyId) {
        let margin = self.settings.fat_margin;
        let Some(body) = self.registry.get_mut(id) else {
            return;
        };
        if body.in_collision_pool() {
            return;
        }
        if body.filter.is_none() {
            body.filter = CollisionFilter::DEFAULT;
        }
        body.flags.insert(BodyFlags::IN_COLLISION_POOL);
        self.tree.insert(id.index(), body.fat_aabb(margin));
        debug!(%id, filter = body.filter.0, "joined collision pool");
    }

    /// Drops the body's tree leaf. Idempotent.
    pub fn remove_from_collision_pool(&mut self, id: BodyId) {
        let Some(body) = self.registry.get_mut(id) else {
            return;
        };
        if !body.in_collision_pool() {
            return;
        }
        body.flags.remove(BodyFlags::IN_COLLISION_POOL);
        self.tree.remove(id.index());
        debug!(%id, "left collision pool");
    }

    /// Replaces the layer half of the body's filter.
    pub fn set_layer(&mut self, id: BodyId, layer: u32) {
        if let Some(body) = self.registry.get_mut(id) {
            body.filter.set_layer(layer);
        }
    }

    /// Replaces the mask half of the body's filter (`MASK_*` form).
    pub fn set_mask(&mut self, id: BodyId, mask: u32) {
        if let Some(body) = self.registry.get_mut(id) {
            body.filter.set_mask(mask);
        }
    }

    pub fn set_collision(&mut self, id: BodyId, layer: u32, mask: u32) {
        if let Some(body) = self.registry.get_mut(id) {
            body.filter = CollisionFilter::new(layer, mask);
        }
    }

    /// Puts the body back into the step pipeline and, when it is rigid or
    /// static, into the collision pool.
    pub fn set_active(&mut self, id: BodyId) {
        let Some(body) = self.registry.get_mut(id) else {
            return;
        };
        body.flags.insert(BodyFlags::ACTIVE);
        let collidable = body.is_collidable();
        self.registry.set_listed_active(id.index(), true);
        if collidable {
            self.add_to_collision_pool(id);
        }
    }

    /// Takes the body out of the step pipeline and the collision pool and
    /// clears its filter.
    pub fn set_inactive(&mut self, id: BodyId) {
        let Some(body) = self.registry.get_mut(id) else {
            return;
        };
        body.flags.remove(BodyFlags::ACTIVE);
        body.filter = CollisionFilter::NONE;
        self.registry.set_listed_active(id.index(), false);
        self.remove_from_collision_pool(id);
    }

    /// Toggles whether the integrator moves the body.
    pub fn set_rigid_body(&mut self, id: BodyId, rigid: bool) {
        if let Some(body) = self.registry.get_mut(id) {
            body.flags.set(BodyFlags::RIGID_BODY, rigid);
        }
    }

    // ---- simulation ----

    /// Advances the world by `dt` seconds: integrate and constrain, refit the
    /// tree, then detect and resolve contacts.
    ///
    /// `dt` is used as given. Large steps can tunnel fast bodies through thin
    /// obstacles.
    pub fn step(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "stepping with a non-finite or negative dt");
        }
        self.integrate_bodies(dt);
        self.refit_tree(dt);
        self.detect_and_resolve();
        self.rebuild_colliding();
        trace!(
            dt,
            bodies = self.registry.len(),
            contacts = self.contacts.len(),
            "step"
        );
    }

    fn integrate_bodies(&mut self, dt: f64) {
        for i in 0..self.registry.active_ids().len() {
            let raw = self.registry.active_ids()[i];
            let Some(body) = self.registry.get_raw_mut(raw) else {
                continue;
            };
            if !body.is_dynamic() {
                continue;
            }
            integrator::apply_forces(body, &self.settings);
            integrator::integrate(body, dt);
            resolve_boundaries(body, &self.boundary, &self.settings);
            integrator::reset(body);
        }
    }

    fn refit_tree(&mut self, dt: f64) {
        for &raw in self.registry.active_ids() {
            let Some(body) = self.registry.get_raw(raw) else {
                continue;
            };
            if !body.in_collision_pool() {
                continue;
            }
            let margin = self
                .settings
                .predictive_margin(body.velocity().magnitude(), dt);
            self.tree.update(raw, body.tight_aabb(), margin);
        }
    }

    fn detect_and_resolve(&mut self) {
        self.contacts.clear();
        let mut candidates = std::mem::take(&mut self.candidates);

        for i in 0..self.registry.active_ids().len() {
            let raw = self.registry.active_ids()[i];
            let Some(body) = self.registry.get_raw_mut(raw) else {
                continue;
            };
            if body.is_static() {
                body.kinematics.velocity = Vec2::ZERO;
                body.kinematics.inverse_mass = 0.0;
                continue;
            }
            if !body.in_collision_pool() {
                continue;
            }

            candidates.clear();
            self.tree.query(&body.tight_aabb(), &mut candidates);

            for &other in &candidates {
                let Some((a, b)) = self.registry.pair_mut(raw, other) else {
                    continue;
                };
                // Each dynamic pair once; statics only ever show up as `b`
                if !b.is_static() && other <= raw {
                    continue;
                }
                if !a.filter.allows(b.filter) {
                    continue;
                }
                let Some((normal, depth)) = collide(a, b) else {
                    continue;
                };
                if !resolve_contact(a, b, normal, depth) {
                    trace!(a = %a.id, b = %b.id, "both bodies immovable, contact not resolved");
                }
                self.contacts.push(Contact {
                    body_a: a.id,
                    body_b: b.id,
                    normal,
                    depth,
                });
            }
        }

        self.candidates = candidates;
    }

    fn rebuild_colliding(&mut self) {
        self.colliding.clear();
        self.colliding.resize(self.registry.id_capacity(), false);
        for contact in &self.contacts {
            self.colliding[contact.body_a.index() as usize] = true;
            self.colliding[contact.body_b.index() as usize] = true;
        }
    }

    // ---- queries ----

    /// Whether the body took part in a contact during the last step.
    pub fn is_body_in_collision(&self, id: BodyId) -> bool {
        self.registry.contains(id)
            && self
                .colliding
                .get(id.index() as usize)
                .copied()
                .unwrap_or(false)
    }

    /// Every contact of the last step involving `id`, with normals pointing
    /// away from it. Scans the whole contact list.
    pub fn get_all_collisions(&self, id: BodyId) -> Vec<CollisionInfo> {
        if !self.is_body_in_collision(id) {
            return Vec::new();
        }
        self.contacts
            .iter()
            .filter_map(|contact| contact.seen_from(id))
            .collect()
    }

    /// Calls `draw` once per tree node with its box and whether it is a leaf.
    pub fn draw_debug<F: FnMut(&AABB, bool)>(&self, draw: F) {
        self.tree.visit(draw);
    }
}

/// A weak, copyable reference to a body in a [`PhysicsWorld`].
///
/// Handles do not keep bodies alive. Once the body is removed every
/// operation through the handle is a no-op, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(BodyId);

impl BodyHandle {
    pub fn id(self) -> BodyId {
        self.0
    }

    pub fn is_valid(self, world: &PhysicsWorld) -> bool {
        world.body_exists(self.0)
    }

    pub fn get(self, world: &PhysicsWorld) -> Option<&Body> {
        world.body(self.0)
    }

    pub fn get_mut(self, world: &mut PhysicsWorld) -> Option<&mut Body> {
        world.body_mut(self.0)
    }

    pub fn is_colliding(self, world: &PhysicsWorld) -> bool {
        world.is_body_in_collision(self.0)
    }

    pub fn collisions(self, world: &PhysicsWorld) -> Vec<CollisionInfo> {
        world.get_all_collisions(self.0)
    }

    pub fn set_active(self, world: &mut PhysicsWorld) {
        world.set_active(self.0);
    }

    pub fn set_inactive(self, world: &mut PhysicsWorld) {
        world.set_inactive(self.0);
    }

    pub fn set_rigid_body(self, world: &mut PhysicsWorld, rigid: bool) {
        world.set_rigid_body(self.0, rigid);
    }

    pub fn set_collision_on(self, world: &mut PhysicsWorld) {
        world.add_to_collision_pool(self.0);
    }

    pub fn set_collision_off(self, world: &mut PhysicsWorld) {
        world.remove_from_collision_pool(self.0);
    }

    pub fn set_layer(self, world: &mut PhysicsWorld, layer: u32) {
        world.set_layer(self.0, layer);
    }

    pub fn set_mask(self, world: &mut PhysicsWorld, mask: u32) {
        world.set_mask(self.0, mask);
    }

    pub fn set_collision(self, world: &mut PhysicsWorld, layer: u32, mask: u32) {
        world.set_collision(self.0, layer, mask);
    }

    pub fn remove(self, world: &mut PhysicsWorld) -> bool {
        world.remove_body(self.0)
    }
}

impl From<BodyHandle> for BodyId {
    fn from(handle: BodyHandle) -> Self {
        handle.0
    }
}
