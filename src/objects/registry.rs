//! Sparse-set body storage.
//!
//! Bodies sit contiguously in a dense array. `sparse[id]` maps a stable id to
//! its dense slot and `dense[slot]` maps back, so removal is an O(1)
//! swap-with-last. Released ids are recycled from a free stack before the
//! counter advances; every release bumps the id's generation so a stale
//! [`BodyId`] fails validation instead of aliasing the body that reuses it.

use std::fmt;

use super::body::{Body, BodyFlags, Kinematics};
use crate::collision::filter::CollisionFilter;
use crate::math::Transform;
use crate::shapes::Shape;

/// Stable, generational body identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId {
    index: u32,
    generation: u32,
}

impl BodyId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Raw id: the key used by the broadphase and the collision flags.
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    sparse: Vec<Option<usize>>,
    dense: Vec<u32>,
    generations: Vec<u32>,
    free_ids: Vec<u32>,
    active_ids: Vec<u32>,
    next_id: u32,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new body and returns its id. Active bodies are also listed
    /// for the step pipeline. Collision pool enrolment is left to the caller.
    pub fn create(
        &mut self,
        shape: Shape,
        transform: Transform,
        kinematics: Kinematics,
        flags: BodyFlags,
    ) -> BodyId {
        let id = self.allocate_id();
        let slot = self.bodies.len();

        self.sparse[id.index as usize] = Some(slot);
        self.dense.push(id.index);
        self.bodies.push(Body {
            transform,
            kinematics,
            shape,
            id,
            flags: flags - BodyFlags::IN_COLLISION_POOL,
            filter: CollisionFilter::NONE,
        });

        if flags.contains(BodyFlags::ACTIVE) {
            self.active_ids.push(id.index);
        }
        id
    }

    /// Swap-removes a body and releases its id. Unknown ids return `None`.
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        if !self.contains(id) {
            return None;
        }
        let raw = id.index as usize;
        let slot = self.sparse[raw]?;

        let removed = self.bodies.swap_remove(slot);
        self.dense.swap_remove(slot);
        if slot < self.dense.len() {
            // The former last body now lives in `slot`
            let moved = self.dense[slot];
            self.sparse[moved as usize] = Some(slot);
        }

        self.sparse[raw] = None;
        self.generations[raw] = self.generations[raw].wrapping_add(1);
        self.free_ids.push(id.index);
        self.set_listed_active(id.index, false);
        Some(removed)
    }

    /// Authoritative existence check: the id must map to a slot inside the
    /// dense array and carry the current generation.
    pub fn contains(&self, id: BodyId) -> bool {
        self.contains_raw(id.index)
            && self.generations[id.index as usize] == id.generation
    }

    /// Existence check for a raw id, ignoring generation.
    pub fn contains_raw(&self, raw: u32) -> bool {
        self.slot_of(raw).is_some()
    }

    /// Current full id for a raw id, if a body holds it.
    pub fn id_of_raw(&self, raw: u32) -> Option<BodyId> {
        self.slot_of(raw)
            .map(|_| BodyId::new(raw, self.generations[raw as usize]))
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        if !self.contains(id) {
            return None;
        }
        self.get_raw(id.index)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        if !self.contains(id) {
            return None;
        }
        self.get_raw_mut(id.index)
    }

    pub fn get_raw(&self, raw: u32) -> Option<&Body> {
        self.slot_of(raw).map(|slot| &self.bodies[slot])
    }

    pub fn get_raw_mut(&mut self, raw: u32) -> Option<&mut Body> {
        self.slot_of(raw).map(move |slot| &mut self.bodies[slot])
    }

    /// Mutable access to two distinct bodies at once.
    pub fn pair_mut(&mut self, a: u32, b: u32) -> Option<(&mut Body, &mut Body)> {
        let slot_a = self.slot_of(a)?;
        let slot_b = self.slot_of(b)?;
        if slot_a == slot_b {
            return None;
        }
        if slot_a < slot_b {
            let (head, tail) = self.bodies.split_at_mut(slot_b);
            Some((&mut head[slot_a], &mut tail[0]))
        } else {
            let (head, tail) = self.bodies.split_at_mut(slot_a);
            Some((&mut tail[0], &mut head[slot_b]))
        }
    }

    /// Raw ids of the bodies the step pipeline visits.
    pub fn active_ids(&self) -> &[u32] {
        &self.active_ids
    }

    /// Adds or drops `raw` from the active list. Idempotent.
    pub fn set_listed_active(&mut self, raw: u32, active: bool) {
        let pos = self.active_ids.iter().position(|&id| id == raw);
        match (pos, active) {
            (None, true) => self.active_ids.push(raw),
            (Some(i), false) => {
                self.active_ids.swap_remove(i);
            }
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// One past the largest raw id ever issued; sizes per-id side tables.
    pub fn id_capacity(&self) -> usize {
        self.sparse.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Resets to the freshly constructed state, including the id counter.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.sparse.clear();
        self.dense.clear();
        self.generations.clear();
        self.free_ids.clear();
        self.active_ids.clear();
        self.next_id = 0;
    }

    /// True when `sparse` and `dense` are exact inverses over the live range.
    pub fn is_consistent(&self) -> bool {
        let forward = self.dense.iter().enumerate().all(|(slot, &raw)| {
            self.sparse.get(raw as usize).copied().flatten() == Some(slot)
                && self.bodies[slot].id.index == raw
        });
        let live = self.sparse.iter().filter(|s| s.is_some()).count();
        forward && live == self.dense.len() && self.dense.len() == self.bodies.len()
    }

    fn slot_of(&self, raw: u32) -> Option<usize> {
        self.sparse
            .get(raw as usize)
            .copied()
            .flatten()
            .filter(|&slot| slot < self.bodies.len())
    }

    fn allocate_id(&mut self) -> BodyId {
        let raw = match self.free_ids.pop() {
            Some(recycled) => recycled,
            None => {
                let fresh = self.next_id;
                self.next_id += 1;
                fresh
            }
        };
        if raw as usize >= self.sparse.len() {
            self.sparse.resize(raw as usize + 1, None);
            self.generations.resize(raw as usize + 1, 0);
        }
        BodyId::new(raw, self.generations[raw as usize])
    }
}
