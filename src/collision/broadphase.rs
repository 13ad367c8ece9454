use crate::{
    core::{collider::Aabb, rigidbody::RigidBody},
    utils::allocator::{Arena, EntityId},
};

/// Sweep-and-prune broad phase along a single axis.
///
/// Bounded shapes are sorted by the lower edge of their bounds on `axis` and
/// swept; unbounded shapes (planes) are paired with every bounded body.
pub struct BroadPhase {
    axis: usize,
    entries: Vec<(EntityId, Aabb)>,
    unbounded: Vec<EntityId>,
}

impl Default for BroadPhase {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BroadPhase {
    pub fn new(axis: usize) -> Self {
        Self {
            axis: axis.min(2),
            entries: Vec::new(),
            unbounded: Vec::new(),
        }
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Returns candidate pairs that could be touching, in sweep order.
    pub fn get_potential_pairs(&mut self, bodies: &Arena<RigidBody>) -> Vec<(EntityId, EntityId)> {
        self.entries.clear();
        self.unbounded.clear();

        for (id, body) in bodies.iter() {
            match body.shape.aabb(&body.transform) {
                Some(aabb) => self.entries.push((id, aabb)),
                None => self.unbounded.push(id),
            }
        }

        let axis = self.axis;
        self.entries
            .sort_unstable_by(|a, b| a.1.min[axis].total_cmp(&b.1.min[axis]));

        let mut pairs = Vec::new();
        for (i, (id_a, aabb_a)) in self.entries.iter().enumerate() {
            for (id_b, aabb_b) in &self.entries[i + 1..] {
                if aabb_b.min[axis] > aabb_a.max[axis] {
                    break;
                }
                if aabb_a.overlaps(aabb_b) && Self::needs_test(bodies, *id_a, *id_b) {
                    pairs.push((*id_a, *id_b));
                }
            }
        }

        for plane in &self.unbounded {
            for (id, _) in &self.entries {
                if Self::needs_test(bodies, *plane, *id) {
                    pairs.push((*plane, *id));
                }
            }
        }

        pairs
    }

    /// At least one side has to be simulated for a pair to matter.
    fn needs_test(bodies: &Arena<RigidBody>, a: EntityId, b: EntityId) -> bool {
        match (bodies.get(a), bodies.get(b)) {
            (Some(a), Some(b)) => a.is_active() || b.is_active(),
            _ => false,
        }
    }
}
