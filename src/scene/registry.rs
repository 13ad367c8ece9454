use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    render::{MeshHandle, RenderScene},
    utils::allocator::EntityId,
    world::{ListenerId, PhysicsWorld},
};

/// Primitive a tracked object was spawned as.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Sphere { radius: f32 },
    Brick,
}

/// A physics body and the mesh that mirrors it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedObject {
    pub kind: ObjectKind,
    pub body: EntityId,
    pub mesh: MeshHandle,
    pub listener: ListenerId,
}

/// Every live tracked object, in creation order.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    objects: Vec<TrackedObject>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: TrackedObject) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> + '_ {
        self.objects.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TrackedObject> {
        self.objects.get(index)
    }

    /// Copies each body's position and orientation onto its mesh, in order.
    pub fn sync_poses<S>(&self, world: &PhysicsWorld, scene: &mut S) -> usize
    where
        S: RenderScene + ?Sized,
    {
        let mut synced = 0;
        for object in &self.objects {
            if let Some(body) = world.body(object.body) {
                scene.set_pose(object.mesh, body.position(), body.rotation());
                synced += 1;
            }
        }
        synced
    }

    /// Removes every tracked body, listener and mesh, then empties the registry.
    /// Returns how many objects were removed; an empty registry is a no-op.
    pub fn reset<S>(&mut self, world: &mut PhysicsWorld, scene: &mut S) -> usize
    where
        S: RenderScene + ?Sized,
    {
        if self.objects.is_empty() {
            return 0;
        }

        for object in &self.objects {
            world.remove_collision_listener(object.body, object.listener);
            world.remove_body(object.body);
            scene.remove_mesh(object.mesh);
        }
        let removed = self.objects.len();
        self.objects.clear();
        debug!("scene reset removed {removed} objects");
        removed
    }
}
