use std::sync::Arc;

use glam::Vec3;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{
    registry::{BodyRegistry, ObjectKind, TrackedObject},
    sound::{sound_listener, SharedSoundTrigger},
};
use crate::{
    config::{BRICK_MASS, BRICK_SIZE, SPHERE_MASS},
    core::{collider::ColliderShape, material::MaterialId, rigidbody::RigidBody},
    render::{Geometry, MeshDesc, RenderScene, Surface},
    world::PhysicsWorld,
};

/// Creates paired bodies and meshes for the scene's primitives.
pub struct ObjectFactory {
    sphere_material: MaterialId,
    brick_material: MaterialId,
    sound: SharedSoundTrigger,
}

impl ObjectFactory {
    pub fn new(
        sphere_material: MaterialId,
        brick_material: MaterialId,
        sound: SharedSoundTrigger,
    ) -> Self {
        Self {
            sphere_material,
            brick_material,
            sound,
        }
    }

    /// Spawns one tracked object at `position`.
    ///
    /// Parameters are not validated; a non-positive radius yields a body the
    /// solver cannot make sense of.
    pub fn spawn<S>(
        &self,
        kind: ObjectKind,
        position: Vec3,
        world: &mut PhysicsWorld,
        scene: &mut S,
        registry: &mut BodyRegistry,
    ) -> TrackedObject
    where
        S: RenderScene + ?Sized,
    {
        let (body, mesh) = match kind {
            ObjectKind::Sphere { radius } => (
                RigidBody::dynamic(ColliderShape::sphere(radius), SPHERE_MASS, self.sphere_material),
                MeshDesc::new(Geometry::UnitSphere, Surface::Ball).scaled(Vec3::splat(radius)),
            ),
            ObjectKind::Brick => {
                let size = Vec3::from_array(BRICK_SIZE);
                (
                    RigidBody::dynamic(ColliderShape::cuboid(size * 0.5), BRICK_MASS, self.brick_material),
                    MeshDesc::new(Geometry::UnitCube, Surface::StoneBrick).scaled(size),
                )
            }
        };

        let body = world.add_body(body.with_position(position));
        let mesh = scene.add_mesh(mesh.at(position).casting_shadow());
        let listener = world.add_collision_listener(body, sound_listener(Arc::clone(&self.sound)));

        let object = TrackedObject {
            kind,
            body,
            mesh,
            listener,
        };
        registry.push(object);
        debug!("spawned {kind:?} at {position} as body {body}");
        object
    }
}

/// Random drop positions: x and z spread around the origin at a fixed height.
pub struct SpawnSampler {
    rng: StdRng,
    spread: f32,
    height: f32,
}

impl SpawnSampler {
    pub fn new(seed: Option<u64>, spread: f32, height: f32) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, spread, height }
    }

    pub fn next_position(&mut self) -> Vec3 {
        let x = (self.rng.random::<f32>() - 0.5) * self.spread;
        let z = (self.rng.random::<f32>() - 0.5) * self.spread;
        Vec3::new(x, self.height, z)
    }
}
