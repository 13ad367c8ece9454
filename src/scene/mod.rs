//! The drop scene: tracked objects, the per-frame physics/render synchronization,
//! user commands, and the frame loop that drives them.

pub mod clock;
pub mod commands;
pub mod factory;
pub mod frame_loop;
pub mod registry;
pub mod sound;

pub use clock::{FrameClock, ManualClock, TimeSource, WallClock};
pub use commands::{GravityPreset, SceneCommand};
pub use factory::{ObjectFactory, SpawnSampler};
pub use frame_loop::FrameLoop;
pub use registry::{BodyRegistry, ObjectKind, TrackedObject};
pub use sound::{ImpactSoundTrigger, SharedSoundTrigger};

use glam::Vec3;

use crate::{
    audio::AudioClip,
    config::{SceneConfig, FLOOR_SIZE},
    core::{collider::ColliderShape, material::MaterialTable, rigidbody::RigidBody},
    render::{Geometry, MeshDesc, MeshHandle, RenderScene, Renderer, SceneGraph, Surface},
    utils::allocator::EntityId,
    world::PhysicsWorld,
};

/// Owns both worlds and the registry tying them together.
pub struct DropScene {
    config: SceneConfig,
    world: PhysicsWorld,
    render: SceneGraph,
    registry: BodyRegistry,
    factory: ObjectFactory,
    spawner: SpawnSampler,
    clock: FrameClock,
    sound: SharedSoundTrigger,
    floor_body: EntityId,
    floor_mesh: MeshHandle,
}

impl DropScene {
    /// Builds the floor, then spawns the configured initial spheres and bricks.
    pub fn new(config: SceneConfig, clip: impl AudioClip + 'static) -> Self {
        let (materials, default, concrete) = MaterialTable::drop_scene();
        let mut world = PhysicsWorld::new(materials);
        world.set_gravity(config.gravity);
        world.set_allow_sleep(config.allow_sleep);
        world.solver.iterations = config.solver_iterations.max(1);

        let trigger = match config.seed {
            Some(seed) => ImpactSoundTrigger::seeded(clip, seed.wrapping_add(1)),
            None => ImpactSoundTrigger::new(clip),
        };
        let sound = trigger.with_threshold(config.impact_threshold).into_shared();

        let mut render = SceneGraph::new();
        let floor_body = world.add_body(RigidBody::fixed(ColliderShape::Plane, default));
        let floor_mesh = render.add_mesh(
            MeshDesc::new(Geometry::Floor { size: FLOOR_SIZE as u32 }, Surface::Ground)
                .receiving_shadow(),
        );

        let mut scene = Self {
            factory: ObjectFactory::new(default, concrete, sound.clone()),
            spawner: SpawnSampler::new(config.seed, config.spawn_spread, config.spawn_height),
            config,
            world,
            render,
            registry: BodyRegistry::new(),
            clock: FrameClock::new(),
            sound,
            floor_body,
            floor_mesh,
        };
        scene.populate();
        scene
    }

    fn populate(&mut self) {
        for _ in 0..self.config.initial_spheres {
            self.drop_sphere();
        }
        for _ in 0..self.config.initial_bricks {
            self.drop_brick();
        }
    }

    pub fn spawn_sphere(&mut self, radius: f32, position: Vec3) -> TrackedObject {
        self.spawn(ObjectKind::Sphere { radius }, position)
    }

    pub fn spawn_brick(&mut self, position: Vec3) -> TrackedObject {
        self.spawn(ObjectKind::Brick, position)
    }

    pub fn spawn(&mut self, kind: ObjectKind, position: Vec3) -> TrackedObject {
        self.factory.spawn(
            kind,
            position,
            &mut self.world,
            &mut self.render,
            &mut self.registry,
        )
    }

    /// Spawns a default-radius sphere at a random drop position.
    pub fn drop_sphere(&mut self) -> TrackedObject {
        let position = self.spawner.next_position();
        self.spawn_sphere(self.config.sphere_radius, position)
    }

    pub fn drop_brick(&mut self) -> TrackedObject {
        let position = self.spawner.next_position();
        self.spawn_brick(position)
    }

    /// Removes every tracked object; the floor stays.
    pub fn reset(&mut self) -> usize {
        self.registry.reset(&mut self.world, &mut self.render)
    }

    /// Per-frame simulation step: derive the delta from `elapsed`, advance
    /// physics with fixed sub-steps, then copy every body pose onto its mesh.
    /// Returns the number of physics sub-steps run.
    pub fn tick(&mut self, elapsed: f32) -> u32 {
        let delta = self.clock.delta(elapsed);
        let substeps = self
            .world
            .step(self.config.time_step, delta, self.config.max_substeps);
        self.registry.sync_poses(&self.world, &mut self.render);
        substeps
    }

    /// [`tick`](Self::tick) followed by a draw of the synchronized scene.
    pub fn frame<R>(&mut self, elapsed: f32, renderer: &mut R) -> u32
    where
        R: Renderer + ?Sized,
    {
        let substeps = self.tick(elapsed);
        renderer.render(&self.render);
        substeps
    }

    /// Sets the vertical gravity component, as the UI selector does.
    pub fn set_gravity(&mut self, value: f32) {
        self.world.set_gravity(Vec3::new(0.0, value, 0.0));
    }

    pub fn gravity_gauge(&self) -> f32 {
        self.world.gravity().y.abs()
    }

    pub fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::SpawnSphere => {
                self.drop_sphere();
            }
            SceneCommand::SpawnBrick => {
                self.drop_brick();
            }
            SceneCommand::Reset => {
                self.reset();
            }
            SceneCommand::SetGravity(value) => self.set_gravity(value),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn render_scene(&self) -> &SceneGraph {
        &self.render
    }

    pub fn sound_trigger(&self) -> &SharedSoundTrigger {
        &self.sound
    }

    pub fn floor(&self) -> (EntityId, MeshHandle) {
        (self.floor_body, self.floor_mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingClip, SilentClip};

    fn seeded() -> SceneConfig {
        SceneConfig::default().with_seed(11)
    }

    #[test]
    fn initial_population_is_two_spheres_then_three_bricks() {
        let scene = DropScene::new(seeded(), SilentClip);
        let kinds: Vec<_> = scene.registry().iter().map(|object| object.kind).collect();

        assert_eq!(kinds.len(), 5);
        assert!(kinds[..2]
            .iter()
            .all(|kind| matches!(kind, ObjectKind::Sphere { radius } if *radius == 0.6)));
        assert!(kinds[2..].iter().all(|kind| *kind == ObjectKind::Brick));
        // floor plus five objects
        assert_eq!(scene.world().body_count(), 6);
        assert_eq!(scene.render_scene().mesh_count(), 6);
    }

    #[test]
    fn reset_keeps_floor_and_is_idempotent() {
        let mut scene = DropScene::new(seeded(), SilentClip);

        assert_eq!(scene.reset(), 5);
        assert_eq!(scene.reset(), 0);
        assert!(scene.registry().is_empty());
        assert_eq!(scene.world().body_count(), 1);
        assert_eq!(scene.world().listener_count(), 0);
        assert_eq!(scene.render_scene().mesh_count(), 1);

        let (floor_body, floor_mesh) = scene.floor();
        assert!(scene.world().body(floor_body).is_some());
        assert!(scene.render_scene().contains(floor_mesh));
    }

    #[test]
    fn first_tick_only_records_the_time() {
        let mut scene = DropScene::new(seeded(), SilentClip);
        assert_eq!(scene.tick(0.0), 0);
        assert_eq!(scene.world().time(), 0.0);
    }

    #[test]
    fn commands_route_to_scene_actions() {
        let mut scene = DropScene::new(SceneConfig::default().empty().with_seed(2), SilentClip);

        scene.apply(SceneCommand::SpawnSphere);
        scene.apply(SceneCommand::SpawnBrick);
        assert_eq!(scene.registry().len(), 2);

        scene.apply(SceneCommand::SetGravity(-1.62));
        assert_eq!(scene.world().gravity(), Vec3::new(0.0, -1.62, 0.0));
        assert!((scene.gravity_gauge() - 1.62).abs() < 1e-6);

        scene.apply(SceneCommand::Reset);
        assert!(scene.registry().is_empty());
    }

    #[test]
    fn hard_landing_plays_hit_sound() {
        let clip = RecordingClip::new();
        let mut scene = DropScene::new(SceneConfig::default().empty().with_seed(4), clip.clone());
        scene.spawn_sphere(0.6, Vec3::new(0.0, 6.0, 0.0));

        let dt = scene.config().time_step;
        for frame in 0..120 {
            scene.tick(frame as f32 * dt);
        }

        assert!(clip.play_count() >= 1);
        assert!(clip.plays().iter().all(|play| play.from_start));
    }
}
