use std::collections::HashSet;

use glam::Vec3;
use log::{debug, info, warn};

use crate::{
    collision::{
        broadphase::BroadPhase,
        contact::{CollisionEvent, Contact, ContactInfo, ContactManifold},
        narrowphase::NarrowPhase,
    },
    config::{DEFAULT_GRAVITY, DEFAULT_SOLVER_ITERATIONS},
    core::{material::MaterialTable, rigidbody::RigidBody},
    dynamics::{integrator::Integrator, sleep::SleepManager, solver::ContactSolver},
    utils::{
        allocator::{Arena, EntityId},
        logging::ScopedTimer,
    },
};

/// Callback invoked from inside [`PhysicsWorld::step`] when a body starts touching another.
pub type CollisionCallback = Box<dyn FnMut(&CollisionEvent) + Send>;

/// Handle of a registered collision listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(EntityId);

struct Listener {
    body: EntityId,
    callback: CollisionCallback,
}

/// Unordered body pair used by the touching-pairs matrices.
type PairKey = (EntityId, EntityId);

fn pair_key(a: EntityId, b: EntityId) -> PairKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Central simulation container orchestrating all subsystems.
pub struct PhysicsWorld {
    bodies: Arena<RigidBody>,
    listeners: Arena<Listener>,
    materials: MaterialTable,
    pub integrator: Integrator,
    pub solver: ContactSolver,
    pub sleep: SleepManager,
    gravity: Vec3,
    accumulator: f32,
    time: f32,
    broadphase: BroadPhase,
    touching: HashSet<PairKey>,
    touching_previous: HashSet<PairKey>,
    last_contact_count: usize,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(MaterialTable::default())
    }
}

impl PhysicsWorld {
    pub fn new(materials: MaterialTable) -> Self {
        Self {
            bodies: Arena::new(),
            listeners: Arena::new(),
            materials,
            integrator: Integrator::new(),
            solver: ContactSolver::new(DEFAULT_SOLVER_ITERATIONS),
            sleep: SleepManager::default(),
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            accumulator: 0.0,
            time: 0.0,
            broadphase: BroadPhase::default(),
            touching: HashSet::new(),
            touching_previous: HashSet::new(),
            last_contact_count: 0,
        }
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Changes gravity and wakes every sleeping body so it reacts immediately.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
        for body in self.bodies.values_mut() {
            if body.is_sleeping() {
                body.wake_up();
            }
        }
        info!("gravity set to {gravity}");
    }

    pub fn set_allow_sleep(&mut self, allow: bool) {
        self.sleep.enabled = allow;
        if !allow {
            for body in self.bodies.values_mut() {
                body.wake_up();
            }
        }
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.integrator.set_parallel(enabled);
    }

    /// Simulated time advanced so far, in whole fixed sub-steps.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn add_body(&mut self, body: RigidBody) -> EntityId {
        self.bodies.insert(body)
    }

    /// Removes a body together with its listeners and touching-pair entries.
    pub fn remove_body(&mut self, id: EntityId) -> Option<RigidBody> {
        let body = self.bodies.remove(id)?;
        let stale: Vec<_> = self
            .listeners
            .iter()
            .filter(|(_, listener)| listener.body == id)
            .map(|(listener_id, _)| listener_id)
            .collect();
        for listener_id in stale {
            self.listeners.remove(listener_id);
        }
        self.touching.retain(|(a, b)| *a != id && *b != id);
        self.touching_previous.retain(|(a, b)| *a != id && *b != id);
        Some(body)
    }

    pub fn body(&self, id: EntityId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Registers `callback` for collisions involving `body`.
    pub fn add_collision_listener<F>(&mut self, body: EntityId, callback: F) -> ListenerId
    where
        F: FnMut(&CollisionEvent) + Send + 'static,
    {
        ListenerId(self.listeners.insert(Listener {
            body,
            callback: Box::new(callback),
        }))
    }

    pub fn remove_collision_listener(&mut self, body: EntityId, listener: ListenerId) -> bool {
        match self.listeners.get(listener.0) {
            Some(entry) if entry.body == body => self.listeners.remove(listener.0).is_some(),
            _ => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Contacts produced by the most recent sub-step.
    pub fn contact_count(&self) -> usize {
        self.last_contact_count
    }

    /// Advances the simulation using a fixed timestep accumulator.
    ///
    /// `real_dt` is added to the accumulator and whole `fixed_dt` sub-steps
    /// are run while it holds one, at most `max_substeps` times. A backlog
    /// that survives the cap is discarded down to less than one sub-step.
    /// Returns the number of sub-steps run.
    pub fn step(&mut self, fixed_dt: f32, real_dt: f32, max_substeps: u32) -> u32 {
        if fixed_dt <= 0.0 {
            return 0;
        }
        self.accumulator += real_dt.max(0.0);

        let max_substeps = max_substeps.max(1);
        let mut substeps = 0;
        while self.accumulator >= fixed_dt && substeps < max_substeps {
            self.internal_step(fixed_dt);
            self.accumulator -= fixed_dt;
            substeps += 1;
        }

        if self.accumulator >= fixed_dt {
            let dropped = self.accumulator - self.accumulator % fixed_dt;
            warn!("physics fell behind, dropping {:.1} ms of simulation", dropped * 1000.0);
            self.accumulator %= fixed_dt;
        }

        substeps
    }

    /// Runs exactly one sub-step of `dt`, bypassing the accumulator.
    pub fn step_once(&mut self, dt: f32) {
        if dt > 0.0 {
            self.internal_step(dt);
        }
    }

    fn internal_step(&mut self, dt: f32) {
        let _timer = ScopedTimer::new("world::internal_step");

        {
            let _timer = ScopedTimer::new("integrator::velocities");
            self.integrator
                .integrate_velocities(&mut self.bodies, self.gravity, dt);
        }

        let manifolds = {
            let _timer = ScopedTimer::new("collision::detect");
            self.detect_collisions()
        };
        self.wake_touched_sleepers(&manifolds);

        let mut contacts = self.build_contacts(&manifolds);
        self.dispatch_collision_events(&manifolds, &contacts);

        {
            let _timer = ScopedTimer::new("solver::contacts");
            let metrics = self.solver.solve(&mut self.bodies, &mut contacts, dt);
            self.last_contact_count = metrics.contacts_solved;
        }
        {
            let _timer = ScopedTimer::new("integrator::positions");
            self.integrator.integrate_positions(&mut self.bodies, dt);
        }
        self.sleep.update_sleeping(&mut self.bodies, dt);
        self.time += dt;
    }

    fn detect_collisions(&mut self) -> Vec<ContactManifold> {
        let pairs = self.broadphase.get_potential_pairs(&self.bodies);
        let mut manifolds = Vec::with_capacity(pairs.len());
        for (id_a, id_b) in pairs {
            let (Some(body_a), Some(body_b)) = (self.bodies.get(id_a), self.bodies.get(id_b))
            else {
                continue;
            };
            if let Some(manifold) = NarrowPhase::generate(id_a, body_a, id_b, body_b) {
                manifolds.push(manifold);
            }
        }
        manifolds
    }

    fn wake_touched_sleepers(&mut self, manifolds: &[ContactManifold]) {
        let mut to_wake = Vec::new();
        for manifold in manifolds {
            let (Some(a), Some(b)) = (
                self.bodies.get(manifold.body_a),
                self.bodies.get(manifold.body_b),
            ) else {
                continue;
            };
            if self.sleep.should_wake(a, b) {
                to_wake.push(manifold.body_a);
            }
            if self.sleep.should_wake(b, a) {
                to_wake.push(manifold.body_b);
            }
        }
        for id in to_wake {
            if let Some(body) = self.bodies.get_mut(id) {
                body.wake_up();
            }
        }
    }

    fn build_contacts(&self, manifolds: &[ContactManifold]) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for manifold in manifolds {
            let (Some(body_a), Some(body_b)) = (
                self.bodies.get(manifold.body_a),
                self.bodies.get(manifold.body_b),
            ) else {
                continue;
            };
            let material = self.materials.resolve(body_a.material, body_b.material);
            for point in &manifold.points {
                let closing = body_a.velocity_at_point(point.point)
                    - body_b.velocity_at_point(point.point);
                contacts.push(Contact::new(
                    manifold.body_a,
                    manifold.body_b,
                    *point,
                    material,
                    closing.dot(point.normal),
                ));
            }
        }
        contacts
    }

    /// Notifies listeners of both bodies for every pair that was not touching
    /// during the previous sub-step.
    fn dispatch_collision_events(&mut self, manifolds: &[ContactManifold], contacts: &[Contact]) {
        std::mem::swap(&mut self.touching, &mut self.touching_previous);
        self.touching.clear();

        let mut events = Vec::new();
        for manifold in manifolds {
            let key = pair_key(manifold.body_a, manifold.body_b);
            self.touching.insert(key);
            if self.touching_previous.contains(&key) {
                continue;
            }

            let Some(strongest) = contacts
                .iter()
                .filter(|c| c.body_a == manifold.body_a && c.body_b == manifold.body_b)
                .max_by(|a, b| a.impact_velocity.total_cmp(&b.impact_velocity))
            else {
                continue;
            };

            events.push(CollisionEvent {
                body: manifold.body_a,
                other: manifold.body_b,
                contact: ContactInfo::new(
                    strongest.point,
                    strongest.normal,
                    strongest.depth,
                    strongest.impact_velocity,
                ),
            });
            events.push(CollisionEvent {
                body: manifold.body_b,
                other: manifold.body_a,
                contact: ContactInfo::new(
                    strongest.point,
                    -strongest.normal,
                    strongest.depth,
                    strongest.impact_velocity,
                ),
            });
        }

        if events.is_empty() || self.listeners.is_empty() {
            return;
        }
        debug!("dispatching {} collision events", events.len());
        for event in &events {
            for (_, listener) in self.listeners.iter_mut() {
                if listener.body == event.body {
                    (listener.callback)(event);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collider::ColliderShape;
    use parking_lot::Mutex;
    use std::sync::Arc;

    const DT: f32 = 1.0 / 60.0;

    fn ball(world: &PhysicsWorld, y: f32) -> RigidBody {
        let default = world.materials().find("default").expect("default material");
        RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, default)
            .with_position(Vec3::new(0.0, y, 0.0))
    }

    fn floor(world: &PhysicsWorld) -> RigidBody {
        let default = world.materials().find("default").expect("default material");
        RigidBody::fixed(ColliderShape::Plane, default)
    }

    #[test]
    fn accumulator_runs_whole_substeps_only() {
        let mut world = PhysicsWorld::default();
        assert_eq!(world.step(DT, 0.0, 3), 0);
        assert_eq!(world.step(DT, DT * 0.5, 3), 0);
        assert_eq!(world.step(DT, DT * 0.6, 3), 1);
        assert_eq!(world.step(DT, DT * 2.0, 3), 2);
    }

    #[test]
    fn catch_up_is_capped_and_backlog_dropped() {
        let mut world = PhysicsWorld::default();
        assert_eq!(world.step(DT, 1.0, 3), 3);
        assert_eq!(world.step(DT, 0.0, 3), 0);
        assert!((world.time() - 3.0 * DT).abs() < 1e-6);
    }

    #[test]
    fn negative_delta_never_steps_backwards() {
        let mut world = PhysicsWorld::default();
        let id = world.add_body(ball(&world, 6.0));
        assert_eq!(world.step(DT, -1.0, 3), 0);
        assert_eq!(world.body(id).map(RigidBody::position), Some(Vec3::new(0.0, 6.0, 0.0)));
    }

    #[test]
    fn listener_fires_once_per_new_contact() {
        let mut world = PhysicsWorld::default();
        world.add_body(floor(&world));
        let id = world.add_body(ball(&world, 0.65).with_velocity(Vec3::new(0.0, -3.0, 0.0), Vec3::ZERO));

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        world.add_collision_listener(id, move |event: &CollisionEvent| sink.lock().push(*event));

        for _ in 0..3 {
            world.step_once(DT);
        }

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].body, id);
        assert!(events[0].contact.normal.y < 0.0);
        assert!(events[0].contact.impact_velocity_along_normal() > 3.0);
    }

    #[test]
    fn removed_listener_is_silent() {
        let mut world = PhysicsWorld::default();
        world.add_body(floor(&world));
        let id = world.add_body(ball(&world, 0.5));
        let hits = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&hits);
        let listener = world.add_collision_listener(id, move |_: &CollisionEvent| *sink.lock() += 1);

        assert!(world.remove_collision_listener(id, listener));
        assert!(!world.remove_collision_listener(id, listener));
        world.step_once(DT);
        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn removing_body_drops_its_listeners() {
        let mut world = PhysicsWorld::default();
        let id = world.add_body(ball(&world, 3.0));
        world.add_collision_listener(id, |_: &CollisionEvent| {});
        assert_eq!(world.listener_count(), 1);

        assert!(world.remove_body(id).is_some());
        assert_eq!(world.listener_count(), 0);
        assert!(world.body(id).is_none());
        assert!(world.remove_body(id).is_none());
    }

    #[test]
    fn gravity_change_wakes_sleepers() {
        let mut world = PhysicsWorld::default();
        let mut sleeper = ball(&world, 0.6);
        sleeper.sleep();
        let id = world.add_body(sleeper);

        world.set_gravity(Vec3::new(0.0, -1.62, 0.0));
        assert!(!world.body(id).expect("body").is_sleeping());
        assert_eq!(world.gravity(), Vec3::new(0.0, -1.62, 0.0));
    }
}
