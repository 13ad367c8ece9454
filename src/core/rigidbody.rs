use glam::{Mat3, Quat, Vec3};

use super::{
    collider::ColliderShape,
    material::MaterialId,
    types::{MassProperties, Transform, Velocity},
};
use crate::{
    config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING},
    utils::math::world_inverse_inertia,
};

/// Whether a body is simulated, and if so whether it is currently resting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepState {
    Awake,
    /// Below the speed limit, counting towards sleep.
    Sleepy,
    Sleeping,
}

/// Core rigid body description storing kinematic state and properties.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub transform: Transform,
    pub velocity: Velocity,
    /// Force accumulated for the current sub-step, cleared by the integrator.
    pub force: Vec3,
    pub shape: ColliderShape,
    pub material: MaterialId,
    pub mass_properties: MassProperties,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub allow_sleep: bool,
    pub(crate) sleep_state: SleepState,
    pub(crate) sleepy_time: f32,
    inverse_mass: f32,
    inverse_inertia_local: Mat3,
    inverse_inertia_world: Mat3,
}

impl RigidBody {
    /// A simulated body whose inertia is derived from `shape`.
    pub fn dynamic(shape: ColliderShape, mass: f32, material: MaterialId) -> Self {
        Self::with_mass_properties(shape, shape.mass_properties(mass), material)
    }

    /// An immovable body (mass 0).
    pub fn fixed(shape: ColliderShape, material: MaterialId) -> Self {
        Self::with_mass_properties(shape, MassProperties::fixed(), material)
    }

    fn with_mass_properties(
        shape: ColliderShape,
        mass_properties: MassProperties,
        material: MaterialId,
    ) -> Self {
        let mut body = Self {
            transform: Transform::default(),
            velocity: Velocity::default(),
            force: Vec3::ZERO,
            shape,
            material,
            mass_properties,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            allow_sleep: true,
            sleep_state: SleepState::Awake,
            sleepy_time: 0.0,
            inverse_mass: 0.0,
            inverse_inertia_local: Mat3::ZERO,
            inverse_inertia_world: Mat3::ZERO,
        };
        body.recompute_inverses();
        body
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation.normalize();
        self.update_world_inertia();
        self
    }

    pub fn with_velocity(mut self, linear: Vec3, angular: Vec3) -> Self {
        self.velocity = Velocity { linear, angular };
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleep_state == SleepState::Sleeping
    }

    pub fn sleep_state(&self) -> SleepState {
        self.sleep_state
    }

    /// True for dynamic bodies that are being integrated this step.
    pub fn is_active(&self) -> bool {
        self.is_dynamic() && !self.is_sleeping()
    }

    pub fn wake_up(&mut self) {
        if self.sleep_state == SleepState::Sleeping {
            log::trace!("body woken up");
        }
        self.sleep_state = SleepState::Awake;
        self.sleepy_time = 0.0;
    }

    pub fn sleep(&mut self) {
        self.sleep_state = SleepState::Sleeping;
        self.velocity = Velocity::default();
        self.force = Vec3::ZERO;
    }

    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn inverse_inertia(&self) -> Mat3 {
        self.inverse_inertia_world
    }

    /// Inverse mass as seen by the contact solver; sleeping bodies act static.
    pub fn solver_inverse_mass(&self) -> f32 {
        if self.is_active() {
            self.inverse_mass
        } else {
            0.0
        }
    }

    pub fn solver_inverse_inertia(&self) -> Mat3 {
        if self.is_active() {
            self.inverse_inertia_world
        } else {
            Mat3::ZERO
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_static() {
            return;
        }
        self.force += force;
    }

    /// Applies an impulse at a world-space point.
    pub fn apply_impulse(&mut self, impulse: Vec3, point: Vec3) {
        if !self.is_active() {
            return;
        }
        self.velocity.linear += impulse * self.inverse_mass;
        let torque = (point - self.transform.position).cross(impulse);
        self.velocity.angular += self.inverse_inertia_world * torque;
    }

    /// Velocity of the material point currently at `point`.
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.velocity.linear + self.velocity.angular.cross(point - self.transform.position)
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.mass_properties = props;
        self.recompute_inverses();
    }

    pub(crate) fn update_world_inertia(&mut self) {
        self.inverse_inertia_world =
            world_inverse_inertia(self.inverse_inertia_local, self.transform.rotation);
    }

    fn recompute_inverses(&mut self) {
        if self.mass_properties.mass.abs() < f32::EPSILON {
            self.inverse_mass = 0.0;
            self.inverse_inertia_local = Mat3::ZERO;
        } else {
            self.inverse_mass = 1.0 / self.mass_properties.mass;
            let inertia = self.mass_properties.inertia;
            self.inverse_inertia_local = if inertia.determinant().abs() < f32::EPSILON {
                Mat3::ZERO
            } else {
                inertia.inverse()
            };
        }
        self.update_world_inertia();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::MaterialTable;
    use approx::assert_relative_eq;

    fn material() -> MaterialId {
        MaterialTable::drop_scene().1
    }

    #[test]
    fn fixed_body_ignores_impulses() {
        let mut floor = RigidBody::fixed(ColliderShape::Plane, material());
        floor.apply_impulse(Vec3::Y * 10.0, Vec3::ZERO);
        assert!(floor.is_static());
        assert_eq!(floor.velocity.linear, Vec3::ZERO);
        assert_eq!(floor.solver_inverse_mass(), 0.0);
    }

    #[test]
    fn off_center_impulse_spins_body() {
        let mut ball = RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, material());
        ball.apply_impulse(Vec3::X * 10.0, Vec3::new(0.0, 0.6, 0.0));
        assert_relative_eq!(ball.velocity.linear.x, 1.0, epsilon = 1e-5);
        assert!(ball.velocity.angular.z < 0.0);
    }

    #[test]
    fn sleeping_body_is_static_to_the_solver() {
        let mut ball = RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, material())
            .with_velocity(Vec3::Y, Vec3::ZERO);
        ball.sleep();
        assert!(ball.is_sleeping());
        assert_eq!(ball.velocity.linear, Vec3::ZERO);
        assert_eq!(ball.solver_inverse_mass(), 0.0);

        ball.wake_up();
        assert_relative_eq!(ball.solver_inverse_mass(), 0.1);
    }
}
