use glam::Vec3;

use crate::{
    core::rigidbody::RigidBody,
    utils::{allocator::Arena, math::angular_velocity_to_quat},
};

/// Semi-implicit Euler integrator.
///
/// Velocities are advanced before contacts are solved and positions after,
/// so the solver always sees this step's gravity.
#[derive(Debug, Clone)]
pub struct Integrator {
    parallel: bool,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator {
    pub fn new() -> Self {
        Self { parallel: false }
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled && cfg!(feature = "parallel");
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn integrate_velocity(body: &mut RigidBody, gravity: Vec3, dt: f32) {
        if !body.is_active() {
            return;
        }

        let acceleration = gravity + body.force * body.inverse_mass();
        body.velocity.linear += acceleration * dt;

        body.velocity.linear *= (1.0 - body.linear_damping * dt).max(0.0);
        body.velocity.angular *= (1.0 - body.angular_damping * dt).max(0.0);

        body.force = Vec3::ZERO;
    }

    pub fn integrate_position(body: &mut RigidBody, dt: f32) {
        if !body.is_active() {
            return;
        }

        body.transform.position += body.velocity.linear * dt;

        let delta = angular_velocity_to_quat(body.velocity.angular, dt);
        body.transform.rotation = (delta * body.transform.rotation).normalize();
        body.update_world_inertia();
    }

    pub fn integrate_velocities(&self, bodies: &mut Arena<RigidBody>, gravity: Vec3, dt: f32) {
        self.for_each_body(bodies, |body| Self::integrate_velocity(body, gravity, dt));
    }

    pub fn integrate_positions(&self, bodies: &mut Arena<RigidBody>, dt: f32) {
        self.for_each_body(bodies, |body| Self::integrate_position(body, dt));
    }

    #[cfg(feature = "parallel")]
    fn for_each_body<F>(&self, bodies: &mut Arena<RigidBody>, op: F)
    where
        F: Fn(&mut RigidBody) + Sync + Send,
    {
        if self.parallel {
            bodies.par_for_each_mut(op);
        } else {
            bodies.values_mut().for_each(op);
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn for_each_body<F>(&self, bodies: &mut Arena<RigidBody>, op: F)
    where
        F: Fn(&mut RigidBody),
    {
        bodies.values_mut().for_each(op);
    }
}
