use crate::{
    collision::contact::Contact,
    config::{
        DEFAULT_BIAS_FACTOR, DEFAULT_PENETRATION_SLOP, DEFAULT_RESTITUTION_THRESHOLD,
        DEFAULT_SOLVER_ITERATIONS,
    },
    core::rigidbody::RigidBody,
    dynamics::friction::{apply_friction, effective_mass_denominator},
    utils::allocator::Arena,
};

/// Sequential-impulse contact solver with accumulated, clamped impulses.
#[derive(Debug, Clone)]
pub struct ContactSolver {
    pub iterations: u32,
    pub bias_factor: f32,
    pub slop: f32,
    pub restitution_threshold: f32,
}

impl Default for ContactSolver {
    fn default() -> Self {
        Self::new(DEFAULT_SOLVER_ITERATIONS)
    }
}

/// Totals gathered while solving one sub-step.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolverStepMetrics {
    pub contacts_solved: usize,
    pub normal_impulse_sum: f32,
    pub tangent_impulse_sum: f32,
}

impl ContactSolver {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
            bias_factor: DEFAULT_BIAS_FACTOR,
            slop: DEFAULT_PENETRATION_SLOP,
            restitution_threshold: DEFAULT_RESTITUTION_THRESHOLD,
        }
    }

    pub fn solve(
        &self,
        bodies: &mut Arena<RigidBody>,
        contacts: &mut [Contact],
        dt: f32,
    ) -> SolverStepMetrics {
        for _ in 0..self.iterations {
            for contact in contacts.iter_mut() {
                if let Some((body_a, body_b)) = bodies.get2_mut(contact.body_a, contact.body_b) {
                    self.resolve_contact(body_a, body_b, contact, dt);
                    apply_friction(body_a, body_b, contact);
                }
            }
        }

        let mut metrics = SolverStepMetrics {
            contacts_solved: contacts.len(),
            ..SolverStepMetrics::default()
        };
        for contact in contacts.iter() {
            metrics.normal_impulse_sum += contact.accumulated_normal_impulse;
            metrics.tangent_impulse_sum += contact.accumulated_tangent_impulse.length();
        }
        metrics
    }

    fn resolve_contact(
        &self,
        body_a: &mut RigidBody,
        body_b: &mut RigidBody,
        contact: &mut Contact,
        dt: f32,
    ) {
        if !body_a.is_active() && !body_b.is_active() {
            return;
        }

        let r_a = contact.point - body_a.position();
        let r_b = contact.point - body_b.position();
        let denominator = effective_mass_denominator(body_a, body_b, r_a, r_b, contact.normal);
        if denominator <= f32::EPSILON {
            return;
        }

        let relative_vel =
            body_b.velocity_at_point(contact.point) - body_a.velocity_at_point(contact.point);
        let vel_along_normal = relative_vel.dot(contact.normal);

        // Separation speed the contact should end up with: a bounce for hard
        // impacts, otherwise just enough to correct penetration beyond the slop.
        let bounce = if contact.impact_velocity > self.restitution_threshold {
            contact.material.restitution * contact.impact_velocity
        } else {
            0.0
        };
        let bias = self.bias_factor * (contact.depth - self.slop).max(0.0) / dt;
        let target = bounce.max(bias);

        let impulse_mag = (target - vel_along_normal) / denominator;
        let accumulated = (contact.accumulated_normal_impulse + impulse_mag).max(0.0);
        let impulse_delta = accumulated - contact.accumulated_normal_impulse;
        contact.accumulated_normal_impulse = accumulated;

        let impulse = contact.normal * impulse_delta;
        body_a.apply_impulse(-impulse, contact.point);
        body_b.apply_impulse(impulse, contact.point);
    }
}
