use glam::Vec3;

use crate::{collision::contact::Contact, core::rigidbody::RigidBody};

/// Effective mass denominator for an impulse along `direction` at the contact.
pub(crate) fn effective_mass_denominator(
    body_a: &RigidBody,
    body_b: &RigidBody,
    r_a: Vec3,
    r_b: Vec3,
    direction: Vec3,
) -> f32 {
    let angular_a = (body_a.solver_inverse_inertia() * r_a.cross(direction)).cross(r_a);
    let angular_b = (body_b.solver_inverse_inertia() * r_b.cross(direction)).cross(r_b);
    body_a.solver_inverse_mass()
        + body_b.solver_inverse_mass()
        + direction.dot(angular_a + angular_b)
}

/// Coulomb friction: the accumulated tangential impulse is clamped to the
/// friction cone `friction * normal_impulse`.
pub fn apply_friction(body_a: &mut RigidBody, body_b: &mut RigidBody, contact: &mut Contact) {
    let limit = contact.material.friction.max(0.0) * contact.accumulated_normal_impulse;
    if limit <= f32::EPSILON {
        contact.accumulated_tangent_impulse = Vec3::ZERO;
        return;
    }

    let relative_vel =
        body_b.velocity_at_point(contact.point) - body_a.velocity_at_point(contact.point);
    let tangent_velocity = relative_vel - contact.normal * relative_vel.dot(contact.normal);
    let speed = tangent_velocity.length();
    if speed <= 1e-6 {
        return;
    }
    let tangent = tangent_velocity / speed;

    let r_a = contact.point - body_a.position();
    let r_b = contact.point - body_b.position();
    let denominator = effective_mass_denominator(body_a, body_b, r_a, r_b, tangent);
    if denominator <= f32::EPSILON {
        return;
    }

    let mut new_impulse = contact.accumulated_tangent_impulse - tangent * (speed / denominator);
    // Remove any numerical drift along the normal axis.
    new_impulse -= contact.normal * new_impulse.dot(contact.normal);
    let length = new_impulse.length();
    if length > limit {
        new_impulse *= limit / length;
    }

    let impulse_delta = new_impulse - contact.accumulated_tangent_impulse;
    contact.accumulated_tangent_impulse = new_impulse;
    if impulse_delta.length_squared() <= 1e-12 {
        return;
    }
    body_a.apply_impulse(-impulse_delta, contact.point);
    body_b.apply_impulse(impulse_delta, contact.point);
}
