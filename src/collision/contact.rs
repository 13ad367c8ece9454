use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{core::material::ContactMaterial, utils::allocator::EntityId};

/// Geometric contact between two shapes.
///
/// `normal` points from the first shape toward the second and `depth` is the
/// penetration along it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
}

impl ContactPoint {
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Contact manifold storing every contact point found for a body pair.
#[derive(Debug, Clone)]
pub struct ContactManifold {
    pub body_a: EntityId,
    pub body_b: EntityId,
    pub points: Vec<ContactPoint>,
}

impl ContactManifold {
    pub fn deepest(&self) -> Option<&ContactPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    }
}

/// Contact constraint handed to the solver.
#[derive(Debug, Clone)]
pub struct Contact {
    pub body_a: EntityId,
    pub body_b: EntityId,
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
    pub material: ContactMaterial,
    /// Closing speed along the normal when the contact was detected;
    /// positive while the bodies approach each other.
    pub impact_velocity: f32,
    pub accumulated_normal_impulse: f32,
    pub accumulated_tangent_impulse: Vec3,
}

impl Contact {
    pub fn new(
        body_a: EntityId,
        body_b: EntityId,
        point: ContactPoint,
        material: ContactMaterial,
        impact_velocity: f32,
    ) -> Self {
        Self {
            body_a,
            body_b,
            point: point.point,
            normal: point.normal,
            depth: point.depth,
            material,
            impact_velocity,
            accumulated_normal_impulse: 0.0,
            accumulated_tangent_impulse: Vec3::ZERO,
        }
    }
}

/// Contact data delivered to collision listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub point: Vec3,
    /// Points from the listening body toward the other body.
    pub normal: Vec3,
    pub depth: f32,
    impact_velocity: f32,
}

impl ContactInfo {
    pub fn new(point: Vec3, normal: Vec3, depth: f32, impact_velocity: f32) -> Self {
        Self {
            point,
            normal,
            depth,
            impact_velocity,
        }
    }

    /// Speed at which the two surfaces closed along the contact normal.
    pub fn impact_velocity_along_normal(&self) -> f32 {
        self.impact_velocity
    }
}

/// Notification that a body started touching another one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The body the listener is attached to.
    pub body: EntityId,
    pub other: EntityId,
    pub contact: ContactInfo,
}
