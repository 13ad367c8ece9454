use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::types::{InertiaTensorExt, MassProperties, Transform};
use crate::utils::math::abs_mat3;

/// Enumeration of supported collider geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Sphere {
        radius: f32,
    },
    Box {
        half_extents: Vec3,
    },
    /// Infinite half-space; the local +Y axis is the outward normal and
    /// everything below the plane is solid.
    Plane,
}

impl ColliderShape {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere { radius } => *radius,
            Self::Box { half_extents } => half_extents.length(),
            Self::Plane => f32::INFINITY,
        }
    }

    /// World-space bounds, or `None` for unbounded shapes.
    pub fn aabb(&self, transform: &Transform) -> Option<Aabb> {
        match self {
            Self::Sphere { radius } => Some(Aabb::from_center(
                transform.position,
                Vec3::splat(*radius),
            )),
            Self::Box { half_extents } => {
                let extent = abs_mat3(Mat3::from_quat(transform.rotation)) * *half_extents;
                Some(Aabb::from_center(transform.position, extent))
            }
            Self::Plane => None,
        }
    }

    pub fn mass_properties(&self, mass: f32) -> MassProperties {
        let inertia = match self {
            Self::Sphere { radius } => Mat3::for_solid_sphere(*radius, mass),
            Self::Box { half_extents } => Mat3::for_solid_box(*half_extents, mass),
            Self::Plane => Mat3::ZERO,
        };
        MassProperties { mass, inertia }
    }

    pub fn is_bounded(&self) -> bool {
        !matches!(self, Self::Plane)
    }
}

/// The eight corners of a box in world space.
pub fn box_vertices(half_extents: Vec3, position: Vec3, rotation: Quat) -> [Vec3; 8] {
    let mut corners = [Vec3::ZERO; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let local = Vec3::new(
            if i & 1 == 0 { -half_extents.x } else { half_extents.x },
            if i & 2 == 0 { -half_extents.y } else { half_extents.y },
            if i & 4 == 0 { -half_extents.z } else { half_extents.z },
        );
        *corner = position + rotation * local;
    }
    corners
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotated_box_bounds_grow() {
        let shape = ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25));
        let flat = shape.aabb(&Transform::default()).expect("bounded");
        assert_abs_diff_eq!(flat.max.x, 1.0);

        let turned = shape
            .aabb(&Transform::from_position_rotation(
                Vec3::ZERO,
                Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            ))
            .expect("bounded");
        assert_abs_diff_eq!(turned.max.x, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(turned.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn plane_is_unbounded() {
        assert!(ColliderShape::Plane.aabb(&Transform::default()).is_none());
        assert!(!ColliderShape::Plane.is_bounded());
    }

    #[test]
    fn box_vertices_cover_all_corners() {
        let corners = box_vertices(Vec3::ONE, Vec3::ZERO, Quat::IDENTITY);
        let sum: Vec3 = corners.iter().copied().sum();
        assert_abs_diff_eq!(sum.length(), 0.0, epsilon = 1e-6);
        assert!(corners.contains(&Vec3::new(1.0, -1.0, 1.0)));
    }

    #[test]
    fn touching_bounds_overlap() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
        let c = Aabb::from_center(Vec3::new(2.5, 0.0, 0.0), Vec3::ONE);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
